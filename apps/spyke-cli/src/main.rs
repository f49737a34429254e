//! # Spyke CLI
//!
//! Command-line front end for the marketplace client stores.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CLI Startup                                          │
//! │                                                                         │
//! │  1. Initialize Logging ──────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter, written to stderr            │
//! │     • Default: info,spyke=debug, can be overridden with RUST_LOG       │
//! │                                                                         │
//! │  2. Parse Arguments (clap) ──────────────────────────────────────────► │
//! │                                                                         │
//! │  3. Load SpykeConfig ────────────────────────────────────────────────► │
//! │     • --config path or platform spyke.toml, then SPYKE_* env vars      │
//! │                                                                         │
//! │  4. Run Command ─────────────────────────────────────────────────────► │
//! │     • cart: CartStore over FileStorage                                 │
//! │     • draft: wizard validation, ProductCreateStore over HTTP           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    cli::Cli::parse().run().await
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=spyke_store=trace` - Trace the store layer only
///
/// Logs go to stderr so `--json` output on stdout stays machine-readable.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,spyke=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
