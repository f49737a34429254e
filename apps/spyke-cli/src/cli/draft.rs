use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use spyke_core::wizard::validate_step;
use spyke_core::{ProductDraft, WizardStep};
use spyke_store::{HttpProductsApi, ProductCreateStore, SpykeConfig};

#[derive(Debug, Args)]
pub(crate) struct DraftCommand {
    #[command(subcommand)]
    command: DraftSubcommand,
}

#[derive(Debug, Subcommand)]
enum DraftSubcommand {
    /// Validate every wizard step of a draft JSON file.
    Check { file: PathBuf },
    /// Save a draft JSON file to the backend.
    Save {
        file: PathBuf,

        /// Existing backend draft id to overwrite.
        #[arg(long)]
        id: Option<String>,
    },
}

pub(crate) async fn run(command: DraftCommand, config: &SpykeConfig) -> anyhow::Result<()> {
    match command.command {
        DraftSubcommand::Check { file } => {
            let draft = read_draft(&file)?;
            let (report, invalid) = check(&draft);
            print!("{}", report);
            if invalid > 0 {
                bail!("draft has {} invalid field(s)", invalid);
            }
        }
        DraftSubcommand::Save { file, id } => {
            let draft = read_draft(&file)?;
            let api = HttpProductsApi::from_settings(&config.api)?;
            let store = match id {
                Some(id) => ProductCreateStore::resume(api, id, draft),
                None => ProductCreateStore::from_draft(api, draft),
            };

            let record = store.save_progress().await?;
            println!("Saved draft {}", record.id);
        }
    }

    Ok(())
}

fn read_draft(path: &Path) -> anyhow::Result<ProductDraft> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

/// Per-step report and the number of invalid fields.
fn check(draft: &ProductDraft) -> (String, usize) {
    let mut out = String::new();
    let mut invalid = 0;

    for step in WizardStep::STEPS {
        let errors = validate_step(step, draft);
        if errors.is_empty() {
            let _ = writeln!(out, "[ok]   {}. {}", step.number(), step);
            continue;
        }

        invalid += errors.len();
        let _ = writeln!(out, "[fail] {}. {}", step.number(), step);
        for (field, message) in errors.iter() {
            let _ = writeln!(out, "         {}: {}", field, message);
        }
    }

    (out, invalid)
}
