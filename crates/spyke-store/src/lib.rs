//! # spyke-store: State Stores and I/O for the Spyke Marketplace
//!
//! Everything in the client that touches storage or the network: the cart
//! store persisted to local storage, the product-creation store that saves
//! drafts to the backend, and the configuration that wires them up.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         spyke-store                                     │
//! │                                                                         │
//! │  ┌───────────────────────┐          ┌───────────────────────────────┐  │
//! │  │      CartStore        │          │     ProductCreateStore        │  │
//! │  │  Cart + storage key   │          │  ProductWizard + draft id     │  │
//! │  └───────────┬───────────┘          └───────────────┬───────────────┘  │
//! │              │ sync                                 │ async            │
//! │  ┌───────────▼───────────┐          ┌───────────────▼───────────────┐  │
//! │  │   KeyValueStorage     │          │        DraftApi               │  │
//! │  │  MemoryStorage        │          │  HttpProductsApi (reqwest)    │  │
//! │  │  FileStorage          │          │  normalize() at the boundary  │  │
//! │  └───────────────────────┘          └───────────────────────────────┘  │
//! │                                                                         │
//! │  SpykeConfig: TOML file + SPYKE_* env vars                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use spyke_core::{CartProduct, Money, CART_STORAGE_KEY};
//! use spyke_store::{CartStore, MemoryStorage};
//!
//! let mut store = CartStore::load(MemoryStorage::new(), CART_STORAGE_KEY)?;
//! store.add_to_cart(CartProduct::new("1", "Invoice Bot", Money::from_cents(1000)), 2)?;
//!
//! assert_eq!(store.cart_count(), 2);
//! assert!(store.is_in_cart("1"));
//! # Ok::<(), spyke_store::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod cart_store;
pub mod config;
pub mod error;
pub mod product_store;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{normalize, DraftApi, DraftRecord, HttpProductsApi, SubmittedProduct};
pub use cart_store::{CartStore, SharedCartStore};
pub use config::{ApiSettings, SpykeConfig, StorageSettings};
pub use error::{ApiError, ApiResult, StoreError, StoreResult};
pub use product_store::ProductCreateStore;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
