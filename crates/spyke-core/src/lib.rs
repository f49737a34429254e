//! # spyke-core: Pure Business Logic for the Spyke Marketplace
//!
//! The cart and product-creation rules of the marketplace, as pure data and
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Spyke Marketplace Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web client / CLI                             │   │
//! │  │    Listing ──► Cart drawer ──► Checkout     Seller wizard       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         spyke-store: CartStore, ProductCreateStore              │   │
//! │  │         local storage adapters, products API client             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ spyke-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌──────────────────┐  │   │
//! │  │   │  money  │  │  cart   │  │ wizard  │  │ commission       │  │   │
//! │  │   │  Money  │  │  Cart   │  │ steps   │  │ offers           │  │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Cart items, cart operations and totals
//! - [`draft`] - Product draft form data
//! - [`wizard`] - Six-step creation wizard as an explicit state machine
//! - [`commission`] - Commission offer negotiation
//! - [`validation`] - Field rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use spyke_core::{Cart, CartProduct, Money};
//!
//! let mut cart = Cart::new();
//! let listing = CartProduct::new("1", "Invoice Bot", Money::from_cents(1000));
//! cart.add(listing.clone(), 1);
//! cart.add(listing, 1);
//!
//! assert_eq!(cart.count(), 2);
//! assert_eq!(cart.total().to_string(), "$20.00");
//!
//! cart.update_quantity("1", 0);
//! assert!(cart.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod commission;
pub mod draft;
pub mod error;
pub mod money;
pub mod validation;
pub mod wizard;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartProduct, CartTotals};
pub use commission::{CommissionOffer, CommissionStatus};
pub use draft::{DraftField, DraftUpdate, HowItWorksStep, ProductDraft};
pub use error::{CoreError, CoreResult, FieldErrors, ValidationError};
pub use money::Money;
pub use wizard::{ProductWizard, WizardAction, WizardStep};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Local storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "spyke_cart";

/// Listing title length bounds (characters).
pub const TITLE_MIN_LEN: usize = 3;
pub const TITLE_MAX_LEN: usize = 100;

/// Card blurb shown on listing tiles.
pub const SHORT_DESCRIPTION_MAX_LEN: usize = 200;

/// Minimum length of the full description.
pub const FULL_DESCRIPTION_MIN_LEN: usize = 20;

/// Upper bound for any long free-text field.
pub const TEXT_MAX_LEN: usize = 5000;

pub const MAX_HOW_IT_WORKS_STEPS: usize = 10;

/// Gallery size limit.
pub const MAX_IMAGES: usize = 8;

pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_LEN: usize = 30;
