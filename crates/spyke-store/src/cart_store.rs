//! # Cart Store
//!
//! The client-side shopping cart: a [`Cart`] kept in memory and mirrored to
//! a [`KeyValueStorage`] after every change.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  UI Action               Store Method             Storage Write         │
//! │  ─────────               ────────────             ─────────────         │
//! │                                                                         │
//! │  "Add to cart" ─────────► add_to_cart() ────────► always               │
//! │                                                                         │
//! │  Quantity stepper ──────► update_quantity() ────► only if changed      │
//! │                                                                         │
//! │  Trash icon ────────────► remove_from_cart() ───► only if present      │
//! │                                                                         │
//! │  "Clear cart" ──────────► clear_cart() ─────────► only if non-empty    │
//! │                                                                         │
//! │  Badge / drawer ────────► cart_count() / cart_total() (read only)      │
//! │                                                                         │
//! │  NOTE: A failed write never rolls back memory. The error is returned   │
//! │        so the caller can show it; the next successful write catches    │
//! │        storage up with the full cart.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use spyke_core::{Cart, CartItem, CartProduct, CartTotals, Money};
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::storage::KeyValueStorage;

/// Cart persisted under a single storage key.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    key: String,
    cart: Cart,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Opens the cart stored under `key`.
    ///
    /// A missing key gives an empty cart. Stored data that does not parse is
    /// logged and replaced by an empty cart; it is overwritten on the next
    /// change.
    pub fn load(storage: S, key: impl Into<String>) -> StoreResult<Self> {
        let key = key.into();

        let cart = match storage.get(&key)? {
            None => {
                debug!(%key, "No stored cart, starting empty");
                Cart::new()
            }
            Some(raw) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(items) => {
                    let cart = Cart::from_items(items);
                    info!(%key, lines = cart.line_count(), "Cart restored");
                    cart
                }
                Err(e) => {
                    warn!(%key, error = %e, "Stored cart is corrupt, starting empty");
                    Cart::new()
                }
            },
        };

        Ok(CartStore { storage, key, cart })
    }

    /// Adds `quantity` of a listing (0 counts as 1) and persists the cart.
    pub fn add_to_cart(&mut self, product: CartProduct, quantity: u32) -> StoreResult<()> {
        debug!(id = %product.id, quantity, "Adding to cart");
        self.cart.add(product, quantity);
        self.persist()
    }

    /// Removes a listing. Returns false (and writes nothing) if it was absent.
    pub fn remove_from_cart(&mut self, id: &str) -> StoreResult<bool> {
        if !self.cart.remove(id) {
            debug!(%id, "Remove ignored, not in cart");
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Sets a listing's quantity; zero or negative removes it.
    ///
    /// Unknown ids are ignored. Returns whether anything changed.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> StoreResult<bool> {
        if !self.cart.update_quantity(id, quantity) {
            return Ok(false);
        }
        debug!(%id, quantity, "Cart quantity updated");
        self.persist()?;
        Ok(true)
    }

    /// Empties the cart. Returns whether it had any items.
    pub fn clear_cart(&mut self) -> StoreResult<bool> {
        if !self.cart.clear() {
            return Ok(false);
        }
        info!(key = %self.key, "Cart cleared");
        self.persist()?;
        Ok(true)
    }

    /// Sum of quantities (the header badge).
    pub fn cart_count(&self) -> u64 {
        self.cart.count()
    }

    pub fn cart_total(&self) -> Money {
        self.cart.total()
    }

    pub fn is_in_cart(&self, id: &str) -> bool {
        self.cart.contains(id)
    }

    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.cart.get(id)
    }

    pub fn savings(&self) -> Money {
        self.cart.savings()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&self.cart)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Storage key the cart is written under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Gives the storage back, dropping the in-memory cart.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Writes the whole cart as a JSON array.
    fn persist(&mut self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.cart)?;
        if let Err(e) = self.storage.set(&self.key, &json) {
            warn!(key = %self.key, error = %e, "Failed to persist cart");
            return Err(e);
        }
        Ok(())
    }
}

// =============================================================================
// Shared Cart Store
// =============================================================================

/// A cart store shared between handlers.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<CartStore>>`: every cart operation is short and most of
/// them write, so a `RwLock` would buy nothing. A poisoned lock is recovered
/// since the cart is always left in a consistent state between operations.
#[derive(Debug)]
pub struct SharedCartStore<S> {
    inner: Arc<Mutex<CartStore<S>>>,
}

impl<S> Clone for SharedCartStore<S> {
    fn clone(&self) -> Self {
        SharedCartStore {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStorage> SharedCartStore<S> {
    pub fn new(store: CartStore<S>) -> Self {
        SharedCartStore {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let badge = shared.with_cart(|store| store.cart_count());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartStore<S>) -> R,
    {
        let store = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&store)
    }

    /// Executes a function with write access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// shared.with_cart_mut(|store| store.add_to_cart(listing, 1))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartStore<S>) -> R,
    {
        let mut store = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }
}
