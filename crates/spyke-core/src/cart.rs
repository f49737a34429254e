//! # Cart
//!
//! The buyer's in-session selection of listings.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Buyer Action             Cart Method             State Change          │
//! │  ────────────             ───────────             ────────────          │
//! │                                                                         │
//! │  "Add to cart" ──────────► add() ────────────────► push or qty += n     │
//! │                                                                         │
//! │  Change quantity ────────► update_quantity() ───► qty = n (≤0 removes) │
//! │                                                                         │
//! │  Click remove ───────────► remove() ─────────────► items.retain(..)     │
//! │                                                                         │
//! │  After checkout ─────────► clear() ──────────────► items.clear()        │
//! │                                                                         │
//! │  Header badge ───────────► count() ──────────────► (read only)          │
//! │  Cart summary ───────────► total() / totals() ──► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by `id` (adding the same listing increases quantity)
//! - Quantity is always ≥ 1 (setting it to 0 or below removes the item)
//! - Insertion order is kept, so the cart renders in the order items were added
//!
//! None of the operations can fail: unknown ids are silent no-ops.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{self, Money};

// =============================================================================
// Cart Product
// =============================================================================

/// Snapshot of a listing at the moment it was added to the cart.
///
/// ## Price Freezing
/// The price is captured when the buyer clicks "Add to cart". Later price
/// changes on the listing do not affect what the cart shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    /// Listing identifier.
    pub id: String,

    pub title: String,

    /// Unit price (major units in JSON).
    #[serde(with = "money::major_units")]
    #[ts(type = "number")]
    pub price: Money,

    /// Pre-discount price shown struck through, if the listing is on sale.
    #[serde(with = "money::major_units::option", default)]
    #[ts(type = "number | null")]
    pub original_price: Option<Money>,

    /// Thumbnail image URL.
    #[serde(default)]
    pub thumbnail: Option<String>,

    #[serde(default)]
    pub category: String,

    /// Seller display name.
    #[serde(default)]
    pub seller: String,
}

impl CartProduct {
    /// Creates a snapshot with only the required fields set.
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: Money) -> Self {
        CartProduct {
            id: id.into(),
            title: title.into(),
            price,
            original_price: None,
            thumbnail: None,
            category: String::new(),
            seller: String::new(),
        }
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart: a product snapshot plus its quantity.
///
/// Serialized flat (`{"id": .., "title": .., "price": 10.0, "quantity": 2}`),
/// which is the array element format of the `spyke_cart` storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub product: CartProduct,

    /// Always ≥ 1.
    pub quantity: u32,
}

impl CartItem {
    /// Returns the listing id.
    #[inline]
    pub fn id(&self) -> &str {
        &self.product.id
    }

    /// Calculates the line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.product.price.multiply_quantity(self.quantity)
    }

    /// Amount saved on this line against `original_price`.
    ///
    /// Zero when there is no original price or it is not above the price.
    pub fn savings(&self) -> Money {
        match self.product.original_price {
            Some(original) if original > self.product.price => {
                (original - self.product.price).multiply_quantity(self.quantity)
            }
            _ => Money::zero(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from stored items, restoring the invariants.
    ///
    /// Stored data comes from outside the process, so duplicate ids are
    /// merged into the first occurrence and zero quantities are dropped.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Cart::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            let quantity = item.quantity;
            cart.add(item.product, quantity);
        }
        cart
    }

    /// Adds a listing or increases its quantity if already present.
    ///
    /// ## Behavior
    /// - Listing already in cart: quantity increases by `quantity`
    /// - Listing not in cart: appended with `quantity`
    /// - A `quantity` of 0 counts as 1; quantities saturate at `u32::MAX`
    ///
    /// The existing snapshot is kept when the listing is already present.
    pub fn add(&mut self, product: CartProduct, quantity: u32) {
        let quantity = quantity.max(1);

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
            return;
        }

        self.items.push(CartItem { product, quantity });
    }

    /// Sets the quantity of an item.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: removes the item
    /// - Unknown id: no-op
    ///
    /// Returns true if the cart changed.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|i| i.product.id == id) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Removes an item by id. Returns true if it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product.id != id);
        self.items.len() != initial_len
    }

    /// Clears all items. Returns true if the cart had any.
    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        had_items
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up an item by id.
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == id)
    }

    /// Checks whether a listing is in the cart.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct listings.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities (the header badge number).
    pub fn count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of price × quantity.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total saved against original prices.
    pub fn savings(&self) -> Money {
        self.items.iter().map(CartItem::savings).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart summary for the cart drawer and checkout page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Distinct listings.
    pub line_count: usize,

    /// Sum of quantities.
    pub item_count: u64,

    #[serde(with = "money::major_units")]
    #[ts(type = "number")]
    pub total: Money,

    #[serde(with = "money::major_units")]
    #[ts(type = "number")]
    pub savings: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            item_count: cart.count(),
            total: cart.total(),
            savings: cart.savings(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(id: &str, price_cents: i64) -> CartProduct {
        CartProduct {
            id: id.to_string(),
            title: format!("Listing {}", id),
            price: Money::from_cents(price_cents),
            original_price: None,
            thumbnail: Some(format!("https://cdn.example.com/{}.png", id)),
            category: "automation".to_string(),
            seller: "acme".to_string(),
        }
    }

    #[test]
    fn test_add_twice_then_remove_by_zero_quantity() {
        let mut cart = Cart::new();
        cart.add(product("1", 1000), 1);
        cart.add(product("1", 1000), 1);

        assert_eq!(cart.count(), 2);
        assert_eq!(cart.total(), Money::from_cents(2000));
        assert_eq!(cart.total().to_string(), "$20.00");

        assert!(cart.update_quantity("1", 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_same_product_keeps_single_line() {
        let mut cart = Cart::new();
        cart.add(product("1", 999), 2);
        cart.add(product("1", 999), 3);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.count(), 5);
    }

    #[test]
    fn test_add_zero_quantity_counts_as_one() {
        let mut cart = Cart::new();
        cart.add(product("1", 100), 0);
        assert_eq!(cart.get("1").map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_add_saturates() {
        let mut cart = Cart::new();
        cart.add(product("1", 1), u32::MAX);
        cart.add(product("1", 1), 5);
        assert_eq!(cart.get("1").map(|i| i.quantity), Some(u32::MAX));
    }

    #[test]
    fn test_update_quantity_negative_removes() {
        let mut cart = Cart::new();
        cart.add(product("1", 100), 3);
        assert!(cart.update_quantity("1", -1));
        assert!(!cart.contains("1"));
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = Cart::new();
        cart.add(product("1", 250), 1);
        assert!(cart.update_quantity("1", 4));
        assert_eq!(cart.total(), Money::from_cents(1000));

        // Same value again is not a change
        assert!(!cart.update_quantity("1", 4));
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let mut cart = Cart::new();
        cart.add(product("1", 100), 1);

        assert!(!cart.remove("nope"));
        assert!(!cart.update_quantity("nope", 3));
        assert!(!cart.update_quantity("nope", 0));
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(product("1", 100), 2);
        cart.add(product("2", 100), 1);

        assert!(cart.clear());
        assert_eq!(cart.count(), 0);
        assert!(!cart.clear());
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut cart = Cart::new();
        cart.add(product("b", 100), 1);
        cart.add(product("a", 100), 1);
        cart.add(product("b", 100), 1);

        let ids: Vec<&str> = cart.items().iter().map(CartItem::id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_savings_and_totals() {
        let mut cart = Cart::new();
        let mut sale = product("1", 1500);
        sale.original_price = Some(Money::from_cents(2000));
        cart.add(sale, 2);
        cart.add(product("2", 500), 1);

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.total, Money::from_cents(3500));
        assert_eq!(totals.savings, Money::from_cents(1000));
    }

    #[test]
    fn test_json_shape_matches_web_client() {
        let mut cart = Cart::new();
        cart.add(CartProduct::new("p1", "Invoice Bot", Money::from_cents(1099)), 2);

        let json: serde_json::Value = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "id": "p1",
                "title": "Invoice Bot",
                "price": 10.99,
                "originalPrice": null,
                "thumbnail": null,
                "category": "",
                "seller": "",
                "quantity": 2
            }])
        );
    }

    #[test]
    fn test_from_items_restores_invariants() {
        let stored = r#"[
            {"id": "1", "title": "A", "price": 10, "quantity": 1},
            {"id": "2", "title": "B", "price": 5, "quantity": 0},
            {"id": "1", "title": "A again", "price": 10, "quantity": 2}
        ]"#;
        let items: Vec<CartItem> = serde_json::from_str(stored).unwrap();
        let cart = Cart::from_items(items);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.get("1").map(|i| i.quantity), Some(3));
        assert_eq!(cart.get("1").map(|i| i.product.title.as_str()), Some("A"));
    }

    #[test]
    fn test_total_saturates_instead_of_overflowing() {
        let stored = r#"[{"id": "1", "title": "A", "price": 1e17, "quantity": 2}]"#;
        let items: Vec<CartItem> = serde_json::from_str(stored).unwrap();
        let cart = Cart::from_items(items);

        assert_eq!(cart.count(), 2);
        assert_eq!(cart.total(), Money::from_cents(i64::MAX));
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8, i64, u32),
        Update(u8, i64),
        Remove(u8),
        Clear,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u8..5, 1i64..100_000, 0u32..5).prop_map(|(id, p, q)| Op::Add(id, p, q)),
            2 => (0u8..5, -3i64..20).prop_map(|(id, q)| Op::Update(id, q)),
            1 => (0u8..5).prop_map(Op::Remove),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_repeated_adds_accumulate(n in 1usize..50) {
            let mut cart = Cart::new();
            for _ in 0..n {
                cart.add(product("same", 100), 1);
            }
            prop_assert_eq!(cart.line_count(), 1);
            prop_assert_eq!(cart.count(), n as u64);
        }

        #[test]
        fn prop_total_is_sum_of_lines(ops in prop::collection::vec(op(), 0..40)) {
            let mut cart = Cart::new();
            for op in ops {
                match op {
                    Op::Add(id, price, qty) => cart.add(product(&id.to_string(), price), qty),
                    Op::Update(id, qty) => { cart.update_quantity(&id.to_string(), qty); }
                    Op::Remove(id) => { cart.remove(&id.to_string()); }
                    Op::Clear => { cart.clear(); }
                }

                let expected: i64 = cart
                    .items()
                    .iter()
                    .map(|i| i.product.price.cents() * i64::from(i.quantity))
                    .sum();
                prop_assert_eq!(cart.total().cents(), expected);
                prop_assert!(cart.items().iter().all(|i| i.quantity >= 1));
            }
        }

        #[test]
        fn prop_clear_resets_count(ops in prop::collection::vec(op(), 0..20)) {
            let mut cart = Cart::new();
            for op in ops {
                if let Op::Add(id, price, qty) = op {
                    cart.add(product(&id.to_string(), price), qty);
                }
            }
            cart.clear();
            prop_assert_eq!(cart.count(), 0);
        }
    }
}
