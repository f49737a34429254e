use std::fmt::Write as _;

use clap::{Args, Subcommand};
use spyke_core::{CartProduct, Money};
use spyke_store::{CartStore, FileStorage, KeyValueStorage, SpykeConfig};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Print the cart with totals.
    Show {
        /// Print items and totals as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Add a listing, or more of one already in the cart.
    Add(AddArgs),
    /// Remove a listing.
    Remove { id: String },
    /// Set a listing's quantity; 0 or less removes it.
    Update {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove everything.
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    id: String,
    title: String,

    /// Unit price in dollars, e.g. 10.99.
    #[arg(long)]
    price: f64,

    #[arg(long, short, default_value_t = 1)]
    quantity: u32,

    /// Pre-discount price in dollars.
    #[arg(long)]
    original_price: Option<f64>,

    #[arg(long)]
    thumbnail: Option<String>,

    #[arg(long, default_value = "")]
    category: String,

    #[arg(long, default_value = "")]
    seller: String,
}

impl AddArgs {
    fn to_product(&self) -> CartProduct {
        CartProduct {
            id: self.id.clone(),
            title: self.title.clone(),
            price: Money::from_major_units(self.price),
            original_price: self.original_price.map(Money::from_major_units),
            thumbnail: self.thumbnail.clone(),
            category: self.category.clone(),
            seller: self.seller.clone(),
        }
    }
}

pub(crate) fn run(command: CartCommand, config: &SpykeConfig) -> anyhow::Result<()> {
    let storage = FileStorage::new(config.storage_dir());
    let mut store = CartStore::load(storage, config.storage.cart_key.clone())?;

    match command.command {
        CartSubcommand::Show { json } => {
            if json {
                let value = serde_json::json!({
                    "items": store.items(),
                    "totals": store.totals(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", render(&store));
            }
        }
        CartSubcommand::Add(args) => {
            store.add_to_cart(args.to_product(), args.quantity)?;
            let quantity = store.get(&args.id).map_or(0, |item| item.quantity);
            println!("{} now has quantity {}", args.id, quantity);
        }
        CartSubcommand::Remove { id } => {
            if store.remove_from_cart(&id)? {
                println!("Removed {}", id);
            } else {
                println!("{} is not in the cart", id);
            }
        }
        CartSubcommand::Update { id, quantity } => {
            let changed = store.update_quantity(&id, quantity)?;
            println!("{}", update_message(&store, &id, changed));
        }
        CartSubcommand::Clear => {
            store.clear_cart()?;
            println!("Cart cleared");
        }
    }

    Ok(())
}

/// Result line for `cart update`, reporting the quantity actually stored.
fn update_message<S: KeyValueStorage>(store: &CartStore<S>, id: &str, changed: bool) -> String {
    if !changed {
        return "Nothing changed".to_string();
    }
    match store.get(id) {
        Some(item) => format!("{} now has quantity {}", id, item.quantity),
        None => format!("Removed {}", id),
    }
}

/// Plain-text cart listing.
fn render<S: KeyValueStorage>(store: &CartStore<S>) -> String {
    let mut out = String::new();

    if store.items().is_empty() {
        out.push_str("Cart is empty\n");
        return out;
    }

    for item in store.items() {
        let _ = writeln!(
            out,
            "{:<12} {:<32} {:>4} x {:>10} = {:>10}",
            item.id(),
            item.product.title,
            item.quantity,
            item.product.price.to_string(),
            item.line_total().to_string(),
        );
    }

    let totals = store.totals();
    let _ = writeln!(out, "Items: {}", totals.item_count);
    if totals.savings.is_positive() {
        let _ = writeln!(out, "Savings: {}", totals.savings);
    }
    let _ = writeln!(out, "Total: {}", totals.total);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use spyke_core::CART_STORAGE_KEY;
    use spyke_store::MemoryStorage;

    #[test]
    fn test_add_args_to_product() {
        let args = AddArgs {
            id: "1".into(),
            title: "Invoice Bot".into(),
            price: 10.99,
            quantity: 1,
            original_price: Some(15.0),
            thumbnail: None,
            category: "finance".into(),
            seller: String::new(),
        };
        let product = args.to_product();

        assert_eq!(product.price.cents(), 1099);
        assert_eq!(product.original_price.map(|m| m.cents()), Some(1500));
    }

    #[test]
    fn test_render() {
        let mut store = CartStore::load(MemoryStorage::new(), CART_STORAGE_KEY).unwrap();
        assert_eq!(render(&store), "Cart is empty\n");

        let product = CartProduct::new("1", "Invoice Bot", Money::from_cents(1000));
        store.add_to_cart(product, 2).unwrap();

        let text = render(&store);
        assert!(text.contains("Invoice Bot"));
        assert!(text.contains("Items: 2"));
        assert!(text.ends_with("Total: $20.00\n"));
        assert!(!text.contains("Savings"));
    }

    #[test]
    fn test_update_message_reports_stored_quantity() {
        let mut store = CartStore::load(MemoryStorage::new(), CART_STORAGE_KEY).unwrap();
        let product = CartProduct::new("1", "Invoice Bot", Money::from_cents(1000));
        store.add_to_cart(product, 1).unwrap();

        let changed = store.update_quantity("1", 5_000_000_000).unwrap();
        assert_eq!(
            update_message(&store, "1", changed),
            format!("1 now has quantity {}", u32::MAX)
        );

        let changed = store.update_quantity("1", 3).unwrap();
        assert_eq!(update_message(&store, "1", changed), "1 now has quantity 3");

        let changed = store.update_quantity("1", 3).unwrap();
        assert_eq!(update_message(&store, "1", changed), "Nothing changed");

        let changed = store.update_quantity("1", -2).unwrap();
        assert_eq!(update_message(&store, "1", changed), "Removed 1");
    }
}
