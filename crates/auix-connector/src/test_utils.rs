//! Test utilities for connectors
//!
//! Provides a small product/transaction data set on the memory backend.

use auix_core::{NativeType, Record, SchemaDef};

use crate::memory::MemoryStore;

pub const PRODUCTS: &str = "products";
pub const TRANSACTIONS: &str = "product_transactions";

pub fn product_schema() -> SchemaDef {
    SchemaDef::new("Product", PRODUCTS)
        .attr("name", NativeType::String)
        .attr("price", NativeType::Decimal)
        .has_many("product_transactions", "ProductTransaction", "product_id")
        .timestamps()
}

pub fn transaction_schema() -> SchemaDef {
    SchemaDef::new("ProductTransaction", TRANSACTIONS)
        .attr(
            "type",
            NativeType::Enum(vec![
                ("In".to_string(), "in".to_string()),
                ("Out".to_string(), "out".to_string()),
            ]),
        )
        .attr("quantity", NativeType::Decimal)
        .belongs_to("product", "Product")
        .timestamps()
}

/// Products "Widget" (1) and "Bolt" (2); Widget has two transactions,
/// Bolt one. Product names are required.
pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    let seed = |source: &str, record: Record| {
        store.seed(source, record).expect("seed row");
    };

    store.register(product_schema()).expect("register products");
    store
        .register(transaction_schema())
        .expect("register transactions");
    store.require(PRODUCTS, &["name"]).expect("require name");

    seed(PRODUCTS, Record::new().with("name", "Widget").with("price", "9.99"));
    seed(PRODUCTS, Record::new().with("name", "Bolt").with("price", "0.25"));
    seed(
        TRANSACTIONS,
        Record::new().with("type", "in").with("quantity", "5").with("product_id", 1),
    );
    seed(
        TRANSACTIONS,
        Record::new().with("type", "out").with("quantity", "2").with("product_id", 1),
    );
    seed(
        TRANSACTIONS,
        Record::new().with("type", "in").with("quantity", "10").with("product_id", 2),
    );
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_store_counts() {
        let store = seeded_store();
        assert_eq!(store.count(PRODUCTS).unwrap(), 2);
        assert_eq!(store.count(TRANSACTIONS).unwrap(), 3);
    }
}
