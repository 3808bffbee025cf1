//! Demo site: products with stock transactions and storage locations, on
//! the in-memory backend.

use std::sync::Arc;

use auix_compiler::{compile, CompileOptions, CompiledSite, ResourceConfig, ResourceRegistry};
use auix_connector::{ActionConnector, DirectConnector, DirectOverrides, MemoryStore};
use auix_core::prelude::*;
use auix_core::{
    FieldOverrides, LayoutBuilder, LayoutSpec, NativeType, Record, ResourceName, SchemaDef,
};
use auix_render::BasicTemplate;

const PRODUCTS: &str = "products";
const TRANSACTIONS: &str = "product_transactions";
const LOCATIONS: &str = "product_locations";

fn product_schema() -> SchemaDef {
    SchemaDef::new("Product", PRODUCTS)
        .attr("name", NativeType::String)
        .attr("description", NativeType::Text)
        .attr("price", NativeType::Decimal)
        .attr("active", NativeType::Boolean)
        .has_many("product_transactions", "ProductTransaction", "product_id")
        .has_many("product_locations", "ProductLocation", "product_id")
        .timestamps()
}

fn transaction_schema() -> SchemaDef {
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

fn location_schema() -> SchemaDef {
    SchemaDef::new("ProductLocation", LOCATIONS)
        .attr("warehouse", NativeType::String)
        .attr("shelf", NativeType::String)
        .belongs_to("product", "Product")
        .timestamps()
}

/// A store seeded with a few products and their stock.
pub fn demo_store() -> Result<MemoryStore> {
    let store = MemoryStore::new();
    store.register(product_schema())?;
    store.register(transaction_schema())?;
    store.register(location_schema())?;
    store.require(PRODUCTS, &["name"])?;
    store.require(LOCATIONS, &["warehouse"])?;

    for (name, price) in [("Widget", "9.99"), ("Bolt", "0.25"), ("Gear", "4.50")] {
        store.seed(
            PRODUCTS,
            Record::new()
                .with("name", name)
                .with("price", price)
                .with("active", true),
        )?;
    }
    for (kind, quantity, product) in [("in", "50", 1), ("out", "8", 1), ("in", "200", 2)] {
        store.seed(
            TRANSACTIONS,
            Record::new()
                .with("type", kind)
                .with("quantity", quantity)
                .with("product_id", product),
        )?;
    }
    store.seed(
        LOCATIONS,
        Record::new()
            .with("warehouse", "North")
            .with("shelf", "A3")
            .with("product_id", 1),
    )?;
    Ok(store)
}

fn registry(store: &MemoryStore) -> Result<ResourceRegistry> {
    let mut registry = ResourceRegistry::new();

    let product = ResourceName::new("product");
    let schema = product_schema();
    let direct = DirectConnector::resolve(
        &product,
        &schema,
        &store.context_functions(PRODUCTS)?,
        &DirectOverrides::default(),
    )?;
    registry.register(
        ResourceConfig::new(product)
            .schema(schema)
            .connector(direct)
            .order_by("name")
            .field("price", FieldOverrides::new().label("Unit price")),
    )?;

    registry.register(
        ResourceConfig::new("product_transaction")
            .schema(transaction_schema())
            .connector(ActionConnector::new(
                "product_transaction",
                Arc::new(store.domain(TRANSACTIONS)),
            )),
    )?;

    let location = ResourceName::new("product_location");
    let schema = location_schema();
    let direct = DirectConnector::resolve(
        &location,
        &schema,
        &store.context_functions(LOCATIONS)?,
        &DirectOverrides::default(),
    )?;
    registry.register(ResourceConfig::new(location).schema(schema).connector(direct))?;
    Ok(registry)
}

fn specs() -> Vec<LayoutSpec> {
    vec![
        LayoutSpec::new("product")
            .index(
                LayoutBuilder::index("product")
                    .fields(["name", "price", "active"])
                    .build(),
            )
            .form(
                LayoutBuilder::form("product")
                    .sections(|s| {
                        s.default_section("Details", |b| {
                            b.field("name").field("description").field("active")
                        })
                        .section("Prices", |b| b.inline(|b| b.field("price")))
                    })
                    .group("Stock", |b| {
                        b.fields(["product_transactions", "product_locations"])
                    })
                    .build(),
            ),
        LayoutSpec::new("product_transaction").index(
            LayoutBuilder::index("product_transaction")
                .fields(["type", "quantity", "product"])
                .build(),
        ),
        LayoutSpec::new("product_location").index(
            LayoutBuilder::index("product_location")
                .fields(["warehouse", "shelf"])
                .build(),
        ),
    ]
}

/// Compile the demo site over `store`.
pub fn demo_site(store: &MemoryStore, options: &CompileOptions) -> Result<Arc<CompiledSite>> {
    let site = compile(&registry(store)?, &specs(), &BasicTemplate, options)?;
    info!("Compiled demo site with {} resources", site.resources().count());
    Ok(Arc::new(site))
}
