//! Test utilities for view instances
//!
//! Compiles the product/transaction data set of the memory backend into a
//! site: products through the direct connector, transactions through the
//! action connector.

use std::sync::Arc;

use auix_compiler::{compile, CompileOptions, CompiledSite, ResourceConfig, ResourceRegistry};
use auix_connector::test_utils::{product_schema, transaction_schema, PRODUCTS, TRANSACTIONS};
use auix_connector::{ActionConnector, DirectConnector, DirectOverrides, MemoryStore};
use auix_core::prelude::*;
use auix_core::{ActionSet, DefaultActions, LayoutBuilder, LayoutSpec, ResourceName, ViewKind};

/// Defaults with no actions in any group.
pub struct NoActions;

impl DefaultActions for NoActions {
    fn default_actions(&self, _view: ViewKind) -> ActionSet {
        ActionSet::new()
    }
}

pub fn product_registry(store: &MemoryStore) -> Result<ResourceRegistry> {
    let product = ResourceName::new("product");
    let schema = product_schema();
    let direct = DirectConnector::resolve(
        &product,
        &schema,
        &store.context_functions(PRODUCTS)?,
        &DirectOverrides::default(),
    )?;

    let mut registry = ResourceRegistry::new();
    registry.register(ResourceConfig::new(product).schema(schema).connector(direct))?;
    registry.register(
        ResourceConfig::new("product_transaction")
            .schema(transaction_schema())
            .connector(ActionConnector::new(
                "product_transaction",
                Arc::new(store.domain(TRANSACTIONS)),
            )),
    )?;
    Ok(registry)
}

/// Transactions list `type` and `quantity`; everything else is synthesized.
pub fn product_specs() -> Vec<LayoutSpec> {
    vec![LayoutSpec::new("product_transaction").index(
        LayoutBuilder::index("product_transaction")
            .fields(["type", "quantity"])
            .build(),
    )]
}

pub fn product_site(store: &MemoryStore) -> Result<Arc<CompiledSite>> {
    site_with(store, &product_specs())
}

pub fn site_with(store: &MemoryStore, specs: &[LayoutSpec]) -> Result<Arc<CompiledSite>> {
    let registry = product_registry(store)?;
    let site = compile(&registry, specs, &NoActions, &CompileOptions::default())?;
    Ok(Arc::new(site))
}
