//! # Field expansion
//!
//! Turns a declared [`LayoutTree`] into an owned [`ViewNode`] tree: every
//! field reference resolved against the resource's fields, overrides merged,
//! show views forced read-only, omitted fields stripped and association
//! fields annotated with their sibling resource.

use std::collections::BTreeMap;

use auix_core::prelude::*;
use auix_core::{
    Field, FieldKey, FieldOverrides, FieldType, LayoutTag, LayoutTree, NodeId, RelatedResource,
    ResourceName, ViewKind,
};

use crate::registry::{RegisteredResource, ResourceRegistry};
use crate::view::{ViewNode, ViewTag};

/// Expanded index columns per resource.
pub type IndexColumns = BTreeMap<ResourceName, Vec<Field>>;

/// Overrides for each key merged in document order; later references win.
pub fn collect_overrides(tree: &LayoutTree) -> BTreeMap<FieldKey, FieldOverrides> {
    let mut merged: BTreeMap<FieldKey, FieldOverrides> = BTreeMap::new();
    for (key, overrides) in tree.field_refs() {
        merged.entry(key.clone()).or_default().merge(overrides);
    }
    merged
}

pub struct Expander<'a> {
    registry: &'a ResourceRegistry,
    resource: &'a RegisteredResource,
    /// Sibling index columns; `None` while the index columns themselves
    /// are being computed.
    columns: Option<&'a IndexColumns>,
}

impl<'a> Expander<'a> {
    pub fn new(registry: &'a ResourceRegistry, resource: &'a RegisteredResource) -> Self {
        Self {
            registry,
            resource,
            columns: None,
        }
    }

    pub fn with_columns(mut self, columns: &'a IndexColumns) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn expand(&self, tree: &LayoutTree) -> Result<ViewNode> {
        let overrides = collect_overrides(tree);
        let root = self.expand_node(tree, NodeId::ROOT, tree.view(), &overrides)?;
        // The root is a container and is never stripped.
        Ok(root.unwrap_or_else(|| ViewNode::new(root_tag(tree.view()))))
    }

    fn expand_node(
        &self,
        tree: &LayoutTree,
        id: NodeId,
        view: ViewKind,
        overrides: &BTreeMap<FieldKey, FieldOverrides>,
    ) -> Result<Option<ViewNode>> {
        let node = tree.node(id);
        let tag = match &node.tag {
            LayoutTag::Root { view, .. } => root_tag(*view),
            LayoutTag::Inline => ViewTag::Inline,
            LayoutTag::Stacked => ViewTag::Stacked,
            LayoutTag::Group { title } => ViewTag::Group {
                title: title.clone(),
            },
            LayoutTag::Sections { id } => ViewTag::Sections { id: id.clone() },
            LayoutTag::Section {
                sections_id,
                tab_id,
                title,
                default,
            } => ViewTag::Section {
                sections_id: sections_id.clone(),
                tab_id: tab_id.clone(),
                title: title.clone(),
                default: *default,
            },
            LayoutTag::Field { key, .. } => {
                return self
                    .expand_field(key, view, overrides)
                    .map(|field| field.map(|f| ViewNode::new(ViewTag::Field(Box::new(f)))));
            }
        };

        let mut expanded = ViewNode::new(tag);
        expanded.title = node.opts.title.clone();
        expanded.subtitle = node.opts.subtitle.clone();
        for child in &node.children {
            if let Some(child) = self.expand_node(tree, *child, view, overrides)? {
                expanded.children.push(child);
            }
        }
        Ok(Some(expanded))
    }

    fn expand_field(
        &self,
        key: &FieldKey,
        view: ViewKind,
        overrides: &BTreeMap<FieldKey, FieldOverrides>,
    ) -> Result<Option<Field>> {
        let base = self
            .resource
            .field(key)
            .ok_or_else(|| Error::unknown_field(self.resource.name.as_str(), key.as_str()))?;

        let mut field = base.clone();
        if let Some(overrides) = overrides.get(key) {
            field.apply(overrides);
        }
        if view == ViewKind::Show {
            field.disabled = true;
        }
        if field.omitted {
            trace!("Stripping omitted field '{}' from {} {}", key, self.resource.name, view);
            return Ok(None);
        }
        if let Some(columns) = self.columns {
            self.resolve_association(&mut field, columns);
        }
        Ok(Some(field))
    }

    /// Attach the sibling resource an association or embed points at.
    fn resolve_association(&self, field: &mut Field, columns: &IndexColumns) {
        let target = match &field.field_type {
            FieldType::BelongsTo | FieldType::HasOne | FieldType::HasMany => field
                .data
                .association()
                .and_then(|d| self.registry.by_entity(&d.related)),
            FieldType::EmbedsOne | FieldType::EmbedsMany => field
                .data
                .embed()
                .and_then(|d| self.registry.get(&d.related)),
            _ => return,
        };
        let Some(target) = target else {
            debug!(
                "No sibling resource for {}.{}, left unresolved",
                self.resource.name, field.key
            );
            return;
        };
        field.data.set_related_resource(RelatedResource {
            name: target.name.clone(),
            title: target.title.clone(),
            fields: columns.get(&target.name).cloned().unwrap_or_default(),
            order_by: target.order_by.clone(),
        });
    }
}

fn root_tag(view: ViewKind) -> ViewTag {
    match view {
        ViewKind::Index => ViewTag::Index,
        ViewKind::Form => ViewTag::Form,
        ViewKind::Show => ViewTag::Show,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ResourceConfig;
    use auix_core::{LayoutBuilder, NativeType, SchemaDef};

    fn registry() -> ResourceRegistry {
        let mut registry = ResourceRegistry::new();
        registry
            .register(
                ResourceConfig::new("product")
                    .schema(
                        SchemaDef::new("Product", "products")
                            .attr("name", NativeType::String)
                            .attr("price", NativeType::Decimal)
                            .has_many("product_transactions", "ProductTransaction", "product_id")
                            .timestamps(),
                    )
                    .field("price", FieldOverrides::new().label("Global")),
            )
            .unwrap();
        registry
            .register(
                ResourceConfig::new("product_transaction").schema(
                    SchemaDef::new("ProductTransaction", "product_transactions")
                        .attr("quantity", NativeType::Decimal)
                        .belongs_to("product", "Product"),
                ),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_later_override_wins() {
        let tree = LayoutBuilder::form("product")
            .field_with("price", FieldOverrides::new().label("First").required(true))
            .group("Nested", |b| {
                b.field_with("price", FieldOverrides::new().label("Second"))
            })
            .build();
        let merged = collect_overrides(&tree);
        let price = &merged[&FieldKey::new("price")];
        assert_eq!(price.label.as_deref(), Some("Second"));
        assert_eq!(price.required, Some(true));

        let registry = registry();
        let product = registry.require(&"product".into()).unwrap();
        let root = Expander::new(&registry, product).expand(&tree).unwrap();
        let labels: Vec<&str> = root.fields().iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Second", "Second"]);
    }

    #[test]
    fn test_inline_override_beats_resource_override() {
        let registry = registry();
        let product = registry.require(&"product".into()).unwrap();
        let tree = LayoutBuilder::form("product")
            .field_with("price", FieldOverrides::new().label("Inline"))
            .build();
        let root = Expander::new(&registry, product).expand(&tree).unwrap();
        assert_eq!(root.find_field("price").unwrap().label, "Inline");

        let tree = LayoutBuilder::form("product").field("price").build();
        let root = Expander::new(&registry, product).expand(&tree).unwrap();
        assert_eq!(root.find_field("price").unwrap().label, "Global");
    }

    #[test]
    fn test_show_forces_disabled() {
        let registry = registry();
        let product = registry.require(&"product".into()).unwrap();
        let tree = LayoutBuilder::show("product")
            .field_with("name", FieldOverrides::new().disabled(false))
            .build();
        let root = Expander::new(&registry, product).expand(&tree).unwrap();
        assert!(root.find_field("name").unwrap().disabled);
    }

    #[test]
    fn test_omitted_are_stripped() {
        let registry = registry();
        let product = registry.require(&"product".into()).unwrap();
        let tree = LayoutBuilder::form("product")
            .fields(["name", "inserted_at"])
            .field_with("price", FieldOverrides::new().omitted(true))
            .build();
        let root = Expander::new(&registry, product).expand(&tree).unwrap();
        assert_eq!(root.field_keys(), vec!["name"]);
    }

    #[test]
    fn test_unknown_key_fails() {
        let registry = registry();
        let product = registry.require(&"product".into()).unwrap();
        let tree = LayoutBuilder::form("product").field("colour").build();
        let err = Expander::new(&registry, product).expand(&tree).unwrap_err();
        assert!(matches!(err, Error::UnknownField { ref key, .. } if key == "colour"));
    }

    #[test]
    fn test_association_gets_sibling_columns() {
        let registry = registry();
        let product = registry.require(&"product".into()).unwrap();
        let mut columns = IndexColumns::new();
        columns.insert(
            "product_transaction".into(),
            vec![Field::new("product_transaction", "quantity", FieldType::Decimal)],
        );
        let tree = LayoutBuilder::form("product").field("product_transactions").build();
        let root = Expander::new(&registry, product)
            .with_columns(&columns)
            .expand(&tree)
            .unwrap();
        let field = root.find_field("product_transactions").unwrap();
        let related = field.data.related_resource().unwrap();
        assert_eq!(related.name.as_str(), "product_transaction");
        assert_eq!(related.field_keys(), vec!["quantity"]);
    }
}
