//! # Resource/Field Parser
//!
//! Introspects a [`SchemaDef`] and produces the ordered [`Field`] list of a
//! resource, plus the sub-resources synthesized for embedded structures.

use tracing::{debug, trace};

use crate::field::{
    label_for, AssociationData, EmbedData, Field, FieldData, FieldType, HtmlType, SelectOption,
};
use crate::schema::{NativeType, SchemaDef};
use crate::types::{FieldKey, ResourceName};

/// Keys that are shown but never editable.
pub const DISABLED_BY_CONVENTION: &[&str] = &["id", "deleted", "deleted_at", "inactive", "deactivated"];

/// Audit keys excluded from generated views.
pub const OMITTED_BY_CONVENTION: &[&str] = &["inserted_at", "updated_at"];

/// Fields of one resource, and of every embedded sub-resource found in it.
#[derive(Debug, Clone)]
pub struct ParsedResource {
    pub name: ResourceName,
    /// Backend entity name, `None` when there is no schema.
    pub entity: Option<String>,
    /// Parent resource for synthesized embedded resources.
    pub embedded_in: Option<ResourceName>,
    pub fields: Vec<Field>,
    pub sub_resources: Vec<ParsedResource>,
}

impl ParsedResource {
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// This resource followed by every sub-resource, depth first.
    pub fn flatten(self) -> Vec<ParsedResource> {
        let mut out = Vec::new();
        let mut pending = vec![self];
        while let Some(mut resource) = pending.pop() {
            let subs = std::mem::take(&mut resource.sub_resources);
            out.push(resource);
            pending.extend(subs.into_iter().rev());
        }
        out
    }
}

/// Parse a resource's schema. A missing schema yields no fields.
pub fn parse_resource(name: &ResourceName, schema: Option<&SchemaDef>) -> ParsedResource {
    parse_with_parent(name, schema, None)
}

fn parse_with_parent(
    name: &ResourceName,
    schema: Option<&SchemaDef>,
    embedded_in: Option<ResourceName>,
) -> ParsedResource {
    let Some(schema) = schema else {
        debug!("Resource '{}' has no schema, no fields parsed", name);
        return ParsedResource {
            name: name.clone(),
            entity: None,
            embedded_in,
            fields: Vec::new(),
            sub_resources: Vec::new(),
        };
    };

    let mut fields = Vec::with_capacity(schema.attributes.len());
    let mut sub_resources = Vec::new();

    for attribute in &schema.attributes {
        let key = FieldKey::new(attribute.name.clone());
        let field = match &attribute.native {
            NativeType::EmbedsOne(embedded) | NativeType::EmbedsMany(embedded) => {
                let sub_name = name.embedded(&key);
                trace!("Embedded resource '{}' found in '{}'", sub_name, name);
                sub_resources.push(parse_with_parent(
                    &sub_name,
                    Some(embedded),
                    Some(name.clone()),
                ));
                embed_field(name, key, &attribute.native, sub_name)
            }
            native => scalar_or_association_field(name, key, native),
        };
        fields.push(field);
    }

    cascade_foreign_keys(&mut fields);

    debug!("Parsed {} fields for resource '{}'", fields.len(), name);

    ParsedResource {
        name: name.clone(),
        entity: Some(schema.entity.clone()),
        embedded_in,
        fields,
        sub_resources,
    }
}

fn scalar_or_association_field(resource: &ResourceName, key: FieldKey, native: &NativeType) -> Field {
    let field_type = classify(native);
    let mut field = Field::new(resource.clone(), key, field_type);

    match native {
        NativeType::Enum(values) => {
            let options: Vec<SelectOption> = values
                .iter()
                .map(|(label, value)| SelectOption::new(label.clone(), value.clone()))
                .collect();
            field.length = options.iter().map(|o| o.label.chars().count() as u32).max();
            field.data = FieldData::Select { options };
        }
        NativeType::BelongsTo {
            related,
            owner_key,
            related_key,
        }
        | NativeType::HasOne {
            related,
            owner_key,
            related_key,
        } => {
            field.html_type = HtmlType::Unimplemented;
            field.data = FieldData::Association(AssociationData::new(
                related.clone(),
                related_key.clone(),
                owner_key.clone(),
            ));
        }
        NativeType::HasMany {
            related,
            owner_key,
            related_key,
        } => {
            field.html_type = HtmlType::Unimplemented;
            field.label = combined_label(resource, &field.key);
            field.data = FieldData::Association(AssociationData::new(
                related.clone(),
                related_key.clone(),
                owner_key.clone(),
            ));
        }
        _ => {}
    }

    let key = field.key.as_str();
    if DISABLED_BY_CONVENTION.contains(&key) {
        field.disabled = true;
    }
    if OMITTED_BY_CONVENTION.contains(&key) {
        field.omitted = true;
    }
    field
}

fn embed_field(
    resource: &ResourceName,
    key: FieldKey,
    native: &NativeType,
    sub_name: ResourceName,
) -> Field {
    let mut field = Field::new(resource.clone(), key, classify(native));
    field.label = combined_label(resource, &field.key);
    field.data = FieldData::Embed(EmbedData {
        related: sub_name,
        owner: resource.clone(),
        resource: None,
    });
    field
}

/// Map a native type to its semantic field type.
pub fn classify(native: &NativeType) -> FieldType {
    match native {
        NativeType::Id => FieldType::Id,
        NativeType::BinaryId => FieldType::BinaryId,
        NativeType::String => FieldType::String,
        NativeType::Text => FieldType::Text,
        NativeType::Integer => FieldType::Integer,
        NativeType::Float => FieldType::Float,
        NativeType::Decimal => FieldType::Decimal,
        NativeType::Boolean => FieldType::Boolean,
        NativeType::Date => FieldType::Date,
        NativeType::Time => FieldType::Time,
        NativeType::NaiveDatetime => FieldType::NaiveDatetime,
        NativeType::UtcDatetime => FieldType::UtcDatetime,
        NativeType::Enum(_) => FieldType::Enum,
        NativeType::Map => FieldType::Map,
        NativeType::Array(_) => FieldType::Array,
        NativeType::BelongsTo { .. } => FieldType::BelongsTo,
        NativeType::HasOne { .. } => FieldType::HasOne,
        NativeType::HasMany { .. } => FieldType::HasMany,
        NativeType::EmbedsOne(_) => FieldType::EmbedsOne,
        NativeType::EmbedsMany(_) => FieldType::EmbedsMany,
        NativeType::Other(name) => FieldType::Unsupported(name.clone()),
    }
}

/// Owning resource name followed by the key, without repeating the
/// resource prefix: (`product`, `product_transactions`) → "Product Transactions".
fn combined_label(resource: &ResourceName, key: &FieldKey) -> String {
    let prefix = format!("{}_", resource.as_str());
    let rest = key.as_str().strip_prefix(&prefix).unwrap_or(key.as_str());
    format!("{} {}", label_for(resource.as_str()), label_for(rest))
}

/// Copy the foreign key column's dimensions onto belongs-to associations.
fn cascade_foreign_keys(fields: &mut [Field]) {
    let snapshots: Vec<(FieldKey, Option<u32>, Option<u32>, Option<u32>, String)> = fields
        .iter()
        .map(|f| {
            (
                f.key.clone(),
                f.length,
                f.precision,
                f.scale,
                f.placeholder.clone(),
            )
        })
        .collect();

    for field in fields.iter_mut() {
        if field.field_type != FieldType::BelongsTo {
            continue;
        }
        let Some(owner_key) = field.data.association().map(|d| d.owner_key.clone()) else {
            continue;
        };
        if let Some((_, length, precision, scale, placeholder)) =
            snapshots.iter().find(|(k, ..)| *k == owner_key)
        {
            field.length = *length;
            field.precision = *precision;
            field.scale = *scale;
            field.placeholder = placeholder.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;

    fn product_schema() -> SchemaDef {
        SchemaDef::new("Product", "products")
            .attr("reference", NativeType::String)
            .attr("name", NativeType::String)
            .attr("quantity_at_hand", NativeType::Decimal)
            .attr("deleted", NativeType::Boolean)
            .attr(
                "status",
                NativeType::Enum(vec![
                    ("Active".into(), "active".into()),
                    ("Discontinued".into(), "discontinued".into()),
                ]),
            )
            .has_many("product_transactions", "ProductTransaction", "product_id")
            .embeds_many(
                "embeds_many",
                SchemaDef::embedded("Lot").attr("code", NativeType::String),
            )
            .attr("location", NativeType::Other("geometry".into()))
            .timestamps()
    }

    #[test]
    fn test_no_schema_yields_empty_fields() {
        let parsed = parse_resource(&ResourceName::new("ghost"), None);
        assert!(parsed.fields.is_empty());
        assert!(parsed.entity.is_none());
    }

    #[test]
    fn test_fields_in_declaration_order() {
        let parsed = parse_resource(&ResourceName::new("product"), Some(&product_schema()));
        let keys: Vec<&str> = parsed.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "id",
                "reference",
                "name",
                "quantity_at_hand",
                "deleted",
                "status",
                "product_transactions",
                "embeds_many",
                "location",
                "inserted_at",
                "updated_at"
            ]
        );
    }

    #[test]
    fn test_conventions() {
        let parsed = parse_resource(&ResourceName::new("product"), Some(&product_schema()));
        assert!(parsed.field("id").unwrap().disabled);
        assert!(parsed.field("deleted").unwrap().disabled);
        assert!(parsed.field("inserted_at").unwrap().omitted);
        assert!(parsed.field("updated_at").unwrap().omitted);
        assert!(!parsed.field("name").unwrap().omitted);
        assert_eq!(parsed.field("name").unwrap().placeholder, "Name");
        assert_eq!(parsed.field("quantity_at_hand").unwrap().placeholder, "0.00");
    }

    #[test]
    fn test_enum_length_from_longest_label() {
        let parsed = parse_resource(&ResourceName::new("product"), Some(&product_schema()));
        let status = parsed.field("status").unwrap();
        assert_eq!(status.html_type, HtmlType::Select);
        assert_eq!(status.length, Some("Discontinued".len() as u32));
    }

    #[test]
    fn test_unsupported_type_is_inert() {
        let parsed = parse_resource(&ResourceName::new("product"), Some(&product_schema()));
        let location = parsed.field("location").unwrap();
        assert_eq!(location.field_type, FieldType::Unsupported("geometry".into()));
        assert_eq!(location.html_type, HtmlType::Unimplemented);
    }

    #[test]
    fn test_has_many_linkage_and_label() {
        let parsed = parse_resource(&ResourceName::new("product"), Some(&product_schema()));
        let field = parsed.field("product_transactions").unwrap();
        assert_eq!(field.kind(), FieldKind::Association);
        assert_eq!(field.html_type, HtmlType::Unimplemented);
        assert_eq!(field.label, "Product Transactions");
        let data = field.data.association().unwrap();
        assert_eq!(data.related, "ProductTransaction");
        assert_eq!(data.related_key, "product_id");
        assert_eq!(data.owner_key, "id");
    }

    #[test]
    fn test_embeds_register_sub_resource() {
        let parsed = parse_resource(&ResourceName::new("product"), Some(&product_schema()));
        let field = parsed.field("embeds_many").unwrap();
        assert_eq!(field.label, "Product Embeds Many");
        let data = field.data.embed().unwrap();
        assert_eq!(data.related.as_str(), "product__embeds_many");
        assert_eq!(data.owner.as_str(), "product");

        assert_eq!(parsed.sub_resources.len(), 1);
        let sub = &parsed.sub_resources[0];
        assert_eq!(sub.name.as_str(), "product__embeds_many");
        assert_eq!(sub.embedded_in.as_ref().unwrap().as_str(), "product");
        assert!(sub.field("code").is_some());

        let flat = parsed.clone().flatten();
        assert_eq!(flat.len(), 2);
    }

    #[test]
    fn test_belongs_to_cascades_foreign_key() {
        let schema = SchemaDef::new("ProductTransaction", "product_transactions")
            .attr("quantity", NativeType::Decimal)
            .belongs_to("product", "Product");
        let parsed = parse_resource(&ResourceName::new("product_transaction"), Some(&schema));
        let product = parsed.field("product").unwrap();
        let fk = parsed.field("product_id").unwrap();
        assert_eq!(product.field_type, FieldType::BelongsTo);
        assert_eq!(product.length, fk.length);
        assert_eq!(product.placeholder, fk.placeholder);
        assert_eq!(product.label, "Product");
    }
}
