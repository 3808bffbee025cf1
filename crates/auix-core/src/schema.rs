//! # Backend schema descriptions
//!
//! A [`SchemaDef`] describes a backend entity the way its persistence layer
//! declares it: an ordered list of attributes with native types, including
//! associations and embedded structures. The field parser turns it into
//! [`Field`](crate::field::Field)s.

use serde::{Deserialize, Serialize};

/// Native (backend) type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeType {
    Id,
    BinaryId,
    String,
    Text,
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    Time,
    NaiveDatetime,
    UtcDatetime,
    /// Enumerated values as `(label, value)` pairs.
    Enum(Vec<(String, String)>),
    Map,
    Array(Box<NativeType>),
    BelongsTo {
        related: String,
        owner_key: String,
        related_key: String,
    },
    HasOne {
        related: String,
        owner_key: String,
        related_key: String,
    },
    HasMany {
        related: String,
        owner_key: String,
        related_key: String,
    },
    EmbedsOne(Box<SchemaDef>),
    EmbedsMany(Box<SchemaDef>),
    /// Anything the parser has no mapping for.
    Other(String),
}

/// One declared attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub native: NativeType,
}

/// Description of a backend entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDef {
    /// Entity name, used to match association targets (e.g. `Product`).
    pub entity: String,
    /// Plural storage name (e.g. `products`), used for routes and naming
    /// conventions.
    pub source: String,
    pub primary_key: String,
    pub attributes: Vec<Attribute>,
}

impl SchemaDef {
    /// Schema with an `id` primary key attribute.
    pub fn new(entity: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            source: source.into(),
            primary_key: "id".to_string(),
            attributes: vec![Attribute {
                name: "id".to_string(),
                native: NativeType::Id,
            }],
        }
    }

    /// Schema without a primary key, as used for embedded structures.
    pub fn embedded(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            source: String::new(),
            primary_key: String::new(),
            attributes: Vec::new(),
        }
    }

    pub fn binary_id(mut self) -> Self {
        let primary_key = self.primary_key.clone();
        if let Some(pk) = self.attributes.iter_mut().find(|a| a.name == primary_key) {
            pk.native = NativeType::BinaryId;
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, native: NativeType) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            native,
        });
        self
    }

    /// `<name>_id` foreign key plus the belongs-to association.
    pub fn belongs_to(self, name: &str, related: impl Into<String>) -> Self {
        let owner_key = format!("{}_id", name);
        self.attr(owner_key.clone(), NativeType::Id).attr(
            name,
            NativeType::BelongsTo {
                related: related.into(),
                owner_key,
                related_key: "id".to_string(),
            },
        )
    }

    pub fn has_many(
        self,
        name: &str,
        related: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.attr(
            name,
            NativeType::HasMany {
                related: related.into(),
                owner_key: "id".to_string(),
                related_key: foreign_key.into(),
            },
        )
    }

    pub fn embeds_one(self, name: &str, schema: SchemaDef) -> Self {
        self.attr(name, NativeType::EmbedsOne(Box::new(schema)))
    }

    pub fn embeds_many(self, name: &str, schema: SchemaDef) -> Self {
        self.attr(name, NativeType::EmbedsMany(Box::new(schema)))
    }

    /// `inserted_at` / `updated_at` audit columns.
    pub fn timestamps(self) -> Self {
        self.attr("inserted_at", NativeType::NaiveDatetime)
            .attr("updated_at", NativeType::NaiveDatetime)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Singular form of the source, used for naming conventions.
    pub fn singular(&self) -> String {
        singularize(&self.source)
    }
}

/// Implemented by types that can describe their backend schema.
pub trait HasSchema {
    fn schema() -> SchemaDef;
}

/// Naive English singular: `categories` → `category`, `boxes` → `box`,
/// `products` → `product`.
pub fn singularize(plural: &str) -> String {
    if let Some(stem) = plural.strip_suffix("ies") {
        format!("{}y", stem)
    } else if plural.ends_with("ses") || plural.ends_with("xes") || plural.ends_with("ches") {
        plural[..plural.len() - 2].to_string()
    } else if let Some(stem) = plural.strip_suffix('s') {
        stem.to_string()
    } else {
        plural.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_belongs_to_adds_foreign_key() {
        let schema = SchemaDef::new("ProductTransaction", "product_transactions")
            .belongs_to("product", "Product");
        assert_eq!(schema.attribute("product_id").unwrap().native, NativeType::Id);
        assert!(matches!(
            schema.attribute("product").unwrap().native,
            NativeType::BelongsTo { ref owner_key, .. } if owner_key == "product_id"
        ));
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("products"), "product");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("stock"), "stock");
    }

    #[test]
    fn test_binary_id_changes_primary_key() {
        let schema = SchemaDef::new("Account", "accounts").binary_id();
        assert_eq!(schema.attribute("id").unwrap().native, NativeType::BinaryId);
    }
}
