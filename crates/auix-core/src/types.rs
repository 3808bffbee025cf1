//! Identifier types shared by every auix crate

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a configured resource (e.g. `product`, `product__embeds_many`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceName(String);

impl ResourceName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the resource synthesized for an embedded field of this one.
    pub fn embedded(&self, field: &FieldKey) -> ResourceName {
        ResourceName(format!("{}__{}", self.0, field.as_str()))
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ResourceName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Key of a field within its resource.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldKey(String);

impl FieldKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for FieldKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FieldKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// The three generated views of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Index,
    Show,
    Form,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [ViewKind::Index, ViewKind::Show, ViewKind::Form];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Index => "index",
            ViewKind::Show => "show",
            ViewKind::Form => "form",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_resource_name() {
        let parent = ResourceName::new("product");
        let sub = parent.embedded(&FieldKey::new("embeds_many"));
        assert_eq!(sub.as_str(), "product__embeds_many");
    }

    #[test]
    fn test_field_key_compares_with_str() {
        let key = FieldKey::new("price");
        assert!(key == "price");
        assert_eq!(key.to_string(), "price");
    }
}
