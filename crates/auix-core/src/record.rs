//! # Records, parameters and change sets
//!
//! The data exchanged with the backend collaborator. Records are schemaless
//! JSON objects; associations are nested objects (to-one) or arrays of
//! objects (to-many), the way a preloading backend returns them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::FieldKey;

/// Primary key of a record, kept in its textual form for routing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret a JSON value as an id. Only strings and numbers qualify.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One backend entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Builder-style setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn id(&self) -> Option<RecordId> {
        self.0.get("id").and_then(RecordId::from_value)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Preloaded to-many association rows. Missing or non-array values yield
    /// no rows.
    pub fn related_many(&self, key: &FieldKey) -> Vec<Record> {
        match self.0.get(key.as_str()) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_object().cloned().map(Record))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Preloaded to-one association.
    pub fn related_one(&self, key: &FieldKey) -> Option<Record> {
        self.0
            .get(key.as_str())
            .and_then(Value::as_object)
            .cloned()
            .map(Record)
    }

    /// Text shown for a value in tables and inputs.
    pub fn display_value(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => other.to_string(),
        }
    }

    /// Overlay every parameter onto a copy of this record.
    pub fn merged(&self, params: &Params) -> Record {
        let mut merged = self.clone();
        for (key, value) in params.iter() {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }
}

/// Submitted form parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Drop every key not in `allowed`.
    pub fn retain_keys(&mut self, allowed: &[FieldKey]) {
        self.0.retain(|k, _| allowed.iter().any(|a| a.as_str() == k));
    }
}

/// A field-keyed validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FieldKey,
    pub message: String,
}

/// What a change set was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    #[default]
    Validate,
    Insert,
    Update,
}

/// A validatable, not yet persisted representation of an edit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    /// The record the changes apply to.
    pub data: Record,
    /// Submitted changes.
    pub changes: Params,
    pub errors: Vec<FieldError>,
    pub action: ChangeAction,
}

impl ChangeSet {
    pub fn new(data: Record, changes: Params) -> Self {
        Self {
            data,
            changes,
            errors: Vec::new(),
            action: ChangeAction::Validate,
        }
    }

    pub fn with_action(mut self, action: ChangeAction) -> Self {
        self.action = action;
        self
    }

    pub fn add_error(&mut self, field: impl Into<FieldKey>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages attached to one field.
    pub fn errors_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field.as_str() == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// The record as it would look with the changes applied.
    pub fn applied(&self) -> Record {
        self.data.merged(&self.changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_from_number_and_string() {
        let record = Record::new().with("id", 7);
        assert_eq!(record.id(), Some(RecordId::new("7")));

        let record = Record::new().with("id", "a1");
        assert_eq!(record.id(), Some(RecordId::new("a1")));

        let record = Record::new().with("id", Value::Null);
        assert_eq!(record.id(), None);
    }

    #[test]
    fn test_related_many_reads_preloaded_rows() {
        let record = Record::new().with(
            "product_transactions",
            json!([{"id": 1, "quantity": 3}, {"id": 2, "quantity": 4}]),
        );
        let rows = record.related_many(&FieldKey::new("product_transactions"));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].display_value("quantity"), "4");
        assert!(record.related_many(&FieldKey::new("missing")).is_empty());
    }

    #[test]
    fn test_change_set_applied_overlays_changes() {
        let data = Record::new().with("name", "Old").with("price", "1.00");
        let changes = Params::new().with("name", "New");
        let mut change_set = ChangeSet::new(data, changes);
        assert!(change_set.is_valid());

        let applied = change_set.applied();
        assert_eq!(applied.display_value("name"), "New");
        assert_eq!(applied.display_value("price"), "1.00");

        change_set.add_error("price", "must be positive");
        assert!(!change_set.is_valid());
        assert_eq!(change_set.errors_for("price"), vec!["must be positive"]);
    }

    #[test]
    fn test_params_retain_keys() {
        let mut params = Params::from_pairs([("name", "Widget"), ("inserted_at", "now")]);
        params.retain_keys(&[FieldKey::new("name")]);
        assert_eq!(params.len(), 1);
        assert_eq!(params.get_str("name"), Some("Widget"));
    }
}
