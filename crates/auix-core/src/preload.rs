//! Eager-loading instructions for backends.

use serde::{Deserialize, Serialize};

use crate::types::FieldKey;

/// One association to fetch, with the associations to fetch on its rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloadEntry {
    pub field: FieldKey,
    pub nested: Vec<PreloadEntry>,
}

impl PreloadEntry {
    pub fn leaf(field: impl Into<FieldKey>) -> Self {
        Self {
            field: field.into(),
            nested: Vec::new(),
        }
    }

    pub fn nested(field: impl Into<FieldKey>, nested: Vec<PreloadEntry>) -> Self {
        Self {
            field: field.into(),
            nested,
        }
    }

    /// Levels of nesting, counting this entry.
    pub fn depth(&self) -> usize {
        1 + self.nested.iter().map(PreloadEntry::depth).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preload(pub Vec<PreloadEntry>);

impl Preload {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[PreloadEntry] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.iter().map(PreloadEntry::depth).max().unwrap_or(0)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn get(&self, field: &str) -> Option<&PreloadEntry> {
        self.0.iter().find(|e| e.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth() {
        assert_eq!(Preload::none().depth(), 0);
        let preload = Preload(vec![
            PreloadEntry::leaf("tags"),
            PreloadEntry::nested("lines", vec![PreloadEntry::leaf("product")]),
        ]);
        assert_eq!(preload.depth(), 2);
        assert!(preload.contains("lines"));
        assert!(!preload.contains("product"));
    }
}
