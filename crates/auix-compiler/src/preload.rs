//! # Preload computation
//!
//! Collects the association edges every expanded view of a resource renders
//! and expands them into nested [`PreloadEntry`] lists, bounded by depth.
//! Each path also tracks the resources it has visited so a cyclic graph
//! never expands the same resource twice on one path.

use std::collections::{BTreeMap, BTreeSet};

use auix_core::{FieldKey, FieldKind, Preload, PreloadEntry, ResourceName};

use crate::view::ViewNode;

/// Association edges `(field, target resource)` per owning resource.
#[derive(Debug, Clone, Default)]
pub struct PreloadGraph {
    edges: BTreeMap<ResourceName, Vec<(FieldKey, ResourceName)>>,
}

impl PreloadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every resolved association field of `root`.
    pub fn collect(&mut self, owner: &ResourceName, root: &ViewNode) {
        let edges = self.edges.entry(owner.clone()).or_default();
        for field in root.fields() {
            if field.kind() != FieldKind::Association {
                continue;
            }
            let Some(target) = field.data.related_resource() else {
                continue;
            };
            if !edges.iter().any(|(k, _)| k == &field.key) {
                edges.push((field.key.clone(), target.name.clone()));
            }
        }
    }

    pub fn edges(&self, owner: &ResourceName) -> &[(FieldKey, ResourceName)] {
        self.edges.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Preload for `owner`, nesting at most `depth` levels.
    pub fn preload_for(&self, owner: &ResourceName, depth: usize) -> Preload {
        let mut visited = BTreeSet::new();
        visited.insert(owner.clone());
        Preload(self.expand(owner, depth, &mut visited))
    }

    fn expand(
        &self,
        owner: &ResourceName,
        depth: usize,
        visited: &mut BTreeSet<ResourceName>,
    ) -> Vec<PreloadEntry> {
        if depth == 0 {
            return Vec::new();
        }
        self.edges(owner)
            .iter()
            .map(|(field, target)| {
                let nested = if depth > 1 && visited.insert(target.clone()) {
                    let nested = self.expand(target, depth - 1, visited);
                    visited.remove(target);
                    nested
                } else {
                    Vec::new()
                };
                PreloadEntry::nested(field.clone(), nested)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> PreloadGraph {
        // product -> transactions -> location -> product
        let mut graph = PreloadGraph::new();
        graph.edges.insert(
            "product".into(),
            vec![("product_transactions".into(), "product_transaction".into())],
        );
        graph.edges.insert(
            "product_transaction".into(),
            vec![
                ("product".into(), "product".into()),
                ("product_location".into(), "product_location".into()),
            ],
        );
        graph.edges.insert(
            "product_location".into(),
            vec![("product_transactions".into(), "product_transaction".into())],
        );
        graph
    }

    #[test]
    fn test_depth_one_has_no_nesting() {
        let preload = graph().preload_for(&"product".into(), 1);
        assert_eq!(preload.0, vec![PreloadEntry::leaf("product_transactions")]);
        assert_eq!(preload.depth(), 1);
    }

    #[test]
    fn test_depth_bound_is_respected() {
        for depth in 1..=5 {
            let preload = graph().preload_for(&"product".into(), depth);
            assert!(preload.depth() <= depth, "depth {} exceeded", depth);
        }
    }

    #[test]
    fn test_visited_resources_are_not_reexpanded() {
        let preload = graph().preload_for(&"product".into(), 5);
        let transactions = preload.get("product_transactions").unwrap();
        let back_to_product = transactions
            .nested
            .iter()
            .find(|e| e.field == "product")
            .unwrap();
        assert!(back_to_product.nested.is_empty());

        let location = transactions
            .nested
            .iter()
            .find(|e| e.field == "product_location")
            .unwrap();
        // product_location -> product_transactions is already on the path.
        assert_eq!(location.nested, vec![PreloadEntry::leaf("product_transactions")]);
    }

    #[test]
    fn test_zero_depth_is_empty() {
        assert!(graph().preload_for(&"product".into(), 0).is_empty());
    }
}
