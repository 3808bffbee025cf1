//! # Layout Tree Builder
//!
//! Declarative layouts for the index, form and show views of a resource.
//!
//! - [`LayoutBuilder`] / [`SectionsBuilder`] - block-structured builder API
//! - [`LayoutTree`] - arena of [`LayoutNode`]s with parent/child links
//! - [`LayoutSpec`] - the declared trees of one resource

mod builder;
mod tree;

pub use builder::{default_detail, default_index, LayoutBuilder, SectionsBuilder};
pub use tree::{ContainerOpts, LayoutNode, LayoutTag, LayoutTree, NodeId, SectionsId, TabId};

use crate::error::{Error, Result};
use crate::types::{ResourceName, ViewKind};

/// Declared layouts of one resource. Missing trees are synthesized during
/// expansion.
#[derive(Debug, Clone)]
pub struct LayoutSpec {
    pub resource: ResourceName,
    pub index: Option<LayoutTree>,
    pub form: Option<LayoutTree>,
    pub show: Option<LayoutTree>,
}

impl LayoutSpec {
    pub fn new(resource: impl Into<ResourceName>) -> Self {
        Self {
            resource: resource.into(),
            index: None,
            form: None,
            show: None,
        }
    }

    pub fn index(mut self, tree: LayoutTree) -> Self {
        self.index = Some(tree);
        self
    }

    pub fn form(mut self, tree: LayoutTree) -> Self {
        self.form = Some(tree);
        self
    }

    pub fn show(mut self, tree: LayoutTree) -> Self {
        self.show = Some(tree);
        self
    }

    pub fn tree(&self, view: ViewKind) -> Option<&LayoutTree> {
        match view {
            ViewKind::Index => self.index.as_ref(),
            ViewKind::Form => self.form.as_ref(),
            ViewKind::Show => self.show.as_ref(),
        }
    }

    /// Validate every declared tree and check it sits in the right slot.
    pub fn validate(&self) -> Result<()> {
        for view in ViewKind::ALL {
            let Some(tree) = self.tree(view) else {
                continue;
            };
            if tree.view() != view {
                return Err(Error::layout(
                    self.resource.as_str(),
                    format!("{} layout declared as {}", tree.view(), view),
                ));
            }
            if tree.resource() != &self.resource {
                return Err(Error::layout(
                    self.resource.as_str(),
                    format!("{} layout names resource '{}'", view, tree.resource()),
                ));
            }
            tree.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_rejects_misplaced_tree() {
        let spec = LayoutSpec::new("product").form(LayoutBuilder::show("product").build());
        assert!(matches!(spec.validate(), Err(Error::Layout { .. })));
    }

    #[test]
    fn test_spec_rejects_other_resource() {
        let spec = LayoutSpec::new("product").index(LayoutBuilder::index("order").build());
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_spec_accepts_declared_trees() {
        let spec = LayoutSpec::new("product")
            .index(LayoutBuilder::index("product").fields(["name"]).build())
            .form(LayoutBuilder::form("product").inline(|b| b.field("name")).build());
        assert!(spec.validate().is_ok());
        assert!(spec.tree(ViewKind::Show).is_none());
    }
}
