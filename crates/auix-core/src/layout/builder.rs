//! Stack-based layout builder.
//!
//! Entering a block appends a node and makes it the cursor; the closure
//! returns the builder and the cursor moves back to the parent. Blocks are
//! therefore always terminated.

use crate::actions::ActionModification;
use crate::field::FieldOverrides;
use crate::types::{FieldKey, ResourceName, ViewKind};

use super::tree::{LayoutTag, LayoutTree, NodeId, SectionsId, TabId};

/// Builds one [`LayoutTree`].
///
/// ```
/// use auix_core::layout::LayoutBuilder;
///
/// let form = LayoutBuilder::form("product")
///     .inline(|b| b.fields(["name", "price"]))
///     .sections(|s| {
///         s.section("Quantities", |b| b.field("quantity_at_hand"))
///             .section("Prices", |b| b.field("unit_price"))
///     })
///     .build();
/// assert_eq!(form.field_refs().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct LayoutBuilder {
    tree: LayoutTree,
    cursor: NodeId,
    sections_seen: usize,
}

impl LayoutBuilder {
    pub fn new(view: ViewKind, name: impl Into<ResourceName>) -> Self {
        Self {
            tree: LayoutTree::new(view, name),
            cursor: NodeId::ROOT,
            sections_seen: 0,
        }
    }

    pub fn index(name: impl Into<ResourceName>) -> Self {
        Self::new(ViewKind::Index, name)
    }

    pub fn form(name: impl Into<ResourceName>) -> Self {
        Self::new(ViewKind::Form, name)
    }

    pub fn show(name: impl Into<ResourceName>) -> Self {
        Self::new(ViewKind::Show, name)
    }

    // ─────────────────────────────────────────────────────────
    // Container options (apply to the current block)
    // ─────────────────────────────────────────────────────────

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.tree.node_mut(self.cursor).opts.title = Some(title.into());
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.tree.node_mut(self.cursor).opts.subtitle = Some(subtitle.into());
        self
    }

    pub fn action(mut self, modification: ActionModification) -> Self {
        self.tree
            .node_mut(self.cursor)
            .opts
            .actions
            .push(modification);
        self
    }

    // ─────────────────────────────────────────────────────────
    // Fields
    // ─────────────────────────────────────────────────────────

    pub fn field(self, key: impl Into<FieldKey>) -> Self {
        self.field_with(key, FieldOverrides::default())
    }

    pub fn field_with(mut self, key: impl Into<FieldKey>, overrides: FieldOverrides) -> Self {
        self.tree.push(
            self.cursor,
            LayoutTag::Field {
                key: key.into(),
                overrides,
            },
        );
        self
    }

    pub fn fields<K: Into<FieldKey>>(self, keys: impl IntoIterator<Item = K>) -> Self {
        keys.into_iter().fold(self, |b, key| b.field(key))
    }

    // ─────────────────────────────────────────────────────────
    // Blocks
    // ─────────────────────────────────────────────────────────

    pub fn inline(self, block: impl FnOnce(LayoutBuilder) -> LayoutBuilder) -> Self {
        self.block(LayoutTag::Inline, block)
    }

    pub fn stacked(self, block: impl FnOnce(LayoutBuilder) -> LayoutBuilder) -> Self {
        self.block(LayoutTag::Stacked, block)
    }

    pub fn group(
        self,
        title: impl Into<String>,
        block: impl FnOnce(LayoutBuilder) -> LayoutBuilder,
    ) -> Self {
        self.block(
            LayoutTag::Group {
                title: title.into(),
            },
            block,
        )
    }

    /// A tab strip. The section marked default, or the first one, is the
    /// initially visible tab.
    pub fn sections(mut self, block: impl FnOnce(SectionsBuilder) -> SectionsBuilder) -> Self {
        let id = SectionsId::for_block(self.tree.resource(), self.tree.view(), self.sections_seen);
        self.sections_seen += 1;

        let parent = self.cursor;
        let node = self.tree.push(parent, LayoutTag::Sections { id: id.clone() });
        self.cursor = node;

        let sections = block(SectionsBuilder {
            inner: self,
            id,
            count: 0,
        });
        let mut this = sections.inner;

        let children = this.tree.node(node).children.clone();
        let has_default = children.iter().any(|c| {
            matches!(
                this.tree.node(*c).tag,
                LayoutTag::Section { default: true, .. }
            )
        });
        if !has_default {
            if let Some(first) = children.first() {
                if let LayoutTag::Section { default, .. } = &mut this.tree.node_mut(*first).tag {
                    *default = true;
                }
            }
        }

        this.cursor = parent;
        this
    }

    fn block(mut self, tag: LayoutTag, block: impl FnOnce(LayoutBuilder) -> LayoutBuilder) -> Self {
        let parent = self.cursor;
        self.cursor = self.tree.push(parent, tag);
        let mut this = block(self);
        this.cursor = parent;
        this
    }

    pub fn build(self) -> LayoutTree {
        self.tree
    }
}

/// Builder for the inside of a `sections` block; only sections may be added.
#[derive(Debug)]
pub struct SectionsBuilder {
    inner: LayoutBuilder,
    id: SectionsId,
    count: usize,
}

impl SectionsBuilder {
    pub fn section(
        self,
        title: impl Into<String>,
        block: impl FnOnce(LayoutBuilder) -> LayoutBuilder,
    ) -> Self {
        self.push_section(title.into(), false, block)
    }

    /// A section that is visible before any tab is selected.
    pub fn default_section(
        self,
        title: impl Into<String>,
        block: impl FnOnce(LayoutBuilder) -> LayoutBuilder,
    ) -> Self {
        self.push_section(title.into(), true, block)
    }

    fn push_section(
        mut self,
        title: String,
        default: bool,
        block: impl FnOnce(LayoutBuilder) -> LayoutBuilder,
    ) -> Self {
        let tab_id = TabId::for_section(&self.id, self.count);
        self.count += 1;
        let tag = LayoutTag::Section {
            sections_id: self.id.clone(),
            tab_id,
            title,
            default,
        };
        self.inner = self.inner.block(tag, block);
        self
    }
}

/// Synthesized index: every given key as a column.
pub fn default_index(name: &ResourceName, keys: &[FieldKey]) -> LayoutTree {
    LayoutBuilder::index(name.clone())
        .fields(keys.iter().cloned())
        .build()
}

/// Synthesized form or show: one inline block with every given key.
pub fn default_detail(view: ViewKind, name: &ResourceName, keys: &[FieldKey]) -> LayoutTree {
    LayoutBuilder::new(view, name.clone())
        .inline(|b| b.fields(keys.iter().cloned()))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Action, ActionGroup};
    use crate::markup::Markup;

    #[test]
    fn test_nested_blocks_restore_cursor() {
        let tree = LayoutBuilder::form("product")
            .group("Main", |b| b.inline(|b| b.field("name")).field("price"))
            .field("notes")
            .build();

        let root = tree.root();
        assert_eq!(root.children.len(), 2);
        let group = tree.node(root.children[0]);
        assert!(matches!(group.tag, LayoutTag::Group { ref title } if title == "Main"));
        assert_eq!(group.children.len(), 2);
        assert!(matches!(
            tree.node(root.children[1]).tag,
            LayoutTag::Field { ref key, .. } if key == "notes"
        ));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_sections_ids_and_default() {
        let tree = LayoutBuilder::form("product")
            .sections(|s| {
                s.section("Quantities", |b| b.field("quantity"))
                    .section("Prices", |b| b.field("price"))
            })
            .sections(|s| s.default_section("A", |b| b).section("B", |b| b))
            .build();

        let sections: Vec<(String, String, bool)> = tree
            .preorder()
            .into_iter()
            .filter_map(|id| match &tree.node(id).tag {
                LayoutTag::Section {
                    tab_id,
                    title,
                    default,
                    ..
                } => Some((tab_id.to_string(), title.clone(), *default)),
                _ => None,
            })
            .collect();

        assert_eq!(
            sections,
            vec![
                ("product-form-sections-0-tab-0".to_string(), "Quantities".to_string(), true),
                ("product-form-sections-0-tab-1".to_string(), "Prices".to_string(), false),
                ("product-form-sections-1-tab-0".to_string(), "A".to_string(), true),
                ("product-form-sections-1-tab-1".to_string(), "B".to_string(), false),
            ]
        );
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_explicit_default_is_kept() {
        let tree = LayoutBuilder::form("product")
            .sections(|s| s.section("A", |b| b).default_section("B", |b| b))
            .build();
        let defaults: Vec<bool> = tree
            .preorder()
            .into_iter()
            .filter_map(|id| match &tree.node(id).tag {
                LayoutTag::Section { default, .. } => Some(*default),
                _ => None,
            })
            .collect();
        assert_eq!(defaults, vec![false, true]);
    }

    #[test]
    fn test_root_options() {
        let tree = LayoutBuilder::index("product")
            .title("Products")
            .action(ActionModification::add(
                ActionGroup::IndexHeader,
                Action::new("export", |_| Markup::text("Export")),
            ))
            .fields(["name"])
            .build();
        assert_eq!(tree.root().opts.title.as_deref(), Some("Products"));
        assert_eq!(tree.root().opts.actions.len(), 1);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_action_group_validated_against_view() {
        let tree = LayoutBuilder::form("product")
            .action(ActionModification::remove(ActionGroup::IndexRow, "edit"))
            .build();
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_default_layouts() {
        let keys = vec![FieldKey::new("name"), FieldKey::new("price")];
        let name = ResourceName::new("product");
        let index = default_index(&name, &keys);
        assert_eq!(index.root().children.len(), 2);

        let form = default_detail(ViewKind::Form, &name, &keys);
        assert_eq!(form.root().children.len(), 1);
        let inline = form.node(form.root().children[0]);
        assert!(matches!(inline.tag, LayoutTag::Inline));
        assert_eq!(inline.children.len(), 2);
    }
}
