//! Arena-backed layout tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actions::ActionModification;
use crate::error::{Error, Result};
use crate::field::FieldOverrides;
use crate::types::{FieldKey, ResourceName, ViewKind};

/// Index of a node in its [`LayoutTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Identity of one `sections` block: `<resource>-<view>-sections-<n>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionsId(String);

impl SectionsId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn for_block(resource: &ResourceName, view: ViewKind, n: usize) -> Self {
        Self(format!("{}-{}-sections-{}", resource, view, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one tab: `<sections_id>-tab-<i>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn for_section(sections: &SectionsId, i: usize) -> Self {
        Self(format!("{}-tab-{}", sections, i))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Options any container node may carry.
#[derive(Debug, Clone, Default)]
pub struct ContainerOpts {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub actions: Vec<ActionModification>,
}

#[derive(Debug, Clone)]
pub enum LayoutTag {
    /// `index`, `form` or `show` container.
    Root { view: ViewKind, name: ResourceName },
    Inline,
    Stacked,
    Group { title: String },
    Sections { id: SectionsId },
    Section {
        sections_id: SectionsId,
        tab_id: TabId,
        title: String,
        default: bool,
    },
    Field {
        key: FieldKey,
        overrides: FieldOverrides,
    },
}

impl LayoutTag {
    pub fn name(&self) -> &'static str {
        match self {
            LayoutTag::Root { view, .. } => view.as_str(),
            LayoutTag::Inline => "inline",
            LayoutTag::Stacked => "stacked",
            LayoutTag::Group { .. } => "group",
            LayoutTag::Sections { .. } => "sections",
            LayoutTag::Section { .. } => "section",
            LayoutTag::Field { .. } => "field",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub tag: LayoutTag,
    pub opts: ContainerOpts,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// A layout declared for one view of one resource.
///
/// Node 0 is always the root container. Nodes are appended in document
/// order and never removed.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
}

impl LayoutTree {
    pub fn new(view: ViewKind, name: impl Into<ResourceName>) -> Self {
        Self {
            nodes: vec![LayoutNode {
                tag: LayoutTag::Root {
                    view,
                    name: name.into(),
                },
                opts: ContainerOpts::default(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> &LayoutNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> &LayoutNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut LayoutNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn view(&self) -> ViewKind {
        match &self.root().tag {
            LayoutTag::Root { view, .. } => *view,
            _ => unreachable!("node 0 is always the root container"),
        }
    }

    pub fn resource(&self) -> &ResourceName {
        match &self.root().tag {
            LayoutTag::Root { name, .. } => name,
            _ => unreachable!("node 0 is always the root container"),
        }
    }

    /// Append a child under `parent`.
    pub fn push(&mut self, parent: NodeId, tag: LayoutTag) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(LayoutNode {
            tag,
            opts: ContainerOpts::default(),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Node ids in document (pre-)order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut pending = vec![NodeId::ROOT];
        while let Some(id) = pending.pop() {
            out.push(id);
            pending.extend(self.nodes[id.0].children.iter().rev());
        }
        out
    }

    /// `(key, overrides)` of every field reference in document order.
    pub fn field_refs(&self) -> Vec<(&FieldKey, &FieldOverrides)> {
        self.preorder()
            .into_iter()
            .filter_map(|id| match &self.nodes[id.0].tag {
                LayoutTag::Field { key, overrides } => Some((key, overrides)),
                _ => None,
            })
            .collect()
    }

    /// Same structure under another view. Sections and tab ids are
    /// re-derived for the new view so tab state never collides.
    pub fn relabel(&self, view: ViewKind) -> LayoutTree {
        let from = format!("-{}-sections-", self.view());
        let to = format!("-{}-sections-", view);
        let mut tree = self.clone();
        for node in &mut tree.nodes {
            match &mut node.tag {
                LayoutTag::Root { view: v, .. } => *v = view,
                LayoutTag::Sections { id } => *id = SectionsId(id.0.replacen(&from, &to, 1)),
                LayoutTag::Section {
                    sections_id,
                    tab_id,
                    ..
                } => {
                    *sections_id = SectionsId(sections_id.0.replacen(&from, &to, 1));
                    *tab_id = TabId(tab_id.0.replacen(&from, &to, 1));
                }
                _ => {}
            }
        }
        // Actions are view specific and do not carry over.
        for node in &mut tree.nodes {
            node.opts.actions.clear();
        }
        tree
    }

    /// Structural checks.
    pub fn validate(&self) -> Result<()> {
        let resource = self.resource().to_string();
        let fail = |message: String| Err(Error::layout(resource.clone(), message));

        if self.resource().as_str().is_empty() {
            return fail(format!("{} container has no resource name", self.view()));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            let parent_tag = node.parent.map(|p| &self.nodes[p.0].tag);
            match &node.tag {
                LayoutTag::Root { .. } if i != 0 => {
                    return fail("view container nested inside another layout".into())
                }
                LayoutTag::Section { title, .. } => {
                    if !matches!(parent_tag, Some(LayoutTag::Sections { .. })) {
                        return fail(format!("section '{}' is not inside sections", title));
                    }
                }
                LayoutTag::Sections { id } => {
                    let mut defaults = 0;
                    for child in &node.children {
                        match &self.nodes[child.0].tag {
                            LayoutTag::Section { default, .. } => {
                                defaults += usize::from(*default)
                            }
                            other => {
                                return fail(format!(
                                    "sections '{}' contains {}, only section is allowed",
                                    id,
                                    other.name()
                                ))
                            }
                        }
                    }
                    if defaults > 1 {
                        return fail(format!("sections '{}' has {} default sections", id, defaults));
                    }
                }
                LayoutTag::Field { key, .. } if !node.children.is_empty() => {
                    return fail(format!("field '{}' has children", key));
                }
                _ => {}
            }

            if self.view() == ViewKind::Index && node.parent == Some(NodeId::ROOT) {
                if !matches!(node.tag, LayoutTag::Field { .. }) {
                    return fail(format!(
                        "index layouts list columns only, found {}",
                        node.tag.name()
                    ));
                }
            }

            for modification in &node.opts.actions {
                modification.validate_for(self.view())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(key: &str) -> LayoutTag {
        LayoutTag::Field {
            key: FieldKey::new(key),
            overrides: FieldOverrides::default(),
        }
    }

    #[test]
    fn test_push_links_parent_and_children() {
        let mut tree = LayoutTree::new(ViewKind::Form, "product");
        let inline = tree.push(NodeId::ROOT, LayoutTag::Inline);
        let name = tree.push(inline, field("name"));
        assert_eq!(tree.node(name).parent, Some(inline));
        assert_eq!(tree.root().children, vec![inline]);
        assert_eq!(tree.preorder(), vec![NodeId::ROOT, inline, name]);
    }

    #[test]
    fn test_field_refs_in_document_order() {
        let mut tree = LayoutTree::new(ViewKind::Form, "product");
        let group = tree.push(NodeId::ROOT, LayoutTag::Group { title: "A".into() });
        tree.push(group, field("name"));
        tree.push(NodeId::ROOT, field("price"));
        let keys: Vec<&str> = tree.field_refs().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["name", "price"]);
    }

    #[test]
    fn test_validate_rejects_non_section_in_sections() {
        let mut tree = LayoutTree::new(ViewKind::Form, "product");
        let sections = tree.push(
            NodeId::ROOT,
            LayoutTag::Sections {
                id: SectionsId::new("s"),
            },
        );
        tree.push(sections, field("name"));
        assert!(matches!(tree.validate(), Err(Error::Layout { .. })));
    }

    #[test]
    fn test_validate_rejects_containers_in_index() {
        let mut tree = LayoutTree::new(ViewKind::Index, "product");
        tree.push(NodeId::ROOT, LayoutTag::Inline);
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_relabel_rewrites_view_and_tab_ids() {
        let mut tree = LayoutTree::new(ViewKind::Form, "product");
        let resource = ResourceName::new("product");
        let sid = SectionsId::for_block(&resource, ViewKind::Form, 0);
        let sections = tree.push(NodeId::ROOT, LayoutTag::Sections { id: sid.clone() });
        tree.push(
            sections,
            LayoutTag::Section {
                tab_id: TabId::for_section(&sid, 0),
                sections_id: sid,
                title: "Main".into(),
                default: true,
            },
        );

        let show = tree.relabel(ViewKind::Show);
        assert_eq!(show.view(), ViewKind::Show);
        match &show.node(sections).tag {
            LayoutTag::Sections { id } => assert_eq!(id.as_str(), "product-show-sections-0"),
            other => panic!("unexpected {:?}", other),
        }
        match &show.node(NodeId(2)).tag {
            LayoutTag::Section { tab_id, .. } => {
                assert_eq!(tab_id.as_str(), "product-show-sections-0-tab-0")
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
