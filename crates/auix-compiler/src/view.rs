//! Compiled, frozen view configuration.

use std::collections::BTreeMap;
use std::sync::Arc;

use auix_connector::Connector;
use auix_core::{
    ActionSet, Field, FieldKey, FieldKind, FieldType, Preload, ResourceName, SectionsId, TabId,
    ViewKind,
};

/// Tag of an expanded layout node.
#[derive(Debug, Clone)]
pub enum ViewTag {
    Index,
    Form,
    Show,
    Inline,
    Stacked,
    Group {
        title: String,
    },
    Sections {
        id: SectionsId,
    },
    Section {
        sections_id: SectionsId,
        tab_id: TabId,
        title: String,
        default: bool,
    },
    /// A fully resolved field, overrides applied.
    Field(Box<Field>),
}

impl ViewTag {
    pub fn name(&self) -> &'static str {
        match self {
            ViewTag::Index => "index",
            ViewTag::Form => "form",
            ViewTag::Show => "show",
            ViewTag::Inline => "inline",
            ViewTag::Stacked => "stacked",
            ViewTag::Group { .. } => "group",
            ViewTag::Sections { .. } => "sections",
            ViewTag::Section { .. } => "section",
            ViewTag::Field(_) => "field",
        }
    }
}

/// One node of an expanded layout tree.
#[derive(Debug, Clone)]
pub struct ViewNode {
    pub tag: ViewTag,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub children: Vec<ViewNode>,
}

impl ViewNode {
    pub fn new(tag: ViewTag) -> Self {
        Self {
            tag,
            title: None,
            subtitle: None,
            children: Vec::new(),
        }
    }

    pub fn field(&self) -> Option<&Field> {
        match &self.tag {
            ViewTag::Field(field) => Some(field),
            _ => None,
        }
    }

    /// Every field in document order.
    pub fn fields(&self) -> Vec<&Field> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a Field>) {
        if let Some(field) = self.field() {
            out.push(field);
        }
        for child in &self.children {
            child.collect_fields(out);
        }
    }

    pub fn field_keys(&self) -> Vec<&str> {
        self.fields().into_iter().map(|f| f.key.as_str()).collect()
    }

    /// First field with `key`.
    pub fn find_field(&self, key: &str) -> Option<&Field> {
        self.fields().into_iter().find(|f| f.key == key)
    }

    /// Nodes in document order matching `predicate`.
    pub fn find_all(&self, predicate: &dyn Fn(&ViewNode) -> bool) -> Vec<&ViewNode> {
        let mut out = Vec::new();
        self.walk(predicate, &mut out);
        out
    }

    fn walk<'a>(&'a self, predicate: &dyn Fn(&ViewNode) -> bool, out: &mut Vec<&'a ViewNode>) {
        if predicate(self) {
            out.push(self);
        }
        for child in &self.children {
            child.walk(predicate, out);
        }
    }
}

/// Everything a generated view needs at runtime.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub kind: ViewKind,
    pub resource: ResourceName,
    pub title: String,
    /// Route prefix of the resource, e.g. `/products`.
    pub path: String,
    pub root: ViewNode,
    pub actions: ActionSet,
    pub preload: Preload,
    /// Whether a to-many table or embeds-many list appears in the tree.
    pub renders_one_to_many: bool,
    /// Initially visible tab of each sections block.
    pub default_tabs: BTreeMap<SectionsId, TabId>,
}

impl ViewConfig {
    pub fn fields(&self) -> Vec<&Field> {
        self.root.fields()
    }

    /// Keys a form may submit: every rendered, editable scalar or embed.
    pub fn submittable_keys(&self) -> Vec<FieldKey> {
        self.fields()
            .into_iter()
            .filter(|f| f.is_editable() && f.kind() != FieldKind::Association)
            .map(|f| f.key.clone())
            .chain(
                // Foreign keys behind rendered belongs-to selects.
                self.fields()
                    .into_iter()
                    .filter(|f| f.field_type == FieldType::BelongsTo && f.is_editable())
                    .filter_map(|f| f.data.association().map(|d| d.owner_key.clone())),
            )
            .collect()
    }
}

/// A resource with its three compiled views.
#[derive(Debug, Clone)]
pub struct CompiledResource {
    pub name: ResourceName,
    pub title: String,
    pub plural: String,
    pub path: String,
    pub embedded_in: Option<ResourceName>,
    pub connector: Option<Connector>,
    pub fields: Vec<Field>,
    pub order_by: Option<FieldKey>,
    pub preload: Preload,
    pub index: Arc<ViewConfig>,
    pub form: Arc<ViewConfig>,
    pub show: Arc<ViewConfig>,
}

impl CompiledResource {
    pub fn view(&self, kind: ViewKind) -> &Arc<ViewConfig> {
        match kind {
            ViewKind::Index => &self.index,
            ViewKind::Form => &self.form,
            ViewKind::Show => &self.show,
        }
    }
}
