//! Renderer dispatcher
//!
//! [`render`] dispatches purely on the tag of an expanded [`ViewNode`] and
//! recurses through [`render_inner_elements`]. Nodes it cannot place render
//! as [`Markup::Empty`], so partial trees still produce output.

mod containers;
mod field;
mod form;
mod index;
mod sections;
mod show;

#[cfg(test)]
mod tests;

use std::borrow::Cow;

use auix_app::ViewState;
use auix_compiler::{CompiledResource, CompiledSite, ViewConfig, ViewNode, ViewTag};
use auix_core::prelude::*;
use auix_core::{
    ActionContext, ActionGroup, ChangeSet, Field, FieldKey, FieldType, Markup, Record,
    ResourceName, ViewKind,
};

use crate::components::{ContainerKind, Components};

pub use field::render_field;

/// How fields draw themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    /// Labelled inputs (forms, show pages).
    Input,
    /// Bare values in a table cell.
    Cell,
}

/// Everything a node needs while rendering; cloned as the tree descends.
#[derive(Clone)]
pub struct RenderContext<'a> {
    pub components: &'a dyn Components,
    pub site: &'a CompiledSite,
    pub resource: &'a CompiledResource,
    pub view: &'a ViewConfig,
    pub state: &'a ViewState,
    /// Entity the fields read their values from.
    pub record: Cow<'a, Record>,
    /// Validation errors to show next to inputs.
    pub change_set: Option<&'a ChangeSet>,
    /// Field keys skipped by [`render_inner_elements`].
    pub reject_fields: Vec<FieldKey>,
    pub mode: FieldMode,
    /// Input name prefix for embedded fields, e.g. `address`.
    pub name_prefix: Option<String>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        components: &'a dyn Components,
        site: &'a CompiledSite,
        resource: &'a CompiledResource,
        view: &'a ViewConfig,
        state: &'a ViewState,
    ) -> Self {
        Self {
            components,
            site,
            resource,
            view,
            state,
            record: Cow::Owned(Record::new()),
            change_set: None,
            reject_fields: Vec::new(),
            mode: FieldMode::Input,
            name_prefix: None,
        }
    }

    pub fn with_record(&self, record: Record) -> Self {
        Self {
            record: Cow::Owned(record),
            ..self.clone()
        }
    }

    pub fn with_borrowed_record(&self, record: &'a Record) -> Self {
        Self {
            record: Cow::Borrowed(record),
            ..self.clone()
        }
    }

    pub fn with_change_set(mut self, change_set: Option<&'a ChangeSet>) -> Self {
        self.change_set = change_set;
        self
    }

    /// Also skip `keys` below this point.
    pub fn rejecting(&self, keys: impl IntoIterator<Item = FieldKey>) -> Self {
        let mut ctx = self.clone();
        ctx.reject_fields.extend(keys);
        ctx
    }

    pub fn in_cells(&self) -> Self {
        Self {
            mode: FieldMode::Cell,
            ..self.clone()
        }
    }

    pub fn nested_under(&self, prefix: &FieldKey) -> Self {
        let prefix = match &self.name_prefix {
            Some(outer) => format!("{}[{}]", outer, prefix),
            None => prefix.to_string(),
        };
        Self {
            name_prefix: Some(prefix),
            change_set: None,
            ..self.clone()
        }
    }

    /// Skip foreign keys already drawn as a belongs-to select in `node`.
    pub fn rejecting_foreign_keys(&self, node: &ViewNode) -> Self {
        let keys: Vec<FieldKey> = node
            .fields()
            .into_iter()
            .filter(|f| f.field_type == FieldType::BelongsTo && !f.omitted)
            .filter_map(|f| f.data.association().map(|d| d.owner_key.clone()))
            .collect();
        self.rejecting(keys)
    }

    pub fn is_rejected(&self, key: &FieldKey) -> bool {
        self.reject_fields.contains(key)
    }

    /// Columns of a table: visible fields not rejected here.
    pub fn columns<'f>(&self, fields: impl IntoIterator<Item = &'f Field>) -> Vec<&'f Field> {
        fields
            .into_iter()
            .filter(|f| !f.omitted && !f.hidden && !self.is_rejected(&f.key))
            .collect()
    }

    pub fn action_context(&self, record: Option<&Record>) -> ActionContext {
        let ctx = ActionContext::new(
            self.resource.name.clone(),
            self.view.kind,
            self.view.path.clone(),
        );
        match record {
            Some(record) => ctx.with_record(record.clone()),
            None => ctx,
        }
    }

    /// Context for actions of a nested table over `related` rows.
    pub fn related_action_context(
        &self,
        related: &ResourceName,
        parent_field: &FieldKey,
    ) -> ActionContext {
        let path = self
            .site
            .resource(related)
            .map(|r| r.path.clone())
            .unwrap_or_default();
        ActionContext::new(related.clone(), self.view.kind, path)
            .with_parent_field(parent_field.as_str())
    }

    /// Render every action of `group` into an action bar.
    pub fn actions(&self, group: ActionGroup, ctx: &ActionContext) -> Markup {
        self.components.action_bar(
            self.view
                .actions
                .get(group)
                .iter()
                .map(|action| action.render(ctx))
                .collect(),
        )
    }
}

/// Render one node of the expanded layout tree.
pub fn render(ctx: &RenderContext<'_>, node: &ViewNode) -> Markup {
    match &node.tag {
        ViewTag::Index => root(ctx, node, ViewKind::Index, index::render_index),
        ViewTag::Show => root(ctx, node, ViewKind::Show, show::render_show),
        ViewTag::Form => root(ctx, node, ViewKind::Form, form::render_form),
        ViewTag::Group { title } => {
            containers::render_container(ctx, node, ContainerKind::Group, Some(title))
        }
        ViewTag::Inline => containers::render_container(ctx, node, ContainerKind::Inline, None),
        ViewTag::Stacked => containers::render_container(ctx, node, ContainerKind::Stacked, None),
        ViewTag::Sections { id } => sections::render_sections(ctx, node, id),
        ViewTag::Section {
            sections_id,
            tab_id,
            title,
            ..
        } => sections::render_section(ctx, node, sections_id, tab_id, title),
        ViewTag::Field(field) => field::render_field(ctx, field),
    }
}

/// Container tags only render as the root of their own view.
fn root(
    ctx: &RenderContext<'_>,
    node: &ViewNode,
    kind: ViewKind,
    render_view: fn(&RenderContext<'_>, &ViewNode) -> Markup,
) -> Markup {
    if ctx.view.kind != kind {
        debug!("Skipping {} node inside a {} view", node.tag.name(), ctx.view.kind);
        return Markup::Empty;
    }
    render_view(ctx, node)
}

/// Render the children of `node`, skipping rejected fields.
pub fn render_inner_elements(ctx: &RenderContext<'_>, node: &ViewNode) -> Vec<Markup> {
    node.children
        .iter()
        .filter(|child| !child.field().is_some_and(|f| ctx.is_rejected(&f.key)))
        .map(|child| render(ctx, child))
        .collect()
}
