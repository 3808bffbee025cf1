//! # Action System
//!
//! Named render callbacks placed into fixed groups (index header, form
//! footer, one-to-many row, ...). Templates provide the defaults through
//! [`DefaultActions`]; layouts modify them with [`ActionModification`]s,
//! always applied remove → add → insert → replace.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::markup::Markup;
use crate::record::Record;
use crate::types::{ResourceName, ViewKind};

// ============================================================================
// ActionGroup
// ============================================================================

/// Placement of an action within a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionGroup {
    IndexHeader,
    IndexFilter,
    IndexSelected,
    IndexRow,
    IndexFooter,
    ShowHeader,
    ShowFooter,
    FormHeader,
    FormFooter,
    OneToManyHeader,
    OneToManyRow,
    OneToManyFooter,
    EmbedsManyHeader,
    EmbedsManyRow,
    EmbedsManyNewEntry,
}

impl ActionGroup {
    pub const ALL: [ActionGroup; 15] = [
        ActionGroup::IndexHeader,
        ActionGroup::IndexFilter,
        ActionGroup::IndexSelected,
        ActionGroup::IndexRow,
        ActionGroup::IndexFooter,
        ActionGroup::ShowHeader,
        ActionGroup::ShowFooter,
        ActionGroup::FormHeader,
        ActionGroup::FormFooter,
        ActionGroup::OneToManyHeader,
        ActionGroup::OneToManyRow,
        ActionGroup::OneToManyFooter,
        ActionGroup::EmbedsManyHeader,
        ActionGroup::EmbedsManyRow,
        ActionGroup::EmbedsManyNewEntry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionGroup::IndexHeader => "index_header",
            ActionGroup::IndexFilter => "index_filter",
            ActionGroup::IndexSelected => "index_selected",
            ActionGroup::IndexRow => "index_row",
            ActionGroup::IndexFooter => "index_footer",
            ActionGroup::ShowHeader => "show_header",
            ActionGroup::ShowFooter => "show_footer",
            ActionGroup::FormHeader => "form_header",
            ActionGroup::FormFooter => "form_footer",
            ActionGroup::OneToManyHeader => "one_to_many_header",
            ActionGroup::OneToManyRow => "one_to_many_row",
            ActionGroup::OneToManyFooter => "one_to_many_footer",
            ActionGroup::EmbedsManyHeader => "embeds_many_header",
            ActionGroup::EmbedsManyRow => "embeds_many_row",
            ActionGroup::EmbedsManyNewEntry => "embeds_many_new_entry",
        }
    }

    /// Whether a container of the given view kind may modify this group.
    ///
    /// One-to-many and embeds-many groups belong to the nested tables that
    /// appear inside show and form views.
    pub fn allowed_in(&self, view: ViewKind) -> bool {
        use ActionGroup::*;
        match self {
            IndexHeader | IndexFilter | IndexSelected | IndexRow | IndexFooter => {
                view == ViewKind::Index
            }
            ShowHeader | ShowFooter => view == ViewKind::Show,
            FormHeader | FormFooter => view == ViewKind::Form,
            OneToManyHeader | OneToManyRow | OneToManyFooter | EmbedsManyHeader
            | EmbedsManyRow | EmbedsManyNewEntry => view != ViewKind::Index,
        }
    }
}

impl fmt::Display for ActionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionGroup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ActionGroup::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| Error::UnknownActionGroup {
                name: s.to_string(),
            })
    }
}

// ============================================================================
// Action
// ============================================================================

/// What an action callback sees when it renders.
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub resource: ResourceName,
    pub view: ViewKind,
    /// Route prefix of the resource, e.g. `/products`.
    pub base_path: String,
    /// The row or entity the action applies to, if any.
    pub record: Option<Record>,
    /// Field key of the nested table for one-to-many and embeds-many groups.
    pub parent_field: Option<String>,
}

impl ActionContext {
    pub fn new(resource: ResourceName, view: ViewKind, base_path: impl Into<String>) -> Self {
        Self {
            resource,
            view,
            base_path: base_path.into(),
            record: None,
            parent_field: None,
        }
    }

    pub fn with_record(mut self, record: Record) -> Self {
        self.record = Some(record);
        self
    }

    pub fn with_parent_field(mut self, field: impl Into<String>) -> Self {
        self.parent_field = Some(field.into());
        self
    }

    /// Path of the current record, `base_path` when there is none.
    pub fn record_path(&self) -> String {
        match self.record.as_ref().and_then(Record::id) {
            Some(id) => format!("{}/{}", self.base_path, id),
            None => self.base_path.clone(),
        }
    }
}

/// Render callback of an action.
#[derive(Clone)]
pub struct ActionComponent(Arc<dyn Fn(&ActionContext) -> Markup + Send + Sync>);

impl ActionComponent {
    pub fn new(f: impl Fn(&ActionContext) -> Markup + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn render(&self, ctx: &ActionContext) -> Markup {
        (self.0)(ctx)
    }
}

impl fmt::Debug for ActionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionComponent(..)")
    }
}

#[derive(Debug, Clone)]
pub struct Action {
    pub name: String,
    pub component: ActionComponent,
}

impl Action {
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&ActionContext) -> Markup + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            component: ActionComponent::new(f),
        }
    }

    pub fn render(&self, ctx: &ActionContext) -> Markup {
        self.component.render(ctx)
    }
}

// ============================================================================
// ActionSet
// ============================================================================

/// Ordered actions per group.
#[derive(Debug, Clone, Default)]
pub struct ActionSet {
    groups: BTreeMap<ActionGroup, Vec<Action>>,
}

impl ActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, group: ActionGroup, action: Action) -> Self {
        self.add(group, action);
        self
    }

    pub fn get(&self, group: ActionGroup) -> &[Action] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn names(&self, group: ActionGroup) -> Vec<&str> {
        self.get(group).iter().map(|a| a.name.as_str()).collect()
    }

    pub fn groups(&self) -> impl Iterator<Item = ActionGroup> + '_ {
        self.groups.keys().copied()
    }

    /// Append. An existing action with the same name is dropped first, so
    /// names stay unique within a group.
    pub fn add(&mut self, group: ActionGroup, action: Action) {
        let actions = self.groups.entry(group).or_default();
        actions.retain(|a| a.name != action.name);
        actions.push(action);
    }

    /// Prepend. Same-name entries are dropped as in [`add`](Self::add).
    pub fn insert(&mut self, group: ActionGroup, action: Action) {
        let actions = self.groups.entry(group).or_default();
        actions.retain(|a| a.name != action.name);
        actions.insert(0, action);
    }

    /// Substitute the action with the same name in place. No-op when absent.
    pub fn replace(&mut self, group: ActionGroup, action: Action) {
        if let Some(slot) = self
            .groups
            .get_mut(&group)
            .and_then(|actions| actions.iter_mut().find(|a| a.name == action.name))
        {
            *slot = action;
        }
    }

    pub fn remove(&mut self, group: ActionGroup, name: &str) {
        if let Some(actions) = self.groups.get_mut(&group) {
            actions.retain(|a| a.name != name);
        }
    }

    /// Apply modifications in the fixed order remove → add → insert →
    /// replace. Declaration order only matters within one kind.
    pub fn apply_all(&mut self, modifications: &[ActionModification]) {
        for step in [
            ModificationKind::Remove,
            ModificationKind::Add,
            ModificationKind::Insert,
            ModificationKind::Replace,
        ] {
            for modification in modifications.iter().filter(|m| m.op.kind() == step) {
                self.apply(modification);
            }
        }
    }

    fn apply(&mut self, modification: &ActionModification) {
        let group = modification.group;
        match &modification.op {
            ActionOp::Remove(name) => self.remove(group, name),
            ActionOp::Add(action) => self.add(group, action.clone()),
            ActionOp::Insert(action) => self.insert(group, action.clone()),
            ActionOp::Replace {
                name,
                with: Replacement::Action(component),
            } => self.replace(
                group,
                Action {
                    name: name.clone(),
                    component: component.clone(),
                },
            ),
            ActionOp::Replace {
                name,
                with: Replacement::Remove,
            } => self.remove(group, name),
        }
    }
}

// ============================================================================
// Modifications
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModificationKind {
    Remove,
    Add,
    Insert,
    Replace,
}

/// New content for a replaced action.
#[derive(Debug, Clone)]
pub enum Replacement {
    Action(ActionComponent),
    /// Drop the action instead of substituting it.
    Remove,
}

#[derive(Debug, Clone)]
pub enum ActionOp {
    Remove(String),
    Add(Action),
    Insert(Action),
    Replace { name: String, with: Replacement },
}

impl ActionOp {
    fn kind(&self) -> ModificationKind {
        match self {
            ActionOp::Remove(_) => ModificationKind::Remove,
            ActionOp::Add(_) => ModificationKind::Add,
            ActionOp::Insert(_) => ModificationKind::Insert,
            ActionOp::Replace { .. } => ModificationKind::Replace,
        }
    }
}

/// One `add_*`/`insert_*`/`replace_*`/`remove_*` option of a container.
#[derive(Debug, Clone)]
pub struct ActionModification {
    pub group: ActionGroup,
    pub op: ActionOp,
}

impl ActionModification {
    pub fn add(group: ActionGroup, action: Action) -> Self {
        Self {
            group,
            op: ActionOp::Add(action),
        }
    }

    pub fn insert(group: ActionGroup, action: Action) -> Self {
        Self {
            group,
            op: ActionOp::Insert(action),
        }
    }

    pub fn replace(
        group: ActionGroup,
        name: impl Into<String>,
        f: impl Fn(&ActionContext) -> Markup + Send + Sync + 'static,
    ) -> Self {
        Self {
            group,
            op: ActionOp::Replace {
                name: name.into(),
                with: Replacement::Action(ActionComponent::new(f)),
            },
        }
    }

    /// Replacement with the remove marker.
    pub fn replace_with_remove(group: ActionGroup, name: impl Into<String>) -> Self {
        Self {
            group,
            op: ActionOp::Replace {
                name: name.into(),
                with: Replacement::Remove,
            },
        }
    }

    pub fn remove(group: ActionGroup, name: impl Into<String>) -> Self {
        Self {
            group,
            op: ActionOp::Remove(name.into()),
        }
    }

    /// Check that the group may be used in a container of `view`.
    pub fn validate_for(&self, view: ViewKind) -> Result<()> {
        if self.group.allowed_in(view) {
            Ok(())
        } else {
            Err(Error::ActionGroupNotAllowed {
                group: self.group.to_string(),
                view: view.to_string(),
            })
        }
    }
}

/// Default actions a template offers for each view kind.
pub trait DefaultActions: Send + Sync {
    fn default_actions(&self, view: ViewKind) -> ActionSet;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Action {
        let label = name.to_string();
        Action::new(name, move |_| Markup::text(label.clone()))
    }

    fn ctx() -> ActionContext {
        ActionContext::new(ResourceName::new("product"), ViewKind::Index, "/products")
    }

    #[test]
    fn test_group_from_str() {
        assert_eq!(
            "index_row".parse::<ActionGroup>().unwrap(),
            ActionGroup::IndexRow
        );
        let err = "index_rows".parse::<ActionGroup>().unwrap_err();
        assert!(matches!(err, Error::UnknownActionGroup { .. }));
    }

    #[test]
    fn test_group_allowed_per_view() {
        assert!(ActionGroup::IndexRow.allowed_in(ViewKind::Index));
        assert!(!ActionGroup::IndexRow.allowed_in(ViewKind::Form));
        assert!(ActionGroup::OneToManyRow.allowed_in(ViewKind::Form));
        assert!(ActionGroup::OneToManyRow.allowed_in(ViewKind::Show));
        assert!(!ActionGroup::EmbedsManyRow.allowed_in(ViewKind::Index));

        let modification = ActionModification::remove(ActionGroup::FormFooter, "save");
        assert!(modification.validate_for(ViewKind::Form).is_ok());
        assert!(matches!(
            modification.validate_for(ViewKind::Index),
            Err(Error::ActionGroupNotAllowed { .. })
        ));
    }

    #[test]
    fn test_add_insert_replace_remove() {
        let group = ActionGroup::IndexRow;
        let mut set = ActionSet::new().with(group, named("edit"));
        set.add(group, named("delete"));
        set.insert(group, named("show"));
        assert_eq!(set.names(group), vec!["show", "edit", "delete"]);

        set.replace(group, Action::new("edit", |_| Markup::text("EDIT")));
        assert_eq!(set.names(group), vec!["show", "edit", "delete"]);
        assert_eq!(set.get(group)[1].render(&ctx()).to_html(), "EDIT");

        set.replace(group, named("missing"));
        assert_eq!(set.names(group), vec!["show", "edit", "delete"]);

        set.remove(group, "show");
        assert_eq!(set.names(group), vec!["edit", "delete"]);
    }

    #[test]
    fn test_apply_all_uses_fixed_order() {
        let group = ActionGroup::IndexHeader;
        let mut set = ActionSet::new().with(group, named("a")).with(group, named("d"));
        // Written in the reverse of the application order on purpose.
        set.apply_all(&[
            ActionModification::replace(group, "a", |_| Markup::text("a'")),
            ActionModification::insert(group, named("c")),
            ActionModification::add(group, named("b")),
            ActionModification::remove(group, "a"),
        ]);
        assert_eq!(set.names(group), vec!["c", "d", "b"]);
        let rendered: Vec<String> = set.get(group).iter().map(|a| a.render(&ctx()).to_html()).collect();
        assert!(!rendered.contains(&"a'".to_string()));
    }

    #[test]
    fn test_add_and_insert_keep_names_unique() {
        let group = ActionGroup::IndexRow;
        let mut set = ActionSet::new()
            .with(group, named("edit"))
            .with(group, named("delete"));
        set.apply_all(&[
            ActionModification::add(group, Action::new("edit", |_| Markup::text("EDIT"))),
            ActionModification::insert(group, named("delete")),
        ]);
        assert_eq!(set.names(group), vec!["delete", "edit"]);
        assert_eq!(set.get(group)[1].render(&ctx()).to_html(), "EDIT");

        set.replace(group, Action::new("delete", |_| Markup::text("DEL")));
        assert_eq!(set.names(group), vec!["delete", "edit"]);
        assert_eq!(set.get(group)[0].render(&ctx()).to_html(), "DEL");

        let set = ActionSet::new().with(group, named("a")).with(group, named("a"));
        assert_eq!(set.names(group), vec!["a"]);
    }

    #[test]
    fn test_replace_with_remove_marker() {
        let group = ActionGroup::FormFooter;
        let mut set = ActionSet::new()
            .with(group, named("save"))
            .with(group, named("cancel"));
        set.apply_all(&[ActionModification::replace_with_remove(group, "cancel")]);
        assert_eq!(set.names(group), vec!["save"]);
    }

    #[test]
    fn test_record_path() {
        let ctx = ctx().with_record(Record::new().with("id", 3));
        assert_eq!(ctx.record_path(), "/products/3");
    }
}
