//! Default template: the actions every generated view starts with.
//!
//! Layouts add, insert, replace or remove these per group; the compiler
//! merges them before any view is mounted.

use auix_core::{
    Action, ActionContext, ActionGroup, ActionSet, DefaultActions, NavigationKind, ViewKind,
};

use crate::components::{BasicComponents, ButtonKind, Components, Event};

/// Actions drawn with [`BasicComponents`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicTemplate;

impl DefaultActions for BasicTemplate {
    fn default_actions(&self, view: ViewKind) -> ActionSet {
        match view {
            ViewKind::Index => ActionSet::new()
                .with(ActionGroup::IndexHeader, new_action())
                .with(ActionGroup::IndexRow, edit_action())
                .with(ActionGroup::IndexRow, delete_action()),
            ViewKind::Show => ActionSet::new()
                .with(ActionGroup::ShowHeader, show_edit_action())
                .with(ActionGroup::ShowHeader, back_action())
                .with(ActionGroup::OneToManyRow, show_related_action()),
            ViewKind::Form => ActionSet::new()
                .with(ActionGroup::FormFooter, save_action())
                .with(ActionGroup::FormFooter, cancel_action())
                .with(ActionGroup::OneToManyRow, show_related_action()),
        }
    }
}

fn new_action() -> Action {
    Action::new("new", |ctx: &ActionContext| {
        BasicComponents.link(
            "New",
            &format!("{}/new", ctx.base_path),
            NavigationKind::Patch,
        )
    })
}

fn edit_action() -> Action {
    Action::new("edit", |ctx: &ActionContext| {
        BasicComponents.link(
            "Edit",
            &format!("{}/edit", ctx.record_path()),
            NavigationKind::Patch,
        )
    })
}

fn delete_action() -> Action {
    Action::new("delete", |ctx: &ActionContext| {
        let id = ctx
            .record
            .as_ref()
            .and_then(|r| r.id())
            .map(|id| id.to_string())
            .unwrap_or_default();
        BasicComponents.button(
            "Delete",
            &Event::new("delete").value("id", id),
            ButtonKind::Danger,
        )
    })
}

fn show_edit_action() -> Action {
    Action::new("edit", |ctx: &ActionContext| {
        BasicComponents.link(
            "Edit",
            &format!("{}/show/edit", ctx.record_path()),
            NavigationKind::Patch,
        )
    })
}

fn back_action() -> Action {
    Action::new("back", |_: &ActionContext| {
        BasicComponents.button("Back", &Event::new("back"), ButtonKind::Secondary)
    })
}

fn save_action() -> Action {
    Action::new("save", |_: &ActionContext| BasicComponents.submit("Save"))
}

fn cancel_action() -> Action {
    Action::new("cancel", |_: &ActionContext| {
        BasicComponents.button("Cancel", &Event::new("back"), ButtonKind::Secondary)
    })
}

/// Rows of a related table link to the related record's show page.
fn show_related_action() -> Action {
    Action::new("show", |ctx: &ActionContext| {
        BasicComponents.link("Show", &ctx.record_path(), NavigationKind::Navigate)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use auix_core::{Markup, Record};

    #[test]
    fn test_default_groups_per_view() {
        let index = BasicTemplate.default_actions(ViewKind::Index);
        assert_eq!(index.names(ActionGroup::IndexHeader), vec!["new"]);
        assert_eq!(index.names(ActionGroup::IndexRow), vec!["edit", "delete"]);

        let show = BasicTemplate.default_actions(ViewKind::Show);
        assert_eq!(show.names(ActionGroup::ShowHeader), vec!["edit", "back"]);

        let form = BasicTemplate.default_actions(ViewKind::Form);
        assert_eq!(form.names(ActionGroup::FormFooter), vec!["save", "cancel"]);
        assert_eq!(form.names(ActionGroup::OneToManyRow), vec!["show"]);
    }

    #[test]
    fn test_row_actions_use_record_path() {
        let ctx = ActionContext::new("product".into(), ViewKind::Index, "/products")
            .with_record(Record::new().with("id", 4));
        let index = BasicTemplate.default_actions(ViewKind::Index);

        let edit = index.get(ActionGroup::IndexRow)[0].render(&ctx);
        assert_eq!(
            edit.find_by_tag("a")[0].get_attr("href"),
            Some("/products/4/edit")
        );

        let delete = index.get(ActionGroup::IndexRow)[1].render(&ctx);
        let Markup::Element(button) = delete else {
            panic!("expected a button");
        };
        assert_eq!(button.get_attr("data-id"), Some("4"));
    }
}
