use auix_compiler::ViewNode;
use auix_core::{ActionGroup, Element, Markup};

use super::{render_inner_elements, RenderContext};
use crate::theme;

/// Read-only detail page of the loaded record.
pub(super) fn render_show(ctx: &RenderContext<'_>, node: &ViewNode) -> Markup {
    let components = ctx.components;
    let Some(record) = ctx.state.show().and_then(|s| s.record.as_ref()) else {
        return Markup::fragment([
            components.heading(&ctx.view.title, None, Markup::Empty),
            Element::new("p")
                .class(theme::EMPTY)
                .text(format!("No {} loaded", ctx.view.title.to_lowercase()))
                .into(),
        ]);
    };
    let action_ctx = ctx.action_context(Some(record));
    let ctx = ctx.with_borrowed_record(record).rejecting_foreign_keys(node);

    let mut children = vec![components.heading(
        &ctx.view.title,
        node.subtitle.as_deref(),
        ctx.actions(ActionGroup::ShowHeader, &action_ctx),
    )];
    children.extend(render_inner_elements(&ctx, node));
    children.push(ctx.actions(ActionGroup::ShowFooter, &action_ctx));
    Markup::fragment(children)
}
