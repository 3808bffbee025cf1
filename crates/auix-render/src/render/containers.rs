use auix_compiler::ViewNode;
use auix_core::Markup;

use super::{render_inner_elements, RenderContext};
use crate::components::ContainerKind;

/// `group`, `inline` and `stacked` differ only in their wrapper.
pub(super) fn render_container(
    ctx: &RenderContext<'_>,
    node: &ViewNode,
    kind: ContainerKind,
    title: Option<&String>,
) -> Markup {
    let title = title.map(String::as_str).or(node.title.as_deref());
    ctx.components
        .container(kind, title, render_inner_elements(ctx, node))
}
