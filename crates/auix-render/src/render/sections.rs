//! Tabbed `sections` blocks.
//!
//! Only the section whose tab is current for its sections id renders; the
//! current tab is the instance's explicit selection, else the section
//! flagged default, else the first one.

use auix_compiler::{ViewNode, ViewTag};
use auix_core::{Markup, SectionsId, TabId};

use super::{render_inner_elements, RenderContext};
use crate::components::ContainerKind;

pub(super) fn render_sections(
    ctx: &RenderContext<'_>,
    node: &ViewNode,
    sections_id: &SectionsId,
) -> Markup {
    let tabs: Vec<(&TabId, &str)> = node
        .children
        .iter()
        .filter_map(|child| match &child.tag {
            ViewTag::Section {
                sections_id: id,
                tab_id,
                title,
                ..
            } if id == sections_id => Some((tab_id, title.as_str())),
            _ => None,
        })
        .collect();
    if tabs.is_empty() {
        return Markup::Empty;
    }

    let current = current_tab(ctx, node, sections_id);
    let buttons = tabs
        .iter()
        .map(|(tab_id, title)| {
            ctx.components
                .tab_button(title, sections_id, tab_id, current == Some(*tab_id))
        })
        .collect();

    let body: Vec<Markup> = node
        .children
        .iter()
        .map(|child| super::render(ctx, child))
        .collect();
    Markup::fragment([ctx.components.tab_strip(buttons), Markup::fragment(body)])
}

pub(super) fn render_section(
    ctx: &RenderContext<'_>,
    node: &ViewNode,
    sections_id: &SectionsId,
    tab_id: &TabId,
    title: &str,
) -> Markup {
    let Some(parent) = sections_node(&ctx.view.root, sections_id) else {
        return Markup::Empty;
    };
    if current_tab(ctx, parent, sections_id) != Some(tab_id) {
        return Markup::Empty;
    }
    let title = node.title.as_deref().unwrap_or(title);
    ctx.components.container(
        ContainerKind::Section,
        Some(title),
        render_inner_elements(ctx, node),
    )
}

fn current_tab<'n>(
    ctx: &'n RenderContext<'_>,
    sections: &'n ViewNode,
    sections_id: &SectionsId,
) -> Option<&'n TabId> {
    ctx.state
        .tabs
        .current(sections_id, ctx.view)
        .or_else(|| {
            sections.children.iter().find_map(|child| match &child.tag {
                ViewTag::Section { tab_id, .. } => Some(tab_id),
                _ => None,
            })
        })
}

fn sections_node<'v>(root: &'v ViewNode, sections_id: &SectionsId) -> Option<&'v ViewNode> {
    root.find_all(&|n| matches!(&n.tag, ViewTag::Sections { id } if id == sections_id))
        .into_iter()
        .next()
}
