use auix_compiler::ViewNode;
use auix_core::{ActionGroup, Markup};

use super::{render_field, RenderContext};
use crate::components::{Event, TableProps, TableRow};

/// Header, filter and selection actions, the streamed rows, then paging.
pub(super) fn render_index(ctx: &RenderContext<'_>, node: &ViewNode) -> Markup {
    let Some(index) = ctx.state.index() else {
        return Markup::Empty;
    };
    let components = ctx.components;
    let view_ctx = ctx.action_context(None);

    let ctx = &ctx.rejecting_foreign_keys(node);
    let columns = ctx.columns(node.fields());
    let cells = ctx.in_cells();
    let rows = index
        .stream
        .iter()
        .map(|record| {
            let row_ctx = cells.with_borrowed_record(record);
            let id = record.id().map(|id| id.to_string());
            TableRow {
                cells: columns.iter().map(|f| render_field(&row_ctx, f)).collect(),
                actions: ctx.actions(ActionGroup::IndexRow, &ctx.action_context(Some(record))),
                click: id
                    .as_ref()
                    .map(|id| Event::new("row_clicked").value("id", id.as_str())),
                id,
            }
        })
        .collect();

    let table = components.table(TableProps {
        id: ctx.resource.plural.clone(),
        columns: columns.iter().map(|f| f.label.clone()).collect(),
        rows,
        row_actions: !ctx.view.actions.get(ActionGroup::IndexRow).is_empty(),
        empty_text: format!("No {}", ctx.view.title.to_lowercase()),
    });

    Markup::fragment([
        components.heading(
            &ctx.view.title,
            node.subtitle.as_deref(),
            ctx.actions(ActionGroup::IndexHeader, &view_ctx),
        ),
        ctx.actions(ActionGroup::IndexFilter, &view_ctx),
        ctx.actions(ActionGroup::IndexSelected, &view_ctx),
        table,
        components.pagination(&index.page_info),
        ctx.actions(ActionGroup::IndexFooter, &view_ctx),
    ])
}
