use auix_app::FormStatus;
use auix_compiler::ViewNode;
use auix_core::{label_for, ActionGroup, Markup};

use super::{render_inner_elements, RenderContext};

/// Submission wrapper around the form's layout with its header and footer
/// actions. Errors show once a save has failed.
pub(super) fn render_form(ctx: &RenderContext<'_>, node: &ViewNode) -> Markup {
    let components = ctx.components;
    let action_ctx = ctx.action_context(Some(&*ctx.record));

    let errors: Vec<String> = match (ctx.state.form.as_ref(), ctx.change_set) {
        (Some(form), Some(change_set)) if form.status == FormStatus::Errored => change_set
            .errors
            .iter()
            .map(|e| {
                let label = ctx
                    .view
                    .root
                    .find_field(e.field.as_str())
                    .map(|f| f.label.clone())
                    .unwrap_or_else(|| label_for(e.field.as_str()));
                format!("{} {}", label, e.message)
            })
            .collect(),
        _ => Vec::new(),
    };

    let mut body = vec![
        components.error_summary(&errors),
        ctx.actions(ActionGroup::FormHeader, &action_ctx),
    ];
    body.extend(render_inner_elements(&ctx.rejecting_foreign_keys(node), node));
    body.push(ctx.actions(ActionGroup::FormFooter, &action_ctx));
    components.form(&format!("{}-form", ctx.resource.name), body)
}
