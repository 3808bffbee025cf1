//! Main render/view function (View in TEA pattern)

use auix_app::{FormMode, FormStatus, Screen, ViewState};
use auix_compiler::CompiledSite;
use auix_core::prelude::*;
use auix_core::Markup;

use crate::components::Components;
use crate::render::{render, RenderContext};

/// Render the complete page of a view instance.
///
/// Pure function of the state: flash, the mounted screen, then the form
/// overlay when one is open.
pub fn render_view(
    site: &CompiledSite,
    state: &ViewState,
    components: &dyn Components,
) -> Result<Markup> {
    let resource = site.resource(&state.resource)?;
    let screen_view = resource.view(state.screen.kind());

    let mut ctx = RenderContext::new(components, site, resource, screen_view, state);
    if let Screen::Show(show) = &state.screen {
        if let Some(record) = &show.record {
            ctx = ctx.with_borrowed_record(record);
        }
    }

    let flash = state
        .flash
        .as_ref()
        .map(|flash| components.flash(flash))
        .unwrap_or_default();
    let mut children = vec![flash, render(&ctx, &screen_view.root)];

    if let Some(form) = &state.form {
        let errors = (form.status == FormStatus::Errored).then_some(&form.change_set);
        let form_ctx = RenderContext::new(components, site, resource, &resource.form, state)
            .with_record(form.values())
            .with_change_set(errors);
        let title = match form.mode {
            FormMode::New => format!("New {}", resource.title),
            FormMode::Edit => format!("Edit {}", resource.title),
        };
        children.push(components.modal(&title, render(&form_ctx, &resource.form.root)));
    }

    Ok(components.page(children))
}
