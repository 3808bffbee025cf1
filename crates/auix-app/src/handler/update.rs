//! Main update function - handles state transitions (TEA pattern)
//!
//! Handler implementations live in:
//! - `navigation`: mount, params and routing stack
//! - `index`: listing and row updates
//! - `show`: record loading
//! - `form`: change sets and saving
//! - `sections`: tab switching

use auix_compiler::CompiledResource;
use auix_core::prelude::*;

use super::{form, index, navigation, sections, show, UpdateResult};
use crate::message::Message;
use crate::state::ViewState;

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut ViewState, resource: &CompiledResource, message: Message) -> UpdateResult {
    match message {
        Message::Mount { route } => navigation::handle_mount(state, resource, route),

        Message::HandleParams { route } => navigation::handle_params(state, resource, route),

        // ─────────────────────────────────────────────────────────
        // User Events
        // ─────────────────────────────────────────────────────────
        Message::Validate { params } => form::handle_validate(state, resource, params),

        Message::Save { params } => form::handle_save(state, resource, params),

        Message::Delete { id } => index::handle_delete(state, id),

        Message::SwitchSection {
            sections_id,
            tab_id,
        } => sections::handle_switch_section(state, resource, sections_id, tab_id),

        Message::Paginate { page } => index::handle_paginate(state, page),

        Message::RowClicked { id } => navigation::handle_row_clicked(state, resource, id),

        Message::Navigate { kind, to } => navigation::handle_navigate(state, kind, to),

        Message::Back => navigation::handle_back(state, resource),

        Message::DismissFlash => {
            state.flash = None;
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Backend Results
        // ─────────────────────────────────────────────────────────
        Message::Listed { page } => index::handle_listed(state, page),

        Message::Loaded { id, record } => show::handle_loaded(state, resource, id, record),

        Message::NewRecordBuilt { record } => form::handle_new_record(state, record),

        Message::ChangeBuilt { change_set } => form::handle_change_built(state, resource, change_set),

        Message::SaveCompleted { result } => form::handle_save_completed(state, resource, result),

        Message::Deleted { record } => index::handle_deleted(state, resource, record),

        Message::OptionsLoaded { options } => {
            state.options.extend(options);
            UpdateResult::none()
        }

        Message::BackendFailed { operation, error } => {
            warn!("{} {} failed: {}", state.resource, operation, error);
            match operation {
                "create" | "update" => form::handle_save_failed(state, &error),
                // The row or record stays as it was.
                "delete" => state.flash_error(format!("Could not delete: {}", error)),
                _ => state.flash_error(format!("Could not load {}: {}", resource.plural, error)),
            }
            // Route params still apply when the initial listing failed.
            match state.pending_route.take() {
                Some(route) => UpdateResult::message(Message::HandleParams { route }),
                None => UpdateResult::none(),
            }
        }

        // ─────────────────────────────────────────────────────────
        // Notifications
        // ─────────────────────────────────────────────────────────
        Message::Saved { record } => index::handle_saved(state, record),
    }
}
