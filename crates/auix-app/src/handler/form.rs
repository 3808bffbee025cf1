//! Form handlers: change sets, validation, saving and save outcomes

use std::collections::BTreeMap;

use auix_compiler::{CompiledResource, ViewConfig};
use auix_connector::SaveResult;
use auix_core::prelude::*;
use auix_core::{ChangeSet, FieldKey, FieldType, Params, Record, ResourceName};

use super::{navigation, UpdateAction, UpdateResult};
use crate::message::Message;
use crate::state::{FormMode, FormState, FormStatus, ViewState};

pub(crate) fn handle_new_record(state: &mut ViewState, record: Record) -> UpdateResult {
    state.form = Some(FormState::new(FormMode::New, record.clone()));
    UpdateResult::action(UpdateAction::Change {
        record,
        params: Params::new(),
    })
}

pub(crate) fn handle_change_built(
    state: &mut ViewState,
    resource: &CompiledResource,
    change_set: ChangeSet,
) -> UpdateResult {
    let Some(form) = state.form.as_mut() else {
        return UpdateResult::none();
    };
    form.change_set = change_set;
    form.status = FormStatus::Validating;

    let requests: BTreeMap<FieldKey, ResourceName> = option_requests(&resource.form)
        .into_iter()
        .filter(|(key, _)| !state.options.contains_key(key))
        .collect();
    if requests.is_empty() {
        UpdateResult::none()
    } else {
        UpdateResult::action(UpdateAction::LoadOptions { requests })
    }
}

/// To-one fields of `view` whose select lists rows of a sibling resource.
pub(crate) fn option_requests(view: &ViewConfig) -> BTreeMap<FieldKey, ResourceName> {
    view.fields()
        .into_iter()
        .filter(|f| matches!(f.field_type, FieldType::BelongsTo | FieldType::HasOne))
        .filter_map(|f| {
            let data = f.data.association()?;
            if data.static_options.is_some() {
                return None;
            }
            let related = data.resource.as_ref()?;
            Some((f.key.clone(), related.name.clone()))
        })
        .collect()
}

pub(crate) fn handle_validate(
    state: &mut ViewState,
    resource: &CompiledResource,
    params: Params,
) -> UpdateResult {
    let Some(form) = state.form.as_mut() else {
        debug!("validate without an open form");
        return UpdateResult::none();
    };
    let params = submittable(params, &resource.form);
    form.params = params.clone();
    UpdateResult::action(UpdateAction::Change {
        record: form.record.clone(),
        params,
    })
}

pub(crate) fn handle_save(
    state: &mut ViewState,
    resource: &CompiledResource,
    params: Params,
) -> UpdateResult {
    let Some(form) = state.form.as_mut() else {
        debug!("save without an open form");
        return UpdateResult::none();
    };
    let params = submittable(params, &resource.form);
    form.params = params.clone();
    form.status = FormStatus::Saving;

    let action = match form.mode {
        FormMode::New => UpdateAction::Create {
            params: with_record_defaults(&form.record, params, &resource.form),
        },
        FormMode::Edit => UpdateAction::Update {
            record: form.record.clone(),
            params,
        },
    };
    UpdateResult::action(action)
}

pub(crate) fn handle_save_completed(
    state: &mut ViewState,
    resource: &CompiledResource,
    result: SaveResult,
) -> UpdateResult {
    let Some(form) = state.form.as_mut() else {
        return UpdateResult::none();
    };
    match result {
        Ok(record) => {
            let mode = form.mode;
            form.status = FormStatus::Saved;
            form.record = record.clone();
            info!("Saved {} {:?}", resource.name, record.id());
            state.flash_info(match mode {
                FormMode::New => format!("{} created", resource.title),
                FormMode::Edit => format!("{} updated", resource.title),
            });

            // A new record with inline to-many content moves on to its edit
            // view so the related rows can be added.
            match (mode, record.id()) {
                (FormMode::New, Some(id)) if resource.form.renders_one_to_many => {
                    navigation::advance_to_edit(state, resource, &id);
                }
                _ => {
                    navigation::handle_back(state, resource);
                }
            }
            UpdateResult::message(Message::Saved { record })
        }
        Err(change_set) => {
            debug!(
                "Save of {} rejected with {} errors",
                resource.name,
                change_set.errors.len()
            );
            form.status = FormStatus::Errored;
            form.change_set = change_set;
            UpdateResult::none()
        }
    }
}

/// Backend failure during a save: keep the form open with its params.
pub(crate) fn handle_save_failed(state: &mut ViewState, error: &str) {
    if let Some(form) = state.form.as_mut() {
        form.status = FormStatus::Errored;
    }
    state.flash_error(format!("Could not save: {}", error));
}

fn submittable(mut params: Params, form: &ViewConfig) -> Params {
    params.retain_keys(&form.submittable_keys());
    params
}

/// Values set on the new record (such as a parent foreign key) that the
/// submission does not override.
fn with_record_defaults(record: &Record, params: Params, form: &ViewConfig) -> Params {
    let mut merged = Params::new();
    for key in form.submittable_keys() {
        match record.get(key.as_str()) {
            Some(value) if !value.is_null() => merged.insert(key.as_str(), value.clone()),
            _ => {}
        }
    }
    for (key, value) in params.iter() {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
