//! Backend action execution
//!
//! Runs an [`UpdateAction`] against the resource's gateway and turns the
//! outcome into the message fed back into `update`. Backend errors become
//! [`Message::BackendFailed`]; they never escape the view.

use std::collections::BTreeMap;

use auix_compiler::CompiledSite;
use auix_connector::{CrudGateway, ListOptions};
use auix_core::prelude::*;

use crate::handler::UpdateAction;
use crate::message::Message;

pub fn handle_action(action: UpdateAction, gateway: &dyn CrudGateway, site: &CompiledSite) -> Message {
    match action {
        UpdateAction::List { opts } => match gateway.list(&opts) {
            Ok(page) => Message::Listed { page },
            Err(e) => failed("list", e),
        },

        UpdateAction::ToPage { opts, page } => match gateway.to_page(&opts, page) {
            Ok(page) => Message::Listed { page },
            Err(e) => failed("list", e),
        },

        UpdateAction::Get { id, preload } => match gateway.get(&id, &preload) {
            Ok(record) => Message::Loaded { id, record },
            Err(e) => failed("get", e),
        },

        UpdateAction::NewRecord { attrs, preload } => Message::NewRecordBuilt {
            record: gateway.new_record(&attrs, &preload),
        },

        UpdateAction::Change { record, params } => Message::ChangeBuilt {
            change_set: gateway.change(&record, &params),
        },

        UpdateAction::Create { params } => match gateway.create(&params) {
            Ok(result) => Message::SaveCompleted { result },
            Err(e) => failed("create", e),
        },

        UpdateAction::Update { record, params } => match gateway.update(&record, &params) {
            Ok(result) => Message::SaveCompleted { result },
            Err(e) => failed("update", e),
        },

        UpdateAction::Delete { record } => match gateway.delete(&record) {
            Ok(record) => Message::Deleted { record },
            Err(e) => failed("delete", e),
        },

        UpdateAction::LoadOptions { requests } => {
            let mut options = BTreeMap::new();
            for (field, related) in requests {
                let Some(connector) = site
                    .resource(&related)
                    .ok()
                    .and_then(|r| r.connector.as_ref())
                else {
                    warn!("No connector for {}, {} offers no options", related, field);
                    continue;
                };
                match connector.list(&ListOptions::default()) {
                    Ok(page) => {
                        options.insert(field, page.entries);
                    }
                    Err(e) => warn!("Loading options of {} failed: {}", field, e),
                }
            }
            Message::OptionsLoaded { options }
        }
    }
}

fn failed(operation: &'static str, error: Error) -> Message {
    Message::BackendFailed {
        operation,
        error: error.to_string(),
    }
}
