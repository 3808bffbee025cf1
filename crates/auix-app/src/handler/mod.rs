//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `index`: Listing, row deletion and stream updates
//! - `show`: Record loading and deletion on the show page
//! - `form`: Change sets, validation and saving
//! - `navigation`: Routing stack push/pop and redirects
//! - `sections`: Tab switching

pub(crate) mod form;
pub(crate) mod index;
pub(crate) mod navigation;
pub(crate) mod sections;
pub(crate) mod show;
pub(crate) mod update;


use std::collections::BTreeMap;

use auix_connector::ListOptions;
use auix_core::{FieldKey, Params, Preload, Record, RecordId, ResourceName};

use crate::message::Message;

pub use navigation::with_stack;
pub use update::update;

/// Backend work the instance performs after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    List { opts: ListOptions },

    ToPage { opts: ListOptions, page: usize },

    Get { id: RecordId, preload: Preload },

    NewRecord { attrs: Params, preload: Preload },

    Change { record: Record, params: Params },

    Create { params: Params },

    Update { record: Record, params: Params },

    Delete { record: Record },

    /// Rows of related resources for to-one selects.
    LoadOptions {
        requests: BTreeMap<FieldKey, ResourceName>,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional backend action to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    pub fn with_message(mut self, msg: Message) -> Self {
        self.message = Some(msg);
        self
    }
}
