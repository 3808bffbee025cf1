//! Message types for view instances (TEA pattern)

use std::collections::BTreeMap;

use auix_compiler::Route;
use auix_connector::{Page, SaveResult};
use auix_core::{ChangeSet, FieldKey, NavigationKind, Params, Record, RecordId, SectionsId, TabId};

/// Everything a view instance reacts to, processed strictly in order.
#[derive(Debug, Clone)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────
    /// First render of the instance at `route`.
    Mount { route: Route },

    /// Route parameters changed (mount or in-place patch).
    HandleParams { route: Route },

    // ─────────────────────────────────────────────────────────
    // User Events
    // ─────────────────────────────────────────────────────────
    /// Rebuild the change set from submitted params without persisting.
    Validate { params: Params },

    /// Persist the form.
    Save { params: Params },

    Delete { id: RecordId },

    SwitchSection { sections_id: SectionsId, tab_id: TabId },

    Paginate { page: usize },

    /// Index row click.
    RowClicked { id: RecordId },

    /// Forward navigation; the current path is pushed first.
    Navigate { kind: NavigationKind, to: String },

    /// Pop the routing stack and go there.
    Back,

    DismissFlash,

    // ─────────────────────────────────────────────────────────
    // Backend Results
    // ─────────────────────────────────────────────────────────
    Listed { page: Page },

    Loaded { id: RecordId, record: Option<Record> },

    NewRecordBuilt { record: Record },

    ChangeBuilt { change_set: ChangeSet },

    SaveCompleted { result: SaveResult },

    Deleted { record: Record },

    OptionsLoaded { options: BTreeMap<FieldKey, Vec<Record>> },

    /// A backend call failed outright.
    BackendFailed { operation: &'static str, error: String },

    // ─────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────
    /// A child form saved `record`.
    Saved { record: Record },
}
