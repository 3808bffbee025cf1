//! Headless mode - drive a view instance with JSON events
//!
//! Reads one [`ClientEvent`] per stdin line and writes one
//! [`HeadlessEvent`] per line to stdout.

mod runner;

pub use runner::run_events;

use serde::{Deserialize, Serialize};

use auix_app::Message;
use auix_core::{NavigationKind, Params, RecordId, SectionsId, TabId};

/// An event a client would send from the rendered page.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    Validate { params: Params },
    Save { params: Params },
    Delete { id: RecordId },
    SwitchSection { sections_id: SectionsId, tab_id: TabId },
    Paginate { page: usize },
    RowClicked { id: RecordId },
    Navigate { kind: NavigationKind, to: String },
    Back,
    DismissFlash,
    /// Reload the current instance with new params.
    Patch { path: String },
}

impl ClientEvent {
    /// The message this event dispatches, `None` for patches.
    pub fn into_message(self) -> Option<Message> {
        let message = match self {
            ClientEvent::Validate { params } => Message::Validate { params },
            ClientEvent::Save { params } => Message::Save { params },
            ClientEvent::Delete { id } => Message::Delete { id },
            ClientEvent::SwitchSection {
                sections_id,
                tab_id,
            } => Message::SwitchSection {
                sections_id,
                tab_id,
            },
            ClientEvent::Paginate { page } => Message::Paginate { page },
            ClientEvent::RowClicked { id } => Message::RowClicked { id },
            ClientEvent::Navigate { kind, to } => Message::Navigate { kind, to },
            ClientEvent::Back => Message::Back,
            ClientEvent::DismissFlash => Message::DismissFlash,
            ClientEvent::Patch { .. } => return None,
        };
        Some(message)
    }
}

/// Events emitted to stdout.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    Rendered { path: String, html: String },
    Redirected { kind: NavigationKind, to: String },
    Flash { message: String },
    Error { message: String },
}

impl HeadlessEvent {
    pub fn emit(&self) {
        match serde_json::to_string(self) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!("Failed to serialize headless event: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_parses_tagged_json() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"save","params":{"name":"Gizmo"}}"#).unwrap();
        let Some(Message::Save { params }) = event.into_message() else {
            panic!("expected a save");
        };
        assert_eq!(params.get_str("name"), Some("Gizmo"));

        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"navigate","kind":"patch","to":"/products/new"}"#)
                .unwrap();
        assert!(matches!(
            event.into_message(),
            Some(Message::Navigate { kind: NavigationKind::Patch, .. })
        ));
    }

    #[test]
    fn test_patch_is_not_a_message() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"patch","path":"/products/1/edit"}"#).unwrap();
        assert!(event.into_message().is_none());
    }

    #[test]
    fn test_headless_event_serialization() {
        let event = HeadlessEvent::Redirected {
            kind: NavigationKind::Navigate,
            to: "/products/1".into(),
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"redirected","kind":"navigate","to":"/products/1"}"#
        );
    }
}
