//! auix-app - View/controller runtime for auix
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! generated views: per-instance [`ViewState`], the [`Message`]s it reacts
//! to, the `update` function, backend action execution against the
//! resource's connector, and the routing stack that gives nested show/edit
//! pages a correct "back". Also loads `.auix/config.toml`.

pub mod actions;
pub mod config;
pub mod handler;
pub mod instance;
pub mod message;
pub mod process;
pub mod spawn;
pub mod state;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use config::Settings;
pub use handler::{with_stack, UpdateAction, UpdateResult};
pub use instance::ViewInstance;
pub use message::Message;
pub use spawn::{spawn, ViewHandle};
pub use state::{
    Flash, FlashKind, FormMode, FormState, FormStatus, IndexMode, IndexState, Redirect, Screen,
    ShowMode, ShowState, TabState, ViewState,
};
