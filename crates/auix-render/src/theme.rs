//! CSS class names shared by the basic components and the default actions.
//!
//! Stylesheets are provided by the host; only the class vocabulary lives
//! here.

use auix_app::FlashKind;

use crate::components::{ButtonKind, ContainerKind};

// --- Page structure ---
pub const PAGE: &str = "auix-page";
pub const HEADER: &str = "auix-header";
pub const TITLE: &str = "auix-title";
pub const SUBTITLE: &str = "auix-subtitle";
pub const ACTIONS: &str = "auix-actions";
pub const EMPTY: &str = "auix-empty";

// --- Tables ---
pub const TABLE: &str = "auix-table";
pub const ROW: &str = "auix-row";
pub const ROW_ACTIONS: &str = "auix-row-actions";
pub const PAGINATION: &str = "auix-pagination";

// --- Forms ---
pub const FORM: &str = "auix-form";
pub const FIELD: &str = "auix-field";
pub const LABEL: &str = "auix-label";
pub const INPUT: &str = "auix-input";
pub const INPUT_ERROR: &str = "auix-input auix-input-error";
pub const FIELD_ERROR: &str = "auix-field-error";
pub const ERROR_SUMMARY: &str = "auix-error-summary";
pub const UNIMPLEMENTED: &str = "auix-unimplemented";

// --- Overlays and tabs ---
pub const MODAL: &str = "auix-modal";
pub const TABS: &str = "auix-tabs";
pub const TAB: &str = "auix-tab";
pub const TAB_ACTIVE: &str = "auix-tab auix-tab-active";

// --- Links ---
pub const LINK: &str = "auix-link";

pub fn button(kind: ButtonKind) -> &'static str {
    match kind {
        ButtonKind::Primary => "auix-button auix-button-primary",
        ButtonKind::Secondary => "auix-button",
        ButtonKind::Danger => "auix-button auix-button-danger",
    }
}

pub fn container(kind: ContainerKind) -> &'static str {
    match kind {
        ContainerKind::Inline => "auix-inline",
        ContainerKind::Stacked => "auix-stacked",
        ContainerKind::Group => "auix-group",
        ContainerKind::Section => "auix-section",
    }
}

pub fn flash(kind: FlashKind) -> &'static str {
    match kind {
        FlashKind::Info => "auix-flash auix-flash-info",
        FlashKind::Error => "auix-flash auix-flash-error",
    }
}
