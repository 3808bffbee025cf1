//! auix-render - Views for auix
//!
//! Turns a compiled view configuration plus per-instance [`ViewState`] into
//! [`Markup`]. Rendering dispatches on the expanded layout tree's tags and
//! draws every visual element through a [`Components`] library, so a
//! template can restyle the output without touching the dispatcher.
//!
//! [`ViewState`]: auix_app::ViewState
//! [`Markup`]: auix_core::Markup

pub mod components;
pub mod render;
pub mod template;
pub mod theme;
pub mod view;

pub use components::{
    BasicComponents, ButtonKind, Components, ContainerKind, Event, InputProps, TableProps,
    TableRow,
};
pub use render::{render, render_inner_elements, FieldMode, RenderContext};
pub use template::BasicTemplate;
pub use view::render_view;
