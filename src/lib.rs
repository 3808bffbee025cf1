//! auix Library
//!
//! Compiles the bundled demo site and drives its views without a browser:
//! render a route to HTML, list routes, or feed client events through a
//! view instance headlessly.

pub mod demo;
pub mod headless;

pub use demo::{demo_site, demo_store};
pub use headless::run_events;
