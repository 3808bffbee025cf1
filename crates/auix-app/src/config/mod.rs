//! Configuration file parsing for auix
//!
//! Supports `.auix/config.toml` - project settings.

pub mod settings;
pub mod types;

pub use settings::{config_path, init_config_dir, load_settings, read_settings, save_settings};
pub use types::*;
