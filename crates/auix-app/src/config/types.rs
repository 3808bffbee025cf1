//! Configuration types for auix
//!
//! `Settings` mirrors `.auix/config.toml`; every section and key is
//! optional and falls back to its default.

use serde::{Deserialize, Serialize};

use auix_compiler::CompileOptions;

/// Project settings (.auix/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub compile: CompileSettings,

    #[serde(default)]
    pub routing: RoutingSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

impl Settings {
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            preload_depth: self.compile.preload_depth,
            base_path: self.routing.base_path.clone(),
        }
    }
}

/// Layout compilation settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompileSettings {
    /// How many association levels are preloaded with each record
    #[serde(default = "default_preload_depth")]
    pub preload_depth: usize,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            preload_depth: default_preload_depth(),
        }
    }
}

/// Routing settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoutingSettings {
    /// Query parameter carrying the encoded routing stack
    #[serde(default = "default_stack_param")]
    pub stack_param: String,

    /// Prefix of every generated route, e.g. "/admin"
    #[serde(default)]
    pub base_path: String,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            stack_param: default_stack_param(),
            base_path: String::new(),
        }
    }
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiSettings {
    /// Rows per index page (0 = no paging)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Show flash messages after saves and failed deletes
    #[serde(default = "default_true")]
    pub show_flash: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            show_flash: true,
        }
    }
}

fn default_preload_depth() -> usize {
    1
}

fn default_stack_param() -> String {
    "_stack".to_string()
}

fn default_page_size() -> usize {
    20
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.compile.preload_depth, 1);
        assert_eq!(settings.routing.stack_param, "_stack");
        assert_eq!(settings.routing.base_path, "");
        assert_eq!(settings.ui.page_size, 20);
        assert!(settings.ui.show_flash);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let settings: Settings = toml::from_str("[ui]\nshow_flash = false\n").unwrap();
        assert!(!settings.ui.show_flash);
        assert_eq!(settings.ui.page_size, 20);
        assert_eq!(settings.routing.stack_param, "_stack");
    }

    #[test]
    fn test_compile_options() {
        let mut settings = Settings::default();
        settings.compile.preload_depth = 3;
        settings.routing.base_path = "/admin".into();
        let options = settings.compile_options();
        assert_eq!(options.preload_depth, 3);
        assert_eq!(options.base_path, "/admin");
    }
}
