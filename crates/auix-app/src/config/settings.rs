//! Reading and writing `.auix/config.toml`

use std::path::{Path, PathBuf};

use auix_core::prelude::*;

use super::types::Settings;

const CONFIG_DIR: &str = ".auix";
const CONFIG_FILE: &str = "config.toml";

const DEFAULT_CONFIG: &str = r#"# auix configuration

[compile]
preload_depth = 1       # Association levels loaded with each record

[routing]
stack_param = "_stack"  # Query parameter carrying the back-navigation stack
base_path = ""          # Prefix of every generated route, e.g. "/admin"

[ui]
page_size = 20          # Rows per index page, 0 = no paging
show_flash = true
"#;

/// Location of the config file under `project_path`.
pub fn config_path(project_path: &Path) -> PathBuf {
    project_path.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Settings from the config file, `None` when there is no file.
pub fn read_settings(project_path: &Path) -> Result<Option<Settings>> {
    let path = config_path(project_path);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let settings = toml::from_str(&content).map_err(|e| Error::config_parse(&path, e))?;
    Ok(Some(settings))
}

/// Settings for `project_path`. A missing or broken file yields defaults.
pub fn load_settings(project_path: &Path) -> Settings {
    match read_settings(project_path) {
        Ok(Some(settings)) => {
            debug!("Loaded settings from {}", config_path(project_path).display());
            settings
        }
        Ok(None) => {
            debug!("No config under {}, using defaults", project_path.display());
            Settings::default()
        }
        Err(e) => {
            warn!("{}; using default settings", e);
            Settings::default()
        }
    }
}

fn ensure_config_dir(project_path: &Path) -> Result<PathBuf> {
    let dir = project_path.join(CONFIG_DIR);
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    Ok(dir)
}

/// Write the commented default config unless one exists.
pub fn init_config_dir(project_path: &Path) -> Result<()> {
    ensure_config_dir(project_path)?;
    let path = config_path(project_path);
    if path.exists() {
        return Ok(());
    }
    std::fs::write(&path, DEFAULT_CONFIG).with_context(|| format!("writing {}", path.display()))?;
    info!("Created {}", path.display());
    Ok(())
}

/// Replace the config file with `settings`, via a temp file and rename.
pub fn save_settings(project_path: &Path, settings: &Settings) -> Result<()> {
    let dir = ensure_config_dir(project_path)?;
    let path = config_path(project_path);
    let temp = dir.join(".config.toml.tmp");

    let body = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("cannot serialize settings: {}", e)))?;
    std::fs::write(&temp, format!("# auix configuration\n\n{}", body))
        .with_context(|| format!("writing {}", temp.display()))?;
    std::fs::rename(&temp, &path).with_context(|| format!("replacing {}", path.display()))?;

    info!("Saved settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_config(project: &Path, body: &str) {
        std::fs::create_dir_all(project.join(CONFIG_DIR)).unwrap();
        std::fs::write(config_path(project), body).unwrap();
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let temp = tempdir().unwrap();
        assert!(read_settings(temp.path()).unwrap().is_none());
        assert_eq!(load_settings(temp.path()), Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        write_config(
            temp.path(),
            "[compile]\npreload_depth = 2\n\n[routing]\nbase_path = \"/admin\"\n",
        );

        let settings = load_settings(temp.path());
        assert_eq!(settings.compile.preload_depth, 2);
        assert_eq!(settings.routing.base_path, "/admin");
        assert_eq!(settings.routing.stack_param, "_stack");
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error_and_loads_defaults() {
        let temp = tempdir().unwrap();
        write_config(temp.path(), "not [valid toml");

        let err = read_settings(temp.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.is_configuration());
        assert_eq!(load_settings(temp.path()), Settings::default());
    }

    #[test]
    fn test_init_config_dir_writes_loadable_defaults() {
        let temp = tempdir().unwrap();
        init_config_dir(temp.path()).unwrap();
        assert_eq!(
            read_settings(temp.path()).unwrap(),
            Some(Settings::default())
        );

        // Existing files are left alone.
        write_config(temp.path(), "[ui]\npage_size = 5\n");
        init_config_dir(temp.path()).unwrap();
        assert_eq!(load_settings(temp.path()).ui.page_size, 5);
    }

    #[test]
    fn test_save_settings_round_trip() {
        let temp = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.ui.page_size = 50;
        settings.ui.show_flash = false;
        settings.routing.stack_param = "back".into();

        save_settings(temp.path(), &settings).unwrap();
        assert_eq!(load_settings(temp.path()), settings);
        assert!(!temp
            .path()
            .join(CONFIG_DIR)
            .join(".config.toml.tmp")
            .exists());
    }
}
