//! Logging setup
//!
//! Logs go to a daily rolling file so stdout stays free for rendered pages
//! and headless JSON events. `AUIX_LOG` takes an `EnvFilter` directive:
//!
//! ```bash
//! AUIX_LOG=debug auix render /products
//! AUIX_LOG=auix_compiler=trace auix routes
//! ```

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Result, ResultExt};

pub const LOG_ENV: &str = "AUIX_LOG";
const LOG_FILE_PREFIX: &str = "auix.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub directory: PathBuf,
    /// Filter used when `AUIX_LOG` is unset or invalid.
    pub default_filter: String,
    /// Mirror records to stderr as well.
    pub stderr: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            default_filter: "auix=info,warn".to_string(),
            stderr: false,
        }
    }
}

impl LogOptions {
    pub fn with_stderr(mut self, stderr: bool) -> Self {
        self.stderr = stderr;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

/// `<data-local-dir>/auix/logs`, or `./auix/logs` without a home.
pub fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("auix")
        .join("logs")
}

/// Prefix of the rolling files in `directory`; the appender adds the date.
pub fn log_file_prefix(directory: &Path) -> PathBuf {
    directory.join(LOG_FILE_PREFIX)
}

/// Install the global subscriber. Call once, before compiling a site.
pub fn init(options: &LogOptions) -> Result<()> {
    std::fs::create_dir_all(&options.directory)
        .with_context(|| format!("creating log directory {}", options.directory.display()))?;

    let file = RollingFileAppender::new(Rotation::DAILY, &options.directory, LOG_FILE_PREFIX);
    let timer = || fmt::time::ChronoLocal::new(TIMESTAMP_FORMAT.to_string());

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(timer());
    let stderr_layer = options.stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_timer(timer())
    });

    tracing_subscriber::registry()
        .with(options.filter())
        .with(file_layer)
        .with(stderr_layer)
        .init();

    tracing::info!("Logging to {}", options.directory.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = LogOptions::default();
        assert!(options.directory.ends_with("auix/logs"));
        assert_eq!(options.default_filter, "auix=info,warn");
        assert!(!options.stderr);
        assert!(LogOptions::default().with_stderr(true).stderr);
    }

    #[test]
    fn test_log_file_prefix() {
        let prefix = log_file_prefix(Path::new("/var/log/auix"));
        assert_eq!(prefix, PathBuf::from("/var/log/auix/auix.log"));
    }
}
