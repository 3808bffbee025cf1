//! Error types for site compilation and view dispatch
//!
//! Configuration mistakes surface while a site is compiled and abort it.
//! Backend and routing failures surface while views run and are recovered
//! by the instance that hit them. Validation problems are never errors:
//! they travel as [`ChangeSet`](crate::record::ChangeSet) values.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Infrastructure
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },

    // ─────────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Cannot parse {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    // ─────────────────────────────────────────────────────────────
    // Resources and fields
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown resource '{name}'")]
    UnknownResource { name: String },

    #[error("Resource '{name}' is declared more than once")]
    DuplicateResource { name: String },

    #[error("Layout for resource '{resource}' references unknown field '{key}'")]
    UnknownField { resource: String, key: String },

    #[error("Invalid layout for '{resource}': {message}")]
    Layout { resource: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown action group '{name}'")]
    UnknownActionGroup { name: String },

    #[error("Action group '{group}' cannot be used in a {view} view")]
    ActionGroupNotAllowed { group: String, view: String },

    // ─────────────────────────────────────────────────────────────
    // Connectors
    // ─────────────────────────────────────────────────────────────
    #[error("Resource '{resource}' has no '{operation}' operation (looked for '{function}')")]
    MissingOperation {
        resource: String,
        operation: String,
        function: String,
    },

    #[error("Function '{function}' for resource '{resource}' is not a {expected} operation")]
    OperationSignature {
        resource: String,
        function: String,
        expected: String,
    },

    #[error("Backend error: {message}")]
    Backend { message: String },

    // ─────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────
    #[error("Route not found: {path}")]
    RouteNotFound { path: String },

    #[error("View instance inbox closed: {message}")]
    InboxClosed { message: String },
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn config_parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::ConfigParse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn unknown_resource(name: impl Into<String>) -> Self {
        Self::UnknownResource { name: name.into() }
    }

    pub fn unknown_field(resource: impl Into<String>, key: impl Into<String>) -> Self {
        Self::UnknownField {
            resource: resource.into(),
            key: key.into(),
        }
    }

    pub fn layout(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Layout {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn route_not_found(path: impl Into<String>) -> Self {
        Self::RouteNotFound { path: path.into() }
    }

    pub fn inbox_closed(message: impl Into<String>) -> Self {
        Self::InboxClosed {
            message: message.into(),
        }
    }

    /// The error with any context layers peeled off.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Mistakes in declarative configuration. Raised while compiling a site
    /// and never recovered.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self.root_cause(),
            Error::Config { .. }
                | Error::ConfigParse { .. }
                | Error::UnknownResource { .. }
                | Error::DuplicateResource { .. }
                | Error::UnknownField { .. }
                | Error::Layout { .. }
                | Error::UnknownActionGroup { .. }
                | Error::ActionGroupNotAllowed { .. }
                | Error::MissingOperation { .. }
                | Error::OperationSignature { .. }
        )
    }

    /// Failures a running view degrades around instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.root_cause(),
            Error::Backend { .. } | Error::RouteNotFound { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────

/// Attach a description of the failed step to an error.
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.with_context(|| context.into())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| Error::Context {
            context: f(),
            source: Box::new(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::unknown_field("product", "colour");
        assert_eq!(
            err.to_string(),
            "Layout for resource 'product' references unknown field 'colour'"
        );

        let err = Error::config_parse("/tmp/.auix/config.toml", "expected `=`");
        assert_eq!(
            err.to_string(),
            "Cannot parse /tmp/.auix/config.toml: expected `=`"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_context_wraps_and_keeps_classification() {
        let result: Result<()> = Err(Error::layout("product", "bad nesting"));
        let err = result.context("compiling product").unwrap_err();
        assert_eq!(
            err.to_string(),
            "compiling product: Invalid layout for 'product': bad nesting"
        );
        assert!(err.is_configuration());
        assert!(matches!(err.root_cause(), Error::Layout { .. }));

        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = io.with_context(|| "writing config".to_string()).unwrap_err();
        assert!(matches!(err.root_cause(), Error::Io(_)));
    }

    #[test]
    fn test_error_is_configuration() {
        assert!(Error::unknown_field("product", "x").is_configuration());
        assert!(Error::MissingOperation {
            resource: "product".to_string(),
            operation: "list".to_string(),
            function: "list_products".to_string(),
        }
        .is_configuration());
        assert!(!Error::backend("timeout").is_configuration());
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::backend("connection lost").is_recoverable());
        assert!(Error::route_not_found("/nope").is_recoverable());
        assert!(!Error::unknown_resource("ghost").is_recoverable());
        assert!(!Error::inbox_closed("dropped").is_recoverable());
    }
}
