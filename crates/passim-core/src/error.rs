//! Error types for passim-core.
//!
//! Every Passim crate returns [`Result`] with this [`Error`]. Stale index
//! references and malformed query syntax are deliberately *not* errors:
//! the former resolve to nothing, the latter degrade to literal terms.

use std::path::{Path, PathBuf};

/// Result type alias for Passim operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across Passim.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An entity kind the text projector does not know about.
    #[error("Entity kind is not indexable: {kind}")]
    NotIndexable {
        /// The unrecognized kind name.
        kind: String,
    },

    /// A mutation referenced an entity that does not exist.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Kind of resource that was looked up.
        resource: String,
        /// Identifier that was not found.
        id: String,
    },

    /// A uniqueness or relationship constraint was violated.
    #[error("Constraint violation: {message}")]
    Conflict {
        /// What constraint failed.
        message: String,
    },

    /// The entity store or search index store cannot be read or written.
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        /// Why the store is unavailable.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic.
        message: String,
    },

    /// I/O error, optionally tied to a path.
    #[error("I/O error{}: {source}", path_suffix(.path))]
    Io {
        /// Path involved in the failed operation, if any.
        path: Option<PathBuf>,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Any other internal failure.
    #[error("Operation failed: {0}")]
    Operation(String),
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" at {}", p.display()))
        .unwrap_or_default()
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { path: None, source }
    }
}

impl Error {
    /// Returns whether retrying the failed operation could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::StoreUnavailable { .. } => true,
            Error::Io { .. } => true,
            Error::NotIndexable { .. } => false,
            Error::NotFound { .. } => false,
            Error::Conflict { .. } => false,
            Error::Config { .. } => false,
            Error::Json(_) => false,
            Error::Toml(_) => false,
            Error::Operation(_) => false,
        }
    }

    /// Creates a not-indexable error for an unknown kind name.
    pub fn not_indexable<S: Into<String>>(kind: S) -> Self {
        Error::NotIndexable { kind: kind.into() }
    }

    /// Creates a not-found error.
    pub fn not_found<I: ToString, R: Into<String>>(id: I, resource: R) -> Self {
        Error::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    /// Creates a constraint violation error.
    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Error::Conflict {
            message: message.into(),
        }
    }

    /// Creates a store-unavailable error.
    pub fn store_unavailable<S: Into<String>>(message: S) -> Self {
        Error::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path it happened on.
    pub fn io_with_path(source: std::io::Error, path: &Path) -> Self {
        Error::Io {
            path: Some(path.to_path_buf()),
            source,
        }
    }

    /// Creates a generic operation error.
    pub fn operation<S: Into<String>>(message: S) -> Self {
        Error::Operation(message.into())
    }
}
