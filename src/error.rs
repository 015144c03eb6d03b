use thiserror::Error;

use crate::index::ReverseKind;

/// Main error type for mstgraph
#[derive(Error, Debug)]
pub enum MstgraphError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON stored in a column or payload
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A schema file failed to apply; nothing from it was committed
    #[error("Migration {name} failed: {source}")]
    Migration {
        name: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Root entity of a request does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: i64 },

    /// Reverse index or join table names an id the store cannot resolve
    #[error("Reverse index {index} references missing id {id}")]
    IndexInconsistency { index: ReverseKind, id: i64 },

    /// Blocking database task failed to complete
    #[error("Task error: {0}")]
    Task(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MstgraphError {
    /// Whether this error is the root-lookup failure for `kind`/`id`.
    pub fn is_not_found(&self, kind: &str, id: i64) -> bool {
        matches!(self, MstgraphError::NotFound { kind: k, id: i } if *k == kind && *i == id)
    }
}

/// Convenient Result type using MstgraphError
pub type Result<T> = std::result::Result<T, MstgraphError>;
