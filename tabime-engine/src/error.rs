//! Error types for table operations

/// Errors that can occur while opening, querying or updating a phrase table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON parse error")]
    Json(#[from] serde_json::Error),

    #[error("invalid table format at line {line}: {reason}")]
    Format { line: usize, reason: String },

    #[error("table file not found: {0}")]
    NotFound(String),

    #[error("no storage location for table '{0}'")]
    UnknownTable(String),

    #[error("no entry for code '{code}' with phrase '{phrase}'")]
    UnknownEntry { code: String, phrase: String },

    #[error("table '{0}' is unavailable")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, TableError>;
