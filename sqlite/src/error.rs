//! Error types for index storage operations.

use rockup_sync_core::ValidationError;
use thiserror::Error;

/// Errors that can occur while reading or writing the index.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The SQL template or its parameters were rejected before execution.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Convenience alias for results with [`StorageError`].
pub type Result<T> = std::result::Result<T, StorageError>;
