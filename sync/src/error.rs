//! Error type for the sync pipeline.
//!
//! Every lower-layer error converts into [`SyncError`]. Call sites attach
//! an operation prefix with [`Context`], so the top level can report one
//! line such as `Failed to apply add/update for <path>: <cause>`.

use std::path::PathBuf;

use rockup_sync_core::{ExtractionError, ValidationError};
use rockup_sync_sqlite::StorageError;
use rockup_sync_tools::ToolError;
use thiserror::Error;

/// Errors that can abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// An external program failed to start, exited non-zero, or timed out.
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`SyncConfig`](crate::SyncConfig).
    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Writing the run report failed.
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),

    /// `source` wrapped with the operation that was in progress.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<SyncError>,
    },
}

impl SyncError {
    /// Wraps `self` with an operation prefix.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Convenience alias for results with [`SyncError`].
pub type Result<T> = std::result::Result<T, SyncError>;

/// Attaches an operation prefix to any error convertible into [`SyncError`].
pub trait Context<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Like [`context`](Self::context), but builds the prefix only on error.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E: Into<SyncError>> Context<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|err| err.into().context(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| err.into().context(f()))
    }
}
