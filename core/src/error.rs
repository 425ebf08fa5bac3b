//! Error types shared across the sync pipeline.
//!
//! [`ValidationError`] covers caller-caused input problems (bad rockspec
//! paths, filenames, or SQL placeholders). [`ExtractionError`] covers
//! malformed `git show` output.

use thiserror::Error;

/// Input validation errors.
///
/// Each variant echoes the offending input in its `Display` message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A `$` outside a quoted region is not followed by an identifier.
    ///
    /// `position` is the byte offset of the `$` in the SQL text.
    #[error("Invalid SQL placeholder at position {position}")]
    InvalidPlaceholder { position: usize },
    /// A placeholder names a parameter that was not supplied.
    #[error("Missing SQL parameter: {0}")]
    MissingParameter(String),
    /// Path is not of the form `rockspecs/<host>/<owner>/<repo>/<file>.rockspec`.
    #[error(
        "Invalid rockspec path: expected format 'rockspecs/host/owner/repo/filename.rockspec', got: {0}"
    )]
    InvalidRockspecPath(String),
    /// Filename does not follow `<name>-<version>-<revision>.rockspec`.
    #[error("Invalid rockspec filename format: {0}")]
    InvalidRockspecFilename(String),
}

/// Errors raised while parsing the output of the single-commit diff.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// Fewer than the two mandatory header lines were present.
    #[error("Unexpected git show output")]
    UnexpectedOutput,
    /// First line did not match `commit: <sha>`.
    #[error("Failed to parse commit metadata from git show output: {0}")]
    MissingCommitHeader(String),
    /// Second line did not match `date: <timestamp>`.
    #[error("Failed to parse commit date from git show output: {0}")]
    MissingDateHeader(String),
    /// The commit timestamp is not RFC 3339.
    #[error("invalid commit timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Convenience alias for results with [`ValidationError`].
pub type Result<T> = std::result::Result<T, ValidationError>;
