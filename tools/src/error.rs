//! Error types for external tool invocations.

use std::path::PathBuf;

use rockup_sync_core::{ExtractionError, ValidationError};
use thiserror::Error;

/// Errors raised while running or interpreting external tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The program could not be started.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but did not exit with status 0.
    #[error("{}", exit_message(.program, .code, .stdout, .stderr))]
    Exit {
        program: String,
        /// `None` when the process was terminated by a signal.
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// The program did not finish within the configured timeout.
    #[error("{program} timed out after {seconds}s")]
    Timeout { program: String, seconds: u64 },

    /// Reading or removing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tool output did not have the expected shape.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// A path or filename handed to a tool adapter was malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

fn exit_message(program: &str, code: &Option<i32>, stdout: &str, stderr: &str) -> String {
    let mut message = match code {
        Some(code) => format!("{program} exited with code {code}"),
        None => format!("{program} was terminated by a signal"),
    };
    if !stderr.is_empty() {
        message.push_str(&format!("\nstderr: {stderr}"));
    }
    if !stdout.is_empty() {
        message.push_str(&format!("\nstdout: {stdout}"));
    }
    message
}

/// Convenience alias for results with [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_message_includes_streams() {
        let err = ToolError::Exit {
            program: "luarocks".into(),
            code: Some(1),
            stdout: "out".into(),
            stderr: "bad rockspec".into(),
        };
        assert_eq!(
            err.to_string(),
            "luarocks exited with code 1\nstderr: bad rockspec\nstdout: out"
        );
    }

    #[test]
    fn test_exit_message_omits_empty_streams() {
        let err = ToolError::Exit {
            program: "zip".into(),
            code: Some(12),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "zip exited with code 12");
    }
}
