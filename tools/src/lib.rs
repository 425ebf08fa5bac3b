//! External tool adapters for rockup-sync.
//!
//! # Architecture
//!
//! - **`runner`** - the [`CommandRunner`] capability and [`ProcessRunner`],
//!   which spawns real processes with an optional timeout
//! - **`fake`** - [`ScriptedRunner`], an in-memory runner for tests
//! - **`git`** - [`Git`], the version-control operations the sync needs
//! - **`luarocks`** - [`Luarocks`], rockspec linting and loading
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//! use rockup_sync_tools::{Git, ProcessRunner};
//!
//! let runner = ProcessRunner::new();
//! let git = Git::new(&runner, "git", Path::new("."));
//! if let Some(changes) = git.head_changes().unwrap() {
//!     println!("{} rockspec changes in {}", changes.len(), changes.commit_sha);
//! }
//! ```

mod error;
mod fake;
mod git;
mod luarocks;
mod runner;

pub use error::{Result, ToolError};
pub use fake::{Invocation, ScriptedRunner};
pub use git::Git;
pub use luarocks::Luarocks;
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};
