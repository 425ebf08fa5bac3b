//! Core types for mirroring rockspec changes into the `rocks.db` index.
//!
//! This crate is free of I/O. It provides:
//!
//! - [`to_positional`] - rewrites `$name` SQL placeholders into positional
//!   `?` markers, honoring quoted regions.
//! - [`RockspecPath`] - classifies `rockspecs/<host>/<owner>/<repo>/<file>.rockspec`
//!   paths into their natural-key fields.
//! - [`RockspecName`] - the `<name>-<version>-<revision>.rockspec` convention.
//! - [`ChangeSet`] - upserts and deletions from one commit, with
//!   last-status-wins semantics.
//! - [`RockspecRecord`] / [`RockspecUpsert`] - index rows.
//!
//! # Example
//!
//! ```
//! use rockup_sync_core::{ChangeSet, ChangeStatus};
//!
//! let mut changes = ChangeSet::new("abc123", "2025-01-01T00:00:00+00:00");
//! changes.record(ChangeStatus::Modified, "rockspecs/github.com/foo/bar/pkg-1.0-1.rockspec");
//! changes.record(ChangeStatus::Deleted, "rockspecs/github.com/foo/bar/pkg-1.0-1.rockspec");
//! assert!(changes.to_upsert.is_empty());
//! assert_eq!(changes.to_delete.len(), 1);
//! ```

mod change;
mod error;
mod params;
mod path;
mod record;

pub use change::{ChangeSet, ChangeStatus};
pub use error::{ExtractionError, Result, ValidationError};
pub use params::{POSITIONAL_MARKER, PositionalSql, to_positional};
pub use path::{ROCKSPEC_PREFIX, ROCKSPEC_SUFFIX, RockspecKey, RockspecName, RockspecPath};
pub use record::{RockspecRecord, RockspecUpsert};
