//! Applying a [`ChangeSet`] to the rockspec index.
//!
//! Deletions run before upserts. Each path is written in its own
//! transaction, so a failure stops the run but leaves earlier paths applied.
//! Re-running the same commit converges to the same table contents.

use rockup_sync_core::{ChangeSet, RockspecPath, RockspecUpsert};
use rockup_sync_sqlite::RockspecIndex;
use rockup_sync_tools::{CommandRunner, Luarocks};
use tracing::{debug, info};

use crate::error::{Context, Result};

/// Counts from one applied change set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Deletions applied, including those that matched no row.
    pub removed: usize,
    pub upserted: usize,
    /// Whether the publish step pushed a commit.
    pub pushed: bool,
}

/// Writes rockspec changes into a [`RockspecIndex`].
pub struct Reconciler<'a, R: CommandRunner + ?Sized> {
    index: &'a RockspecIndex,
    luarocks: Luarocks<'a, R>,
}

impl<'a, R: CommandRunner + ?Sized> Reconciler<'a, R> {
    pub fn new(index: &'a RockspecIndex, luarocks: Luarocks<'a, R>) -> Self {
        Self { index, luarocks }
    }

    /// Applies every deletion, then every upsert, in path order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing path and returns its error prefixed with
    /// `Failed to apply removal for <path>` or
    /// `Failed to apply add/update for <path>`.
    pub fn apply(&self, changes: &ChangeSet) -> Result<ApplyReport> {
        let mut report = ApplyReport::default();

        for path in changes.to_delete.keys() {
            self.remove(path)
                .with_context(|| format!("Failed to apply removal for {path}"))?;
            report.removed += 1;
        }

        for path in changes.to_upsert.keys() {
            self.add_or_update(path, &changes.commit_sha, &changes.committed_at)
                .with_context(|| format!("Failed to apply add/update for {path}"))?;
            report.upserted += 1;
        }

        Ok(report)
    }

    /// Deletes the row for `path`. A missing row is not an error.
    pub fn remove(&self, path: &str) -> Result<()> {
        let rockspec = RockspecPath::require(path)?;
        let rows = self.index.delete(&rockspec.key())?;
        debug!(path, rows, "deleted rockspec row");
        info!("Marked removed: {path}");
        Ok(())
    }

    /// Lints and reads the rockspec at `path`, then upserts it.
    ///
    /// `committed_at` becomes `updated_at`, and `created_at` for a new row.
    pub fn add_or_update(&self, path: &str, commit_sha: &str, committed_at: &str) -> Result<()> {
        let rockspec = RockspecPath::require(path)?;
        let content = self
            .luarocks
            .read_rockspec(&rockspec)
            .with_context(|| format!("Invalid rockspec file {path}"))?;
        let upsert = RockspecUpsert::new(&rockspec, content, commit_sha, committed_at)?;
        self.index.upsert(&upsert)?;
        debug!(path, name = %upsert.name, version = %upsert.version, size = upsert.file_size(), "upserted rockspec row");
        info!("Applied add/update for {path}");
        Ok(())
    }
}
