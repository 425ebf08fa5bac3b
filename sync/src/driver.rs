//! One sync run: extract, reconcile, regenerate, publish.
//!
//! In [`RunMode::DryRun`] the run records `HEAD`, prints the plan to the
//! report sink instead of applying it, and soft-resets to the recorded
//! revision afterwards whether or not the run failed. A rollback failure
//! takes precedence over the run's own error.

use std::io::Write;
use std::path::Path;

use rockup_sync_core::ChangeSet;
use rockup_sync_sqlite::RockspecIndex;
use rockup_sync_tools::{CommandRunner, Git, Luarocks};
use tracing::{info, warn};

use crate::config::SyncConfig;
use crate::error::{Context, Result};
use crate::manifest::ManifestBuilder;
use crate::publish::{PublishOutcome, Publisher};
use crate::reconcile::{ApplyReport, Reconciler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Show what would change, then rewind git history.
    DryRun,
    /// Apply, regenerate, commit, and push.
    Commit,
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// `HEAD` touched no rockspec files.
    NoChanges,
    /// Dry run; carries the changes that would have been applied.
    DryRun(ChangeSet),
    Applied(ApplyReport),
}

/// Drives a sync run in one working tree.
pub struct Syncer<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    config: &'a SyncConfig,
    workdir: &'a Path,
}

impl<'a, R: CommandRunner + ?Sized> Syncer<'a, R> {
    pub fn new(runner: &'a R, config: &'a SyncConfig, workdir: &'a Path) -> Self {
        Self {
            runner,
            config,
            workdir,
        }
    }

    fn git(&self) -> Git<'a, R> {
        let config = self.config;
        Git::new(self.runner, &config.tools.git, self.workdir)
    }

    /// Runs the sync, writing user-facing report lines to `out`.
    ///
    /// # Errors
    ///
    /// Returns the first failure, prefixed with the operation and path
    /// that failed. In dry-run mode a failed rollback is returned instead
    /// of any earlier error.
    pub fn run(&self, mode: RunMode, out: &mut dyn Write) -> Result<SyncOutcome> {
        if mode == RunMode::Commit {
            return self.sync(mode, out);
        }

        let rollback_sha = self
            .git()
            .head_sha()
            .context("Failed to get current commit SHA")?;
        writeln!(out, "[DRY RUN] Starting dry-run mode. Original commit: {rollback_sha}")?;
        writeln!(out, "[DRY RUN] Use --commit flag to actually apply changes")?;

        let result = self.sync(mode, out);
        if let Err(err) = &result {
            warn!(error = %err, "dry run failed, rolling back");
        }

        self.git()
            .reset_soft(&rollback_sha)
            .context("Failed to rollback changes")?;
        info!(sha = %rollback_sha, "[DRY RUN] Rolled back to original commit");
        result
    }

    fn sync(&self, mode: RunMode, out: &mut dyn Write) -> Result<SyncOutcome> {
        let index = RockspecIndex::new(self.config.database_path(self.workdir));
        index.ensure_created()?;

        let Some(changes) = self.git().head_changes().context("Failed to obtain git diff")? else {
            info!("No .rockspec changes detected. Nothing to do.");
            return Ok(SyncOutcome::NoChanges);
        };

        if mode == RunMode::DryRun {
            write_plan(out, &changes)?;
            return Ok(SyncOutcome::DryRun(changes));
        }

        let tools = &self.config.tools;
        let luarocks = Luarocks::new(self.runner, &tools.luarocks, self.workdir);
        let mut report = Reconciler::new(&index, luarocks).apply(&changes)?;

        ManifestBuilder::new(
            self.runner,
            &tools.luarocks_admin,
            &tools.zip,
            self.workdir,
            &self.config.lua_versions,
        )
        .regenerate()
        .context("Failed to regenerate manifest")?;

        let outcome = Publisher::new(self.git(), &self.config.publish).commit_and_push()?;
        report.pushed = outcome == PublishOutcome::Pushed;

        info!(
            sha = %changes.commit_sha,
            removed = report.removed,
            upserted = report.upserted,
            rows = index.count()?,
            "rocks.db synced"
        );
        Ok(SyncOutcome::Applied(report))
    }
}

fn write_plan(out: &mut dyn Write, changes: &ChangeSet) -> std::io::Result<()> {
    writeln!(out, "[DRY RUN] Would apply the following changes:")?;
    for path in changes.to_delete.keys() {
        writeln!(out, "[DRY RUN]   - Remove: {path}")?;
    }
    for path in changes.to_upsert.keys() {
        writeln!(out, "[DRY RUN]   - Add/Update: {path}")?;
    }
    writeln!(out, "[DRY RUN] Would regenerate manifest files")?;
    writeln!(out, "[DRY RUN] Would commit and push changes")
}
