//! Git operations used by the sync: reading the head commit's changes,
//! staging and publishing artifacts, and rewinding history after a dry run.

use std::path::Path;

use rockup_sync_core::ChangeSet;
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::runner::CommandRunner;

/// Pretty format producing the two header lines [`ChangeSet::from_show_output`] expects.
const SHOW_FORMAT: &str = "--pretty=format:commit: %H%ndate: %cI%n";

/// A git working tree driven through a [`CommandRunner`].
pub struct Git<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    program: &'a str,
    workdir: &'a Path,
}

impl<'a, R: CommandRunner + ?Sized> Git<'a, R> {
    /// `program` is the git executable, usually `"git"`.
    pub fn new(runner: &'a R, program: &'a str, workdir: &'a Path) -> Self {
        Self {
            runner,
            program,
            workdir,
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        Ok(self.runner.run_checked(self.program, args, self.workdir)?.stdout)
    }

    /// Classifies the rockspec changes made by `HEAD`.
    ///
    /// Returns `Ok(None)` when `HEAD` touched no rockspec paths.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Exit`] when git fails and
    /// [`ToolError::Extraction`] when its output lacks the header lines.
    pub fn head_changes(&self) -> Result<Option<ChangeSet>> {
        let output = self.run(&["show", "--name-status", SHOW_FORMAT, "--diff-filter=AMD", "HEAD"])?;
        let changes = ChangeSet::from_show_output(&output)?;
        if let Some(changes) = &changes {
            debug!(
                sha = %changes.commit_sha,
                upserts = changes.to_upsert.len(),
                deletions = changes.to_delete.len(),
                "classified head commit"
            );
        }
        Ok(changes)
    }

    /// Returns the full SHA of `HEAD`.
    pub fn head_sha(&self) -> Result<String> {
        Ok(self.run(&["rev-parse", "HEAD"])?.trim().to_string())
    }

    /// Stages `paths` (git pathspecs, so globs like `manifest*` work).
    pub fn add(&self, paths: &[&str]) -> Result<()> {
        let mut args = vec!["add"];
        args.extend_from_slice(paths);
        self.run(&args)?;
        Ok(())
    }

    /// Returns `true` when the index differs from `HEAD`.
    pub fn has_staged_changes(&self) -> Result<bool> {
        let output = self
            .runner
            .run(self.program, &["diff", "--cached", "--quiet"], self.workdir)?;
        match output.code {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            code => Err(ToolError::Exit {
                program: self.program.to_string(),
                code,
                stdout: output.stdout,
                stderr: output.stderr,
            }),
        }
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message])?;
        Ok(())
    }

    /// Pushes `refspec` to `remote`.
    pub fn push(&self, remote: &str, refspec: &str) -> Result<()> {
        self.run(&["push", remote, refspec])?;
        Ok(())
    }

    /// Moves `HEAD` back to `sha`, keeping the index and working tree.
    pub fn reset_soft(&self, sha: &str) -> Result<()> {
        self.run(&["reset", "--soft", sha])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::ScriptedRunner;
    use crate::runner::CommandOutput;

    const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

    #[test]
    fn test_head_changes_parses_show_output() {
        let show = format!(
            "commit: {SHA}\ndate: 2025-01-01T00:00:00+00:00\n\nA\trockspecs/h/o/r/pkg-1.0-1.rockspec\n"
        );
        let runner = ScriptedRunner::new().respond_to("git", "show", CommandOutput::ok(show));
        let git = Git::new(&runner, "git", Path::new("."));
        let changes = git.head_changes().unwrap().unwrap();
        assert_eq!(changes.commit_sha, SHA);
        assert!(changes.to_upsert.contains_key("rockspecs/h/o/r/pkg-1.0-1.rockspec"));
        assert_eq!(
            runner.command_lines("git"),
            vec![format!("git show --name-status {SHOW_FORMAT} --diff-filter=AMD HEAD")]
        );
    }

    #[test]
    fn test_head_changes_rejects_missing_headers() {
        let runner = ScriptedRunner::new().respond_to("git", "show", CommandOutput::ok("garbage\n"));
        let git = Git::new(&runner, "git", Path::new("."));
        assert!(matches!(git.head_changes(), Err(ToolError::Extraction(_))));
    }

    #[test]
    fn test_head_sha_is_trimmed() {
        let runner = ScriptedRunner::new().respond_to("git", "rev-parse", CommandOutput::ok(format!("{SHA}\n")));
        let git = Git::new(&runner, "git", Path::new("."));
        assert_eq!(git.head_sha().unwrap(), SHA);
    }

    #[test]
    fn test_has_staged_changes_maps_exit_codes() {
        let cwd = Path::new(".");
        let clean = ScriptedRunner::new().respond_to("git", "diff", CommandOutput::ok(""));
        assert!(!Git::new(&clean, "git", cwd).has_staged_changes().unwrap());

        let dirty = ScriptedRunner::new().respond_to("git", "diff", CommandOutput::failed(1, ""));
        assert!(Git::new(&dirty, "git", cwd).has_staged_changes().unwrap());

        let broken = ScriptedRunner::new().respond_to("git", "diff", CommandOutput::failed(128, "not a repo"));
        assert!(matches!(
            Git::new(&broken, "git", cwd).has_staged_changes(),
            Err(ToolError::Exit { code: Some(128), .. })
        ));
    }

    #[test]
    fn test_add_passes_pathspecs() {
        let runner = ScriptedRunner::new();
        let git = Git::new(&runner, "git", Path::new("."));
        git.add(&["rocks.db", "index.html", "manifest*"]).unwrap();
        git.push("origin", "HEAD").unwrap();
        git.reset_soft(SHA).unwrap();
        assert_eq!(
            runner.command_lines("git"),
            vec![
                "git add rocks.db index.html manifest*".to_string(),
                "git push origin HEAD".to_string(),
                format!("git reset --soft {SHA}"),
            ]
        );
    }
}
