//! Staging, committing, and pushing the regenerated artifacts.

use rockup_sync_tools::{CommandRunner, Git};
use tracing::info;

use crate::config::PublishConfig;
use crate::error::{Context, Result};

/// Result of [`Publisher::commit_and_push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Nothing was staged after `git add`, so no commit was made.
    Skipped,
    Pushed,
}

pub struct Publisher<'a, R: CommandRunner + ?Sized> {
    git: Git<'a, R>,
    config: &'a PublishConfig,
}

impl<'a, R: CommandRunner + ?Sized> Publisher<'a, R> {
    pub fn new(git: Git<'a, R>, config: &'a PublishConfig) -> Self {
        Self { git, config }
    }

    /// Stages the configured paths and, if anything changed, commits and
    /// pushes them.
    pub fn commit_and_push(&self) -> Result<PublishOutcome> {
        let paths: Vec<&str> = self.config.paths.iter().map(String::as_str).collect();
        self.git.add(&paths).context("git add failed")?;

        if !self
            .git
            .has_staged_changes()
            .context("git diff --cached failed")?
        {
            info!("No staged changes after git add. Skipping commit.");
            return Ok(PublishOutcome::Skipped);
        }

        self.git
            .commit(&self.config.commit_message)
            .context("git commit failed")?;
        self.git
            .push(&self.config.remote, &self.config.refspec)
            .context("git push failed")?;
        info!(remote = %self.config.remote, refspec = %self.config.refspec, "pushed sync commit");
        Ok(PublishOutcome::Pushed)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rockup_sync_tools::{CommandOutput, ScriptedRunner};

    use super::*;

    fn publish(runner: &ScriptedRunner) -> Result<PublishOutcome> {
        let config = PublishConfig::default();
        Publisher::new(Git::new(runner, "git", Path::new(".")), &config).commit_and_push()
    }

    #[test]
    fn test_nothing_staged_skips_commit() {
        let runner = ScriptedRunner::new().respond_to("git", "diff", CommandOutput::ok(""));
        assert_eq!(publish(&runner).unwrap(), PublishOutcome::Skipped);
        assert_eq!(
            runner.command_lines("git"),
            vec!["git add rocks.db index.html manifest*", "git diff --cached --quiet"]
        );
    }

    #[test]
    fn test_staged_changes_are_committed_and_pushed() {
        let runner = ScriptedRunner::new().respond_to("git", "diff", CommandOutput::failed(1, ""));
        assert_eq!(publish(&runner).unwrap(), PublishOutcome::Pushed);
        assert_eq!(
            runner.command_lines("git"),
            vec![
                "git add rocks.db index.html manifest*",
                "git diff --cached --quiet",
                "git commit -m chore(rockup): sync rocks.db",
                "git push origin HEAD",
            ]
        );
    }

    #[test]
    fn test_failures_are_labelled_by_step() {
        let add = ScriptedRunner::new().respond_to("git", "add", CommandOutput::failed(128, "pathspec 'index.html' did not match"));
        let message = publish(&add).unwrap_err().to_string();
        assert!(message.starts_with("git add failed: git exited with code 128"));

        let push = ScriptedRunner::new()
            .respond_to("git", "diff", CommandOutput::failed(1, ""))
            .respond_to("git", "push", CommandOutput::failed(1, "rejected"));
        let message = publish(&push).unwrap_err().to_string();
        assert!(message.starts_with("git push failed: git exited with code 1"));
    }
}
