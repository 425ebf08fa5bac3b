//! Git adapter tests against throwaway repositories.
//!
//! Each test returns early when `git` is not installed.

use std::fs;
use std::path::Path;
use std::process::Command;

use rockup_sync_tools::{Git, ProcessRunner};

const PKG: &str = "rockspecs/github.com/foo/bar/pkg-1.0.0-1.rockspec";
const OTHER: &str = "rockspecs/github.com/foo/bar/pkg-1.1.0-1.rockspec";

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed");
}

fn init_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["config", "user.email", "sync@example.com"]);
    git(dir.path(), &["config", "user.name", "Sync Test"]);
    git(dir.path(), &["config", "commit.gpgsign", "false"]);
    dir
}

fn write(dir: &Path, path: &str, content: &str) {
    let file = dir.join(path);
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, content).unwrap();
}

fn commit_all(dir: &Path, message: &str) {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", message]);
}

#[test]
fn head_changes_classifies_added_and_modified() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    write(repo.path(), PKG, "v1");
    write(repo.path(), "README.md", "readme");
    commit_all(repo.path(), "first");
    write(repo.path(), PKG, "v2");
    write(repo.path(), OTHER, "new");
    write(repo.path(), "README.md", "changed");
    commit_all(repo.path(), "second");

    let runner = ProcessRunner::new();
    let git = Git::new(&runner, "git", repo.path());
    let changes = git.head_changes().unwrap().unwrap();

    assert_eq!(changes.to_upsert.keys().collect::<Vec<_>>(), vec![PKG, OTHER]);
    assert!(changes.to_delete.is_empty());
    assert_eq!(changes.commit_sha, git.head_sha().unwrap());
    assert_eq!(changes.to_upsert[PKG], changes.commit_sha);
    assert!(chrono_like(&changes.committed_at));
}

#[test]
fn head_changes_classifies_removed() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    write(repo.path(), PKG, "v1");
    commit_all(repo.path(), "first");
    fs::remove_file(repo.path().join(PKG)).unwrap();
    commit_all(repo.path(), "remove");

    let runner = ProcessRunner::new();
    let changes = Git::new(&runner, "git", repo.path()).head_changes().unwrap().unwrap();
    assert!(changes.to_upsert.is_empty());
    assert_eq!(changes.to_delete.keys().collect::<Vec<_>>(), vec![PKG]);
}

#[test]
fn head_changes_without_rockspecs_is_none() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    write(repo.path(), "index.html", "<html></html>");
    write(repo.path(), "rockspecs/a/b/c.rockspec", "too shallow");
    commit_all(repo.path(), "docs");

    let runner = ProcessRunner::new();
    assert!(Git::new(&runner, "git", repo.path()).head_changes().unwrap().is_none());
}

#[test]
fn staged_changes_and_soft_reset() {
    if !git_available() {
        return;
    }
    let repo = init_repo();
    write(repo.path(), "a.txt", "a");
    commit_all(repo.path(), "first");

    let runner = ProcessRunner::new();
    let git = Git::new(&runner, "git", repo.path());
    let first = git.head_sha().unwrap();
    assert_eq!(first.len(), 40);
    assert!(!git.has_staged_changes().unwrap());

    write(repo.path(), "b.txt", "b");
    git.add(&["b.txt"]).unwrap();
    assert!(git.has_staged_changes().unwrap());

    git.commit("second").unwrap();
    assert_ne!(git.head_sha().unwrap(), first);
    assert!(!git.has_staged_changes().unwrap());

    git.reset_soft(&first).unwrap();
    assert_eq!(git.head_sha().unwrap(), first);
    assert!(git.has_staged_changes().unwrap());
}

/// `%cI` output looks like `2025-01-01T12:34:56+02:00`.
fn chrono_like(value: &str) -> bool {
    value.len() >= 20 && value.as_bytes()[4] == b'-' && value.contains('T')
}
