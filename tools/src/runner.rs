//! Running external programs.
//!
//! All collaborators (git, luarocks, luarocks-admin, zip) are reached
//! through the [`CommandRunner`] capability so the sync logic can be
//! exercised against [`ScriptedRunner`](crate::ScriptedRunner) without
//! spawning processes. [`ProcessRunner`] is the real implementation.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;
use wait_timeout::ChildExt;

use crate::error::{Result, ToolError};

/// Captured result of one program run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run that printed `stdout`.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A run that exited with `code` and printed `stderr`.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Returns `true` when the exit code is 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Capability to run an external program to completion.
pub trait CommandRunner {
    /// Runs `program` with `args` in `cwd` and captures its output.
    ///
    /// A non-zero exit is not an error here; only failing to start or to
    /// finish the process is.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput>;

    /// Like [`run`](Self::run), but a non-zero exit becomes [`ToolError::Exit`].
    fn run_checked(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
        let output = self.run(program, args, cwd)?;
        if !output.success() {
            return Err(ToolError::Exit {
                program: program.to_string(),
                code: output.code,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }
        Ok(output)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
        (**self).run(program, args, cwd)
    }
}

/// Spawns real processes, optionally killing them after a timeout.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// A runner that waits indefinitely.
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner that kills programs still running after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    fn wait(&self, program: &str, child: &mut Child) -> Result<ExitStatus> {
        let spawn_err = |source| ToolError::Spawn {
            program: program.to_string(),
            source,
        };
        let Some(timeout) = self.timeout else {
            return child.wait().map_err(spawn_err);
        };

        match child.wait_timeout(timeout).map_err(spawn_err)? {
            Some(status) => Ok(status),
            None => {
                debug!(program, timeout_secs = timeout.as_secs(), "command timed out, killing process");
                let _ = child.kill();
                let _ = child.wait();
                Err(ToolError::Timeout {
                    program: program.to_string(),
                    seconds: timeout.as_secs(),
                })
            }
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
        debug!(program, ?args, cwd = %cwd.display(), "running command");
        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ToolError::Spawn {
                program: program.to_string(),
                source,
            })?;

        // Drain both pipes on background threads so a chatty child cannot
        // block on a full pipe buffer before it exits.
        let stdout_thread = child.stdout.take().map(drain);
        let stderr_thread = child.stderr.take().map(drain);

        let status = self.wait(program, &mut child)?;
        let stdout = collect(stdout_thread);
        let stderr = collect(stderr_thread);

        debug!(program, code = ?status.code(), %stdout, %stderr, "command finished");
        Ok(CommandOutput {
            code: status.code(),
            stdout,
            stderr,
        })
    }
}

fn drain<P: Read + Send + 'static>(mut pipe: P) -> JoinHandle<std::io::Result<Vec<u8>>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> String {
    let buf = match handle.map(JoinHandle::join) {
        Some(Ok(Ok(buf))) => buf,
        Some(Ok(Err(e))) => {
            debug!(error = %e, "failed to read command output");
            Vec::new()
        }
        _ => Vec::new(),
    };
    String::from_utf8_lossy(&buf).into_owned()
}
