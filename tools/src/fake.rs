//! In-memory [`CommandRunner`] for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::runner::{CommandOutput, CommandRunner};

/// One recorded call to a [`ScriptedRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    /// Program and arguments joined by spaces, e.g. `git add rocks.db`.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A [`CommandRunner`] that answers from a script and records every call.
///
/// Responses are looked up by `(program, first argument)` first, then by
/// program alone. Unscripted programs are passed to the delegate runner
/// when one is set, and otherwise succeed with empty output.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use rockup_sync_tools::{CommandOutput, CommandRunner, ScriptedRunner};
///
/// let runner = ScriptedRunner::new().respond("luarocks", CommandOutput::failed(1, "bad rockspec"));
/// let output = runner.run("luarocks", &["lint", "x.rockspec"], Path::new(".")).unwrap();
/// assert_eq!(output.code, Some(1));
/// assert_eq!(runner.calls()[0].command_line(), "luarocks lint x.rockspec");
/// ```
#[derive(Default)]
pub struct ScriptedRunner {
    responses: HashMap<(String, Option<String>), CommandOutput>,
    delegate: Option<Box<dyn CommandRunner>>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends unscripted programs to `delegate` instead of succeeding silently.
    pub fn delegating(delegate: impl CommandRunner + 'static) -> Self {
        Self {
            delegate: Some(Box::new(delegate)),
            ..Self::default()
        }
    }

    /// Answers every call to `program` with `output`.
    pub fn respond(mut self, program: &str, output: CommandOutput) -> Self {
        self.responses.insert((program.to_string(), None), output);
        self
    }

    /// Answers calls to `program` whose first argument is `subcommand`.
    pub fn respond_to(mut self, program: &str, subcommand: &str, output: CommandOutput) -> Self {
        self.responses
            .insert((program.to_string(), Some(subcommand.to_string())), output);
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Command lines of the calls made to `program`.
    pub fn command_lines(&self, program: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.program == program)
            .map(Invocation::command_line)
            .collect()
    }

    fn scripted(&self, program: &str, args: &[&str]) -> Option<&CommandOutput> {
        let subcommand = args.first().map(|arg| arg.to_string());
        self.responses
            .get(&(program.to_string(), subcommand))
            .or_else(|| self.responses.get(&(program.to_string(), None)))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(Invocation {
            program: program.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
            cwd: cwd.to_path_buf(),
        });

        if let Some(output) = self.scripted(program, args) {
            return Ok(output.clone());
        }
        match &self.delegate {
            Some(delegate) => delegate.run(program, args, cwd),
            None => Ok(CommandOutput::ok("")),
        }
    }
}
