//! LuaRocks adapter: linting rockspec files and loading their bytes.

use std::fs;
use std::path::Path;

use rockup_sync_core::RockspecPath;
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::runner::CommandRunner;

/// Runs `luarocks` against files in a working tree.
pub struct Luarocks<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    program: &'a str,
    workdir: &'a Path,
}

impl<'a, R: CommandRunner + ?Sized> Luarocks<'a, R> {
    pub fn new(runner: &'a R, program: &'a str, workdir: &'a Path) -> Self {
        Self {
            runner,
            program,
            workdir,
        }
    }

    /// Runs `luarocks lint` on `path`, resolved against the working tree.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Exit`] carrying the linter's diagnostics when the
    /// rockspec is invalid.
    pub fn lint(&self, path: &str) -> Result<()> {
        let absolute = self.workdir.join(path);
        let absolute = absolute.to_string_lossy();
        self.runner
            .run_checked(self.program, &["lint", &absolute], self.workdir)?;
        debug!(path, "rockspec passed lint");
        Ok(())
    }

    /// Lints the rockspec at `path` and returns its raw bytes.
    pub fn read_rockspec(&self, path: &RockspecPath) -> Result<Vec<u8>> {
        self.lint(&path.path)?;
        let absolute = self.workdir.join(&path.path);
        fs::read(&absolute).map_err(|source| ToolError::Io {
            path: absolute,
            source,
        })
    }
}
