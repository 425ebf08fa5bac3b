//! Regenerating the LuaRocks manifest and its per-version zip archives.

use std::fs;
use std::path::Path;

use rockup_sync_tools::{CommandRunner, ToolError};
use tracing::info;

use crate::error::{Context, Result};

/// Runs `luarocks-admin make_manifest` and zips each `manifest-<version>`.
pub struct ManifestBuilder<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    luarocks_admin: &'a str,
    zip: &'a str,
    workdir: &'a Path,
    lua_versions: &'a [String],
}

impl<'a, R: CommandRunner + ?Sized> ManifestBuilder<'a, R> {
    pub fn new(
        runner: &'a R,
        luarocks_admin: &'a str,
        zip: &'a str,
        workdir: &'a Path,
        lua_versions: &'a [String],
    ) -> Self {
        Self {
            runner,
            luarocks_admin,
            zip,
            workdir,
            lua_versions,
        }
    }

    /// Regenerates the manifest, then replaces every `manifest-<version>.zip`.
    ///
    /// Returns the archive names in version order.
    ///
    /// # Errors
    ///
    /// A failing archive step is prefixed with `Failed to create <zip>`.
    pub fn regenerate(&self) -> Result<Vec<String>> {
        self.runner
            .run_checked(self.luarocks_admin, &["make_manifest", "."], self.workdir)?;

        let mut archives = Vec::with_capacity(self.lua_versions.len());
        for version in self.lua_versions {
            let manifest = format!("manifest-{version}");
            let archive = format!("{manifest}.zip");
            self.archive(&manifest, &archive)
                .with_context(|| format!("Failed to create {archive}"))?;
            info!("Created {archive} from {manifest}");
            archives.push(archive);
        }
        Ok(archives)
    }

    fn archive(&self, manifest: &str, archive: &str) -> Result<()> {
        let stale = self.workdir.join(archive);
        if stale.exists() {
            fs::remove_file(&stale).map_err(|source| ToolError::Io {
                path: stale.clone(),
                source,
            })?;
        }
        self.runner
            .run_checked(self.zip, &[archive, manifest], self.workdir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rockup_sync_tools::{CommandOutput, ScriptedRunner};

    use super::*;

    fn versions() -> Vec<String> {
        vec!["5.1".into(), "5.4".into()]
    }

    #[test]
    fn test_regenerate_runs_make_manifest_then_zips() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new();
        let lua_versions = versions();
        let builder = ManifestBuilder::new(&runner, "luarocks-admin", "zip", dir.path(), &lua_versions);

        let archives = builder.regenerate().unwrap();

        assert_eq!(archives, vec!["manifest-5.1.zip", "manifest-5.4.zip"]);
        let lines: Vec<String> = runner.calls().iter().map(|call| call.command_line()).collect();
        assert_eq!(
            lines,
            vec![
                "luarocks-admin make_manifest .",
                "zip manifest-5.1.zip manifest-5.1",
                "zip manifest-5.4.zip manifest-5.4",
            ]
        );
    }

    #[test]
    fn test_stale_archive_is_removed_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("manifest-5.1.zip"), "stale").unwrap();
        let runner = ScriptedRunner::new();
        let lua_versions = versions();
        ManifestBuilder::new(&runner, "luarocks-admin", "zip", dir.path(), &lua_versions)
            .regenerate()
            .unwrap();
        // The fake zip writes nothing, so the stale file must be gone.
        assert!(!dir.path().join("manifest-5.1.zip").exists());
    }

    #[test]
    fn test_zip_failure_names_archive() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new().respond("zip", CommandOutput::failed(12, "nothing to do"));
        let lua_versions = versions();
        let err = ManifestBuilder::new(&runner, "luarocks-admin", "zip", dir.path(), &lua_versions)
            .regenerate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to create manifest-5.1.zip: zip exited with code 12\nstderr: nothing to do"
        );
        assert_eq!(runner.command_lines("zip").len(), 1);
    }

    #[test]
    fn test_make_manifest_failure_stops_before_zipping() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new().respond("luarocks-admin", CommandOutput::failed(1, "no rockspecs"));
        let lua_versions = versions();
        let result = ManifestBuilder::new(&runner, "luarocks-admin", "zip", dir.path(), &lua_versions).regenerate();
        assert!(result.is_err());
        assert!(runner.command_lines("zip").is_empty());
    }
}
