//! Meson introspection through the `meson` CLI

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde::Deserialize;

use crate::core::ports::{PackagingTool, ToolError};

/// Subset of `meson introspect --projectinfo`
#[derive(Debug, Clone, Deserialize)]
struct ProjectInfo {
    version: String,
    #[serde(default)]
    descriptive_name: String,
}

/// Runs `meson setup` and `meson introspect` to read the project version
///
/// Each call configures a fresh build directory under the system temp dir,
/// removed again whether or not introspection succeeds.
#[derive(Debug, Clone)]
pub struct MesonCli {
    program: PathBuf,
}

impl Default for MesonCli {
    fn default() -> Self {
        Self::new("meson")
    }
}

impl MesonCli {
    /// Use `program` as the meson executable
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&OsStr]) -> Result<Option<Output>, ToolError> {
        let command = self.describe(args);
        log::debug!("running {command}");

        let output = match Command::new(&self.program).args(args).output() {
            Ok(output) => output,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ToolError::Io { command, source }),
        };

        if !output.status.success() {
            return Err(ToolError::Failed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(Some(output))
    }

    /// Run meson, mapping "cannot run it here" to `None`
    ///
    /// A missing executable, or one that exits non-zero because its own
    /// dependencies (ninja, a compiler) are missing, means the check is skipped.
    fn run_if_available(&self, args: &[&OsStr]) -> Result<Option<Output>, ToolError> {
        match self.run(args) {
            Ok(None) => {
                log::debug!("{} is not installed", self.program.display());
                Ok(None)
            },
            Err(e @ (ToolError::Failed { .. } | ToolError::Io { .. })) => {
                log::warn!("meson is unusable here: {e}");
                Ok(None)
            },
            other => other,
        }
    }

    fn describe(&self, args: &[&OsStr]) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

impl PackagingTool for MesonCli {
    fn declared_version(&self, source_dir: &Path) -> Result<Option<String>, ToolError> {
        let build_dir = tempfile::Builder::new()
            .prefix("release-builder-meson-")
            .tempdir()
            .map_err(|source| ToolError::Io {
                command: "create a meson build directory".to_string(),
                source,
            })?;
        let build = build_dir.path().as_os_str();

        let setup = [OsStr::new("setup"), build, source_dir.as_os_str()];
        if self.run_if_available(&setup)?.is_none() {
            return Ok(None);
        }

        let introspect = [OsStr::new("introspect"), build, OsStr::new("--projectinfo")];
        let Some(output) = self.run_if_available(&introspect)? else {
            return Ok(None);
        };

        let info: ProjectInfo =
            serde_json::from_slice(&output.stdout).map_err(|e| ToolError::BadOutput {
                command: self.describe(&introspect),
                message: e.to_string(),
            })?;
        log::debug!("meson project '{}' declares {}", info.descriptive_name, info.version);
        Ok(Some(info.version))
    }
}
