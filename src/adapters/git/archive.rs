//! `git archive` invocation

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::models::ArchiveFormat;
use crate::core::ports::VcsError;

/// Write `<out_dir>/<slug>.<ext>` from the tree at `rev`
///
/// Runs in `workdir`; the output path is made absolute first so a relative
/// `out_dir` is resolved against the process directory, not the repository.
pub fn create(
    workdir: &Path,
    slug: &str,
    rev: &str,
    format: ArchiveFormat,
    out_dir: &Path,
) -> Result<PathBuf, VcsError> {
    let ext = format.extension();
    let out = std::path::absolute(out_dir.join(format!("{slug}.{ext}")))
        .map_err(|e| VcsError::backend("resolve archive path", e))?;

    let mut cmd = Command::new("git");
    cmd.current_dir(workdir)
        .arg("archive")
        .arg(format!("--format={ext}"))
        .arg("-o")
        .arg(&out)
        .arg(format!("--prefix={slug}/"))
        .arg(rev);
    let command = format!("git archive --format={ext} {rev}");
    log::debug!("running {command} -> {}", out.display());

    let output = cmd.output().map_err(|source| VcsError::Spawn {
        command: command.clone(),
        source,
    })?;

    if !output.status.success() {
        return Err(VcsError::Command {
            command,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(out)
}
