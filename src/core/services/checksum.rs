//! SHA-256 checksums for release artifacts
//!
//! The manifest uses the `sha256sum` layout: `<hex digest>  <file name>` per
//! line, so `sha256sum -c` can verify a downloaded release.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::error::{ReleaseError, Result};

/// Stream a file through SHA-256
pub fn hash(path: &Path) -> Result<[u8; 32]> {
    let mut file = File::open(path).map_err(|e| ReleaseError::io("open file", path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .map_err(|e| ReleaseError::io("perform SHA256 against file", path, e))?;
    Ok(hasher.finalize().into())
}

/// Lowercase hex digest of a file
pub fn hash_hex(path: &Path) -> Result<String> {
    hash(path).map(hex::encode)
}

/// Hash every file directly inside `dir` into `dir/<manifest_name>`
///
/// The manifest itself is skipped so a re-run never hashes its own previous
/// output. Entries are sorted by file name. All digests are computed before
/// the manifest is created; an existing manifest is overwritten.
pub fn write_manifest(dir: &Path, manifest_name: &str) -> Result<PathBuf> {
    let mut lines = String::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            ReleaseError::io("read directory", path, e.into())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name == manifest_name {
            continue;
        }

        let digest = hash_hex(entry.path())?;
        lines.push_str(&format!("{digest}  {name}\n"));
    }

    let manifest = dir.join(manifest_name);
    std::fs::write(&manifest, lines).map_err(|e| ReleaseError::io("write to file", &manifest, e))?;
    Ok(manifest)
}
