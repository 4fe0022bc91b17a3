//! Git integration adapter
//!
//! Implements [`ReleaseVcs`] with `git2` for tags and pushes, and the `git`
//! CLI for archives (libgit2 has no archive support).
//!
//! - [`archive`] - `git archive` invocation

pub mod archive;

use std::cell::Cell;
use std::fmt;
use std::path::{Path, PathBuf};

use git2::{Cred, ErrorCode, PushOptions, RemoteCallbacks, Repository};

use crate::core::models::ArchiveFormat;
use crate::core::ports::{ReleaseVcs, VcsError};

/// Remote that tags are pushed to
pub const REMOTE: &str = "origin";

/// Username sent with the token; the forge only checks the password
const TOKEN_USERNAME: &str = "ignored";

/// Git-backed version control gateway
pub struct GitRepository {
    repo: Repository,
    workdir: PathBuf,
}

impl fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitRepository")
            .field("workdir", &self.workdir)
            .finish_non_exhaustive()
    }
}

impl GitRepository {
    /// Open an existing repository at `path`
    pub fn open(path: &Path) -> Result<Self, VcsError> {
        let repo = Repository::open(path).map_err(|e| VcsError::Open {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        let workdir = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        log::debug!("opened git repository at {}", workdir.display());
        Ok(Self { repo, workdir })
    }

    /// Working directory of the repository
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn tag_refspecs(&self) -> Result<Vec<String>, VcsError> {
        let names = self
            .repo
            .tag_names(None)
            .map_err(|e| VcsError::backend("list tags", e.message()))?;
        Ok(names
            .iter()
            .flatten()
            .map(|tag| format!("refs/tags/{tag}:refs/tags/{tag}"))
            .collect())
    }
}

impl ReleaseVcs for GitRepository {
    fn tag_exists(&self, tag: &str) -> Result<bool, VcsError> {
        match self.repo.find_reference(&format!("refs/tags/{tag}")) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(VcsError::backend(format!("look up tag '{tag}'"), e.message())),
        }
    }

    fn tag_head(&self, tag: &str, message: &str) -> Result<(), VcsError> {
        let head = self
            .repo
            .head()
            .map_err(|e| VcsError::backend("repo.head()", e.message()))?;
        let commit = head
            .peel_to_commit()
            .map_err(|e| VcsError::backend("resolve HEAD commit", e.message()))?;
        let tagger = commit.committer();

        let oid = self
            .repo
            .tag(tag, commit.as_object(), &tagger, message, false)
            .map_err(|e| VcsError::backend(format!("create tag '{tag}'"), e.message()))?;
        log::debug!("created tag {tag} ({oid}) at {}", commit.id());
        Ok(())
    }

    fn create_archive(
        &self,
        slug: &str,
        rev: &str,
        format: ArchiveFormat,
        out_dir: &Path,
    ) -> Result<PathBuf, VcsError> {
        archive::create(&self.workdir, slug, rev, format, out_dir)
    }

    fn push_tags(&self, token: &str) -> Result<(), VcsError> {
        let refspecs = self.tag_refspecs()?;
        if refspecs.is_empty() {
            log::debug!("no tags to push");
            return Ok(());
        }

        let mut remote = self
            .repo
            .find_remote(REMOTE)
            .map_err(|e| VcsError::backend(format!("find remote '{REMOTE}'"), e.message()))?;

        let attempts = Cell::new(0_u32);
        let mut rejected = Vec::new();
        {
            let mut callbacks = RemoteCallbacks::new();
            callbacks.credentials(|_url, _username, _allowed| {
                attempts.set(attempts.get() + 1);
                if attempts.get() > 1 {
                    return Err(git2::Error::from_str("token was rejected"));
                }
                Cred::userpass_plaintext(TOKEN_USERNAME, token)
            });
            callbacks.push_transfer_progress(|current, total, bytes| {
                log::debug!("pushed {current}/{total} objects ({bytes} bytes)");
            });
            callbacks.push_update_reference(|refname, status| {
                if let Some(message) = status {
                    rejected.push((refname.to_string(), message.to_string()));
                }
                Ok(())
            });

            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);
            remote
                .push(&refspecs, Some(&mut options))
                .map_err(|e| VcsError::backend("failed repo.Push()", e.message()))?;
        }

        if let Some((refname, message)) = rejected.into_iter().next() {
            return Err(VcsError::Rejected { refname, message });
        }
        Ok(())
    }
}
