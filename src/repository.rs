//! # Repository Adapter
//!
//! This module defines the seam between the resolution engine and the
//! version-control backend. The engine never calls git directly; it only
//! uses the [`RepositoryAdapter`] capability set:
//!
//! - **`exists`**: is there a repository at this path?
//! - **`clone_repo`**: materialize a repository from a URL.
//! - **`open`**: verify an existing repository is usable.
//! - **`fetch`**: refresh refs and tags from the remote.
//! - **`list_tags`**: tag name to commit hash.
//! - **`checkout_hash`**: move the working tree to a commit.
//!
//! Keeping this a trait allows the engine's logic (tag resolution, lock
//! consistency) to be tested against in-memory fakes. In the application,
//! [`GitCliAdapter`] wraps the system `git` command.
//!
//! All calls block. There is no timeout and no retry; a failure is returned
//! to the caller as-is.

use std::path::Path;

use crate::error::Result;
use crate::git;
use crate::version::TagMap;

/// Capabilities the engine needs from a version-control backend.
pub trait RepositoryAdapter {
    /// Checks whether a repository is materialized at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Clones `url` into `path`.
    fn clone_repo(&self, path: &Path, url: &str) -> Result<()>;

    /// Opens the repository at `path`, failing if it is unusable.
    fn open(&self, path: &Path) -> Result<()>;

    /// Fetches new refs and tags. Having nothing to fetch is success.
    fn fetch(&self, path: &Path) -> Result<()>;

    /// Lists tag names with the commit hash each one points at.
    fn list_tags(&self, path: &Path) -> Result<TagMap>;

    /// Checks out `hash` in the working tree at `path`.
    fn checkout_hash(&self, path: &Path, hash: &str) -> Result<()>;

    /// Makes the repository's remote point at `url`.
    ///
    /// Called after opening an existing clone so that a URL change in the
    /// manifest takes effect. Backends without remotes can ignore it.
    fn set_remote(&self, _path: &Path, _url: &str) -> Result<()> {
        Ok(())
    }
}

/// The default adapter, which shells out to a `git` executable.
#[derive(Debug, Clone)]
pub struct GitCliAdapter {
    program: String,
}

impl GitCliAdapter {
    /// Creates an adapter that runs `program` (usually `"git"`).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitCliAdapter {
    fn default() -> Self {
        Self::new(crate::defaults::DEFAULT_GIT_PROGRAM)
    }
}

impl RepositoryAdapter for GitCliAdapter {
    fn exists(&self, path: &Path) -> bool {
        git::is_repository(&self.program, path)
    }

    fn clone_repo(&self, path: &Path, url: &str) -> Result<()> {
        git::clone(&self.program, url, path)
    }

    fn open(&self, path: &Path) -> Result<()> {
        git::open(&self.program, path)
    }

    fn fetch(&self, path: &Path) -> Result<()> {
        git::fetch(&self.program, path)
    }

    fn list_tags(&self, path: &Path) -> Result<TagMap> {
        git::list_tags(&self.program, path)
    }

    fn checkout_hash(&self, path: &Path, hash: &str) -> Result<()> {
        // No matching tag: stay on whatever the clone checked out
        if hash.is_empty() {
            return Ok(());
        }
        git::checkout(&self.program, path, hash)
    }

    fn set_remote(&self, path: &Path, url: &str) -> Result<()> {
        match git::remote_url(&self.program, path)? {
            Some(current) if current == url => Ok(()),
            current => {
                log::warn!(
                    "Remote of {} is {}, re-pointing to {}",
                    path.display(),
                    current.as_deref().unwrap_or("<none>"),
                    url
                );
                git::set_remote_url(&self.program, path, url)
            }
        }
    }
}
