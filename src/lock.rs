//! # Lockfile
//!
//! The lockfile (`.taglock.lock`) is a flat YAML mapping from dependency
//! path to the commit hash that path is pinned at:
//!
//! ```yaml
//! vendor/libfoo: 2075d8e0a26e6104b212428186bec59edad15e42
//! ```
//!
//! `sync` reproduces exactly these hashes; only `add` and `update` change
//! them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::defaults::LOCK_FILENAME;
use crate::error::Result;
use crate::path;
use crate::store;

/// Dependency path to resolved commit hash.
///
/// Paths are stored in normalized form, the same key the manifest uses, and
/// every accessor normalizes its argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct Lockfile {
    entries: BTreeMap<String, String>,
}

impl Lockfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// The locked hash for `path`, if any.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(&path::key(path)).map(String::as_str)
    }

    /// Pins `path` to `hash`, returning the previous hash.
    pub fn set(&mut self, path: &str, hash: impl Into<String>) -> Option<String> {
        self.entries.insert(path::key(path), hash.into())
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.entries.remove(&path::key(path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, h)| (p.as_str(), h.as_str()))
    }
}

impl TryFrom<BTreeMap<String, String>> for Lockfile {
    type Error = String;

    fn try_from(raw: BTreeMap<String, String>) -> std::result::Result<Self, Self::Error> {
        let mut lock = Lockfile::new();
        for (path, hash) in raw {
            if lock.set(&path, hash).is_some() {
                return Err(format!("duplicate lock entry for path '{}'", path));
            }
        }
        Ok(lock)
    }
}

impl From<Lockfile> for BTreeMap<String, String> {
    fn from(lock: Lockfile) -> Self {
        lock.entries
    }
}

/// Loads and saves the lockfile of one project directory.
#[derive(Debug, Clone)]
pub struct LockStore {
    path: PathBuf,
}

impl LockStore {
    /// Binds a store to the lockfile inside `base_dir`.
    pub fn new(base_dir: &Path) -> Self {
        Self {
            path: base_dir.join(LOCK_FILENAME),
        }
    }

    /// Full path of the lockfile.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the lockfile. A missing file reads as an empty lock, which
    /// makes `sync` report the first unlocked dependency.
    pub fn load(&self) -> Result<Lockfile> {
        match store::load_yaml(&self.path)? {
            Some(lock) => Ok(lock),
            None => {
                debug!("No lockfile at {}, starting empty", self.path.display());
                Ok(Lockfile::new())
            }
        }
    }

    pub fn save(&self, lock: &Lockfile) -> Result<()> {
        store::save_yaml(&self.path, lock)
    }
}
