//! # Project Manifest
//!
//! The manifest (`.taglock.yaml`) describes the project and the
//! dependencies it pulls in. A typical document looks like this:
//!
//! ```yaml
//! name: my-project
//! license: MIT
//! repository: https://github.com/example/my-project
//! meta:
//!   team: firmware
//! dependencies:
//! - path: vendor/libfoo
//!   url: https://github.com/example/libfoo
//!   version: ^1.2.0
//! ```
//!
//! Fields with empty values are omitted on write. Dependencies keep their
//! insertion order and are keyed by `path`; see [`Dependencies`].

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults::MANIFEST_FILENAME;
use crate::error::{Error, Result};
use crate::path;
use crate::store;

/// A git-based project dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Location of the dependency relative to the project base directory.
    /// Unique within a manifest.
    pub path: String,

    /// Git URL the dependency is cloned from.
    #[serde(rename = "url")]
    pub source_url: String,

    /// Semver range matched against the repository's tags. Empty means
    /// "latest, unconstrained".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
}

impl Dependency {
    pub fn new(
        path: impl Into<String>,
        source_url: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            source_url: source_url.into(),
            version: version.into(),
        }
    }
}

/// Ordered dependency list with keyed lookup.
///
/// The sequence keeps insertion order so documents are written
/// deterministically; the index maps each path to its position. Paths are
/// indexed in their normalized form (see [`path::normalize`]), so lookups
/// by `./vendor/lib` or `vendor/lib/` find `vendor/lib`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Dependency>", into = "Vec<Dependency>")]
pub struct Dependencies {
    entries: Vec<Dependency>,
    index: HashMap<String, usize>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(&path::key(path))
    }

    /// Looks up a dependency by path.
    pub fn get(&self, path: &str) -> Option<&Dependency> {
        self.index.get(&path::key(path)).map(|&i| &self.entries[i])
    }

    /// Appends a dependency, failing if its path is already taken.
    pub fn push(&mut self, dependency: Dependency) -> Result<()> {
        if self.contains(&dependency.path) {
            return Err(Error::DependencyExists {
                path: dependency.path,
            });
        }
        self.index
            .insert(path::key(&dependency.path), self.entries.len());
        self.entries.push(dependency);
        Ok(())
    }

    /// Replaces the dependency bound to `dependency.path` in place.
    pub fn set(&mut self, dependency: Dependency) -> Result<()> {
        match self.index.get(&path::key(&dependency.path)) {
            Some(&i) => {
                self.entries[i] = dependency;
                Ok(())
            }
            None => Err(Error::DependencyNotFound {
                path: dependency.path,
            }),
        }
    }

    /// Removes and returns the dependency bound to `path`, keeping the
    /// order of the others.
    pub fn remove(&mut self, path: &str) -> Option<Dependency> {
        let position = self.index.remove(&path::key(path))?;
        let removed = self.entries.remove(position);
        for i in self.index.values_mut() {
            if *i > position {
                *i -= 1;
            }
        }
        Some(removed)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dependency> {
        self.entries.iter()
    }
}

impl PartialEq for Dependencies {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Dependencies {}

impl<'a> IntoIterator for &'a Dependencies {
    type Item = &'a Dependency;
    type IntoIter = std::slice::Iter<'a, Dependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<Vec<Dependency>> for Dependencies {
    type Error = String;

    fn try_from(entries: Vec<Dependency>) -> std::result::Result<Self, Self::Error> {
        let mut dependencies = Dependencies::new();
        for dependency in entries {
            dependencies
                .push(dependency)
                .map_err(|e| format!("duplicate dependency entry: {}", e))?;
        }
        Ok(dependencies)
    }
}

impl From<Dependencies> for Vec<Dependency> {
    fn from(dependencies: Dependencies) -> Self {
        dependencies.entries
    }
}

/// The project manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// SPDX license identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub homepage: String,

    /// The project's own repository.
    #[serde(
        rename = "repository",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub source_url: String,

    /// Free-form key/value metadata, written sorted by key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Dependencies::is_empty")]
    pub dependencies: Dependencies,
}

/// Loads and saves the manifest of one project directory.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    /// Binds a store to the manifest inside `base_dir`.
    pub fn new(base_dir: &Path) -> Self {
        Self {
            path: base_dir.join(MANIFEST_FILENAME),
        }
    }

    /// Full path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the manifest; a missing file is [`Error::NotInitialized`].
    pub fn load(&self) -> Result<Manifest> {
        store::load_yaml(&self.path)?.ok_or_else(|| Error::NotInitialized {
            path: self.path.clone(),
        })
    }

    pub fn save(&self, manifest: &Manifest) -> Result<()> {
        store::save_yaml(&self.path, manifest)
    }
}
