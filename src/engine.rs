//! # Resolution Engine
//!
//! The engine keeps a project's manifest, lockfile and dependency working
//! trees consistent. Each dependency moves through three states:
//!
//! ```text
//! Absent --clone--> Cloned --checkout(hash)--> SyncedAt(hash)
//! ```
//!
//! ## Operations
//!
//! - **`init`**: write an empty manifest (with project metadata) and lock.
//! - **`add`**: clone a dependency, pick the latest tag matching its
//!   constraint, check it out, and record it in manifest and lock.
//! - **`sync`**: reproduce the locked hashes. Constraints and tags are never
//!   consulted, so remote tag changes cannot move a synced tree.
//! - **`update`**: re-resolve every constraint against the current tags and
//!   move the lock forward.
//! - **`remove`**: delete a dependency's working tree and forget it.
//! - **`list`**: report dependencies with their locked hashes.
//!
//! Dependencies are processed one at a time, in manifest order, and the
//! first error aborts the call. Nothing is rolled back. `update` writes the
//! lock after every dependency, so the lock on disk always matches the trees
//! that were already moved when a later dependency fails.
//!
//! The engine holds no process-wide state. Two engines bound to different
//! base directories are fully independent; two bound to the same directory
//! must not run at the same time.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::lock::{LockStore, Lockfile};
use crate::manifest::{Dependency, Manifest, ManifestStore};
use crate::path;
use crate::repository::{GitCliAdapter, RepositoryAdapter};
use crate::version::{self, Constraint};

/// Project metadata supplied to [`ResolutionEngine::init`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSeed {
    pub name: String,
    pub license: String,
    pub homepage: String,
    pub source_url: String,
    pub meta: BTreeMap<String, String>,
}

/// Outcome of resolving or syncing one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
    pub path: String,
    /// Tag that was selected. Empty for `sync`, which works from hashes
    /// only, and when no tag matched.
    pub tag: String,
    /// Commit the working tree is now at. Empty when no tag matched and the
    /// tree was left at the repository's default ref.
    pub hash: String,
    /// Hash the lock held before this operation.
    pub previous: Option<String>,
}

impl DependencyReport {
    /// Whether the locked hash moved.
    pub fn changed(&self) -> bool {
        self.previous.as_deref() != Some(self.hash.as_str())
    }
}

/// A dependency as seen by `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyStatus {
    #[serde(flatten)]
    pub dependency: Dependency,
    /// Hash recorded in the lockfile, if any.
    pub locked: Option<String>,
    /// Whether a working tree exists at the dependency's path.
    pub present: bool,
}

/// Orchestrates manifest, lockfile and repository adapter for one project.
pub struct ResolutionEngine {
    base_dir: PathBuf,
    manifests: ManifestStore,
    locks: LockStore,
    repos: Box<dyn RepositoryAdapter>,
}

impl ResolutionEngine {
    /// Creates an engine for `base_dir` backed by the system `git`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_adapter(base_dir, Box::new(GitCliAdapter::default()))
    }

    /// Creates an engine with a custom repository adapter.
    pub fn with_adapter(base_dir: impl Into<PathBuf>, repos: Box<dyn RepositoryAdapter>) -> Self {
        let base_dir = base_dir.into();
        Self {
            manifests: ManifestStore::new(&base_dir),
            locks: LockStore::new(&base_dir),
            base_dir,
            repos,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn manifest_store(&self) -> &ManifestStore {
        &self.manifests
    }

    pub fn lock_store(&self) -> &LockStore {
        &self.locks
    }

    /// Creates the manifest and an empty lockfile.
    pub fn init(&self, seed: &ProjectSeed) -> Result<()> {
        if self.manifests.exists() {
            return Err(Error::AlreadyExists {
                path: self.manifests.path().to_path_buf(),
            });
        }

        if seed.name.trim().is_empty() || seed.source_url.trim().is_empty() {
            return Err(Error::InvalidInput {
                message: "project name and repository are required".to_string(),
            });
        }

        let manifest = Manifest {
            name: seed.name.clone(),
            license: seed.license.clone(),
            homepage: seed.homepage.clone(),
            source_url: seed.source_url.clone(),
            meta: seed.meta.clone(),
            ..Default::default()
        };

        self.manifests.save(&manifest)?;
        self.locks.save(&Lockfile::new())?;

        info!(
            "Initialised project '{}' in {}",
            seed.name,
            self.base_dir.display()
        );
        Ok(())
    }

    /// Adds a dependency at `dep_path` cloned from `url`.
    ///
    /// An empty `constraint` selects the latest version tag, and the tag
    /// name is stored as the dependency's constraint so the manifest records
    /// what was chosen. The path is recorded in normalized form. A path that
    /// is already a dependency, under any spelling, is rejected with
    /// [`Error::DependencyExists`].
    pub fn add(&self, dep_path: &str, url: &str, constraint: &str) -> Result<DependencyReport> {
        if dep_path.trim().is_empty() || url.trim().is_empty() {
            return Err(Error::InvalidInput {
                message: "dependency path and url cannot be empty".to_string(),
            });
        }

        let key = path::normalize(dep_path)?;
        let full_path = path::resolve(&self.base_dir, &key)?;
        let constraint = constraint.trim();
        if !constraint.is_empty() {
            Constraint::parse(constraint)?;
        }

        let mut manifest = self.manifests.load()?;
        let mut lock = self.locks.load()?;
        if manifest.dependencies.contains(&key) {
            return Err(Error::DependencyExists { path: key });
        }

        debug!(
            "Adding '{}' from {} at '{}'",
            key,
            url,
            if constraint.is_empty() { "latest" } else { constraint }
        );

        if self.repos.exists(&full_path) {
            debug!("Add ({}) already present, opening", key);
            self.repos.open(&full_path)?;
            self.repos.set_remote(&full_path, url)?;
        } else {
            debug!("Add ({}) cloning", key);
            self.repos.clone_repo(&full_path, url)?;
        }

        let (tag, hash) = self.resolve_latest(&key, &full_path, constraint)?;
        self.repos.checkout_hash(&full_path, &hash)?;

        let stored_constraint = if constraint.is_empty() {
            tag.clone()
        } else {
            constraint.to_string()
        };

        manifest
            .dependencies
            .push(Dependency::new(key.as_str(), url, stored_constraint))?;
        self.manifests.save(&manifest)?;

        let previous = lock.set(&key, hash.clone());
        self.locks.save(&lock)?;

        info!("Added '{}' at {} ({})", key, display_tag(&tag), hash);
        Ok(DependencyReport {
            path: key,
            tag,
            hash,
            previous,
        })
    }

    /// Checks every dependency out at its locked hash.
    pub fn sync(&self) -> Result<Vec<DependencyReport>> {
        let manifest = self.manifests.load()?;
        let lock = self.locks.load()?;
        let mut reports = Vec::with_capacity(manifest.dependencies.len());

        for dependency in &manifest.dependencies {
            let full_path = path::resolve(&self.base_dir, &dependency.path)?;
            self.materialize(dependency, &full_path)?;

            let hash = match lock.get(&dependency.path) {
                Some(hash) => hash.to_string(),
                None => {
                    warn!(
                        "Sync ({}) has no locked hash, run update first",
                        dependency.path
                    );
                    return Err(Error::MissingLockHash {
                        path: dependency.path.clone(),
                    });
                }
            };

            debug!("Sync ({}) checking out '{}'", dependency.path, hash);
            self.repos.checkout_hash(&full_path, &hash)?;

            reports.push(DependencyReport {
                path: dependency.path.clone(),
                tag: String::new(),
                previous: Some(hash.clone()),
                hash,
            });
        }

        info!("Synced {} dependencies", reports.len());
        Ok(reports)
    }

    /// Re-resolves every dependency's constraint and moves the lock forward.
    ///
    /// The lock is written after each dependency. If a later dependency
    /// fails, the earlier ones stay updated both on disk and in the lock.
    pub fn update(&self) -> Result<Vec<DependencyReport>> {
        let manifest = self.manifests.load()?;
        let mut lock = self.locks.load()?;
        let mut reports = Vec::with_capacity(manifest.dependencies.len());

        for dependency in &manifest.dependencies {
            let full_path = path::resolve(&self.base_dir, &dependency.path)?;
            self.materialize(dependency, &full_path)?;

            let (tag, hash) =
                self.resolve_latest(&dependency.path, &full_path, &dependency.version)?;
            self.repos.checkout_hash(&full_path, &hash)?;

            let previous = lock.set(&dependency.path, hash.clone());
            self.locks.save(&lock)?;

            let report = DependencyReport {
                path: dependency.path.clone(),
                tag,
                hash,
                previous,
            };
            if report.changed() {
                info!(
                    "Updated '{}' to {} ({})",
                    report.path,
                    display_tag(&report.tag),
                    report.hash
                );
            }
            reports.push(report);
        }

        Ok(reports)
    }

    /// Deletes a dependency's working tree and drops it from manifest and
    /// lock. `dep_path` may be any spelling of the dependency's path.
    ///
    /// A failed deletion aborts before either document is written.
    pub fn remove(&self, dep_path: &str) -> Result<Dependency> {
        let mut manifest = self.manifests.load()?;
        if !manifest.dependencies.contains(dep_path) {
            return Err(Error::DependencyNotFound {
                path: dep_path.to_string(),
            });
        }

        let full_path = path::resolve(&self.base_dir, dep_path)?;
        if self.repos.exists(&full_path) {
            debug!("Remove ({}) deleting {}", dep_path, full_path.display());
            fs::remove_dir_all(&full_path)?;
        }

        let removed = manifest
            .dependencies
            .remove(dep_path)
            .ok_or_else(|| Error::DependencyNotFound {
                path: dep_path.to_string(),
            })?;
        self.manifests.save(&manifest)?;

        let mut lock = self.locks.load()?;
        lock.remove(dep_path);
        self.locks.save(&lock)?;

        info!("Removed '{}'", dep_path);
        Ok(removed)
    }

    /// Reports every dependency with its locked hash.
    ///
    /// Lock entries with no matching dependency are logged and skipped.
    pub fn list(&self) -> Result<Vec<DependencyStatus>> {
        let manifest = self.manifests.load()?;
        let lock = self.locks.load()?;
        debug!(
            "{} dependencies, {} lock entries",
            manifest.dependencies.len(),
            lock.len()
        );

        for (locked_path, hash) in lock.iter() {
            if !manifest.dependencies.contains(locked_path) {
                warn!(
                    "Lock entry '{}' ({}) has no dependency in the manifest",
                    locked_path, hash
                );
            }
        }

        manifest
            .dependencies
            .iter()
            .map(|dependency| {
                let full_path = path::resolve(&self.base_dir, &dependency.path)?;
                Ok(DependencyStatus {
                    locked: lock.get(&dependency.path).map(str::to_string),
                    present: self.repos.exists(&full_path),
                    dependency: dependency.clone(),
                })
            })
            .collect()
    }

    /// Clones a missing dependency, or refreshes an existing clone.
    fn materialize(&self, dependency: &Dependency, full_path: &Path) -> Result<()> {
        if self.repos.exists(full_path) {
            debug!("({}) opening", dependency.path);
            self.repos.open(full_path)?;
            self.repos.set_remote(full_path, &dependency.source_url)?;
            debug!("({}) fetching", dependency.path);
            self.repos.fetch(full_path)
        } else {
            debug!("({}) not found, cloning", dependency.path);
            self.repos.clone_repo(full_path, &dependency.source_url)
        }
    }

    fn resolve_latest(
        &self,
        dep_path: &str,
        full_path: &Path,
        constraint: &str,
    ) -> Result<(String, String)> {
        let tags = self.repos.list_tags(full_path)?;
        debug!("({}) {} tags available", dep_path, tags.len());

        let (tag, hash) = version::get_latest(&tags, constraint)?;
        if tag.is_empty() {
            warn!(
                "({}) no tag matches '{}', leaving the default ref checked out",
                dep_path, constraint
            );
        } else {
            debug!("({}) latest matching tag: {} hash: {}", dep_path, tag, hash);
        }
        Ok((tag, hash))
    }
}

fn display_tag(tag: &str) -> &str {
    if tag.is_empty() {
        "default ref"
    } else {
        tag
    }
}
