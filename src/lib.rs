//! # taglock
//!
//! Git-tag-based dependency resolution with a lockfile. A project lists its
//! dependencies in a manifest (`.taglock.yaml`), each a git URL plus an
//! optional semver constraint. taglock clones every dependency into the
//! project, checks out the newest tag satisfying the constraint, and pins
//! the resulting commit in a lockfile (`.taglock.lock`) so that later syncs
//! reproduce the exact same trees without re-resolving anything.
//!
//! This library backs the `taglock` command-line tool and can be embedded
//! directly.
//!
//! ## Quick Example
//!
//! ```
//! use taglock::version::{self, TagMap};
//!
//! let mut tags = TagMap::new();
//! tags.insert("v0.1.0".to_string(), "1111".to_string());
//! tags.insert("v0.2.0".to_string(), "2222".to_string());
//! tags.insert("nightly".to_string(), "3333".to_string());
//!
//! let (tag, hash) = version::get_latest(&tags, "^0.1").unwrap();
//! assert_eq!(tag, "v0.1.0");
//! assert_eq!(hash, "1111");
//! ```
//!
//! ## Core Concepts
//!
//! - **Paths (`path`)**: Resolves logical dependency paths inside the project
//!   directory and rejects anything that would escape it.
//! - **Versions (`version`)**: Filters, sorts and selects semantic-version
//!   tags against a constraint.
//! - **Repositories (`repository`, `git`)**: The `RepositoryAdapter` trait
//!   and its default implementation on top of the `git` executable.
//! - **Documents (`manifest`, `lock`, `store`)**: The manifest and lockfile
//!   formats and their atomic YAML persistence.
//! - **Engine (`engine`)**: `ResolutionEngine` ties the pieces together and
//!   implements `init`, `add`, `sync`, `update`, `remove` and `list`.
//!
//! ```no_run
//! use taglock::engine::ResolutionEngine;
//!
//! let engine = ResolutionEngine::new("/path/to/project");
//! engine.add("vendor/libfoo", "https://example.com/libfoo.git", "^1.2")?;
//! engine.sync()?;
//! # Ok::<(), taglock::error::Error>(())
//! ```

pub mod defaults;
pub mod engine;
pub mod error;
pub mod git;
pub mod lock;
pub mod manifest;
pub mod output;
pub mod path;
pub mod repository;
pub mod store;
pub mod suggestions;
pub mod version;

#[cfg(test)]
mod path_proptest;
#[cfg(test)]
mod version_proptest;
