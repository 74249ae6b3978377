//! # Error Handling
//!
//! This module defines the centralized error type for `taglock`. It uses the
//! `thiserror` library to build a single `Error` enum covering every failure
//! the resolution engine can report, each with enough context (the offending
//! path, constraint, or file) to act on it.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants fall into three groups:
//!   - input validation (`InvalidInput`, `InvalidPath`, `InvalidConstraint`),
//!   - project state (`AlreadyExists`, `NotInitialized`, `MissingLockHash`,
//!     `DependencyNotFound`, `DependencyExists`),
//!   - external failures (`Adapter`, `ManifestParse`, `Persistence`, `Io`).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Engine operations return the first error they hit. Nothing is rolled
//! back, so an error from the middle of `sync` or `update` means earlier
//! dependencies may already have been moved.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for taglock operations
#[derive(Error, Debug)]
pub enum Error {
    /// `init` was called on a directory that already holds a manifest.
    #[error("Project already initialized: {path} exists")]
    AlreadyExists { path: PathBuf },

    /// An operation needing a manifest was called before `init`.
    #[error("No project manifest found at {path}")]
    NotInitialized { path: PathBuf },

    /// A required field was empty.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A logical dependency path would resolve outside the base directory.
    #[error("Invalid path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// A version constraint could not be parsed as a semver range.
    #[error("Invalid version constraint '{constraint}': {message}")]
    InvalidConstraint { constraint: String, message: String },

    /// A manifest dependency has no entry in the lockfile.
    #[error("Missing lock hash for dependency '{path}'")]
    MissingLockHash { path: String },

    /// No dependency is bound to the given path.
    #[error("No dependency bound to path '{path}'")]
    DependencyNotFound { path: String },

    /// A dependency is already bound to the given path.
    #[error("A dependency is already bound to path '{path}'")]
    DependencyExists { path: String },

    /// A repository adapter call (clone, open, fetch, tag listing, checkout)
    /// failed. The backend's message is carried verbatim.
    #[error("Repository {operation} failed for {path}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Adapter {
        operation: String,
        path: String,
        message: String,
        /// Optional hint for how to resolve the failure
        hint: Option<String>,
    },

    /// A manifest or lock document could not be read or decoded.
    #[error("Failed to parse {file}: {message}")]
    ManifestParse { file: PathBuf, message: String },

    /// A manifest or lock document could not be serialized or written.
    #[error("Failed to write {file}: {message}")]
    Persistence { file: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds an `Adapter` error without a hint.
    pub fn adapter(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Adapter {
            operation: operation.into(),
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
