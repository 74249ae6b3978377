//! # CLI Command Implementations
//!
//! Each subcommand of the `taglock` tool lives in its own file and exposes:
//! - an `Args` struct deriving `clap::Args`, and
//! - an `execute` function taking the parsed `Args` and the shared
//!   [`Context`].
//!
//! Commands are thin: they build a `ResolutionEngine` from the context, call
//! one operation and print the result. Library errors are passed through
//! [`taglock::suggestions::explain`] so the user gets a hint where one
//! exists.

pub mod add;
pub mod completions;
pub mod init;
pub mod list;
pub mod remove;
pub mod sync;
pub mod update;

use std::path::PathBuf;

use taglock::engine::ResolutionEngine;
use taglock::error::Error;
use taglock::output::OutputConfig;
use taglock::repository::GitCliAdapter;
use taglock::suggestions;

/// Settings shared by every command, taken from the global CLI options.
#[derive(Debug, Clone)]
pub struct Context {
    pub base_dir: PathBuf,
    pub git: String,
    pub out: OutputConfig,
}

impl Context {
    /// An engine bound to the project directory, driving the configured git.
    pub fn engine(&self) -> ResolutionEngine {
        ResolutionEngine::with_adapter(
            self.base_dir.clone(),
            Box::new(GitCliAdapter::new(self.git.clone())),
        )
    }
}

/// Converts an engine error into a CLI error with hints.
///
/// The manifest is re-read to offer path suggestions; if that fails too,
/// the error is explained without them.
pub fn explain(engine: &ResolutionEngine, error: Error) -> anyhow::Error {
    let known: Vec<String> = match &error {
        Error::DependencyNotFound { .. } => engine
            .manifest_store()
            .load()
            .map(|m| m.dependencies.iter().map(|d| d.path.clone()).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    suggestions::explain(error, &known)
}
