//! Shared test utilities for the CLI end-to-end tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     require_git!();
//!     let upstream = UpstreamRepo::new().with_tags(&["v0.1.0", "v0.2.0"]);
//!     let fixture = TestFixture::new().initialized();
//!     fixture.command().args(["add", "vendor/lib", &upstream.url()]).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::documents;
    #[allow(unused_imports)]
    pub use super::{git_available, head_of, TestFixture, UpstreamRepo};
    #[allow(unused_imports)]
    pub use crate::require_git;
}

/// Manifest and lockfile snippets for tests that do not need git.
#[allow(dead_code)]
pub mod documents {
    /// A manifest with no dependencies.
    pub const EMPTY_MANIFEST: &str = r#"name: demo
repository: https://example.com/demo
"#;

    /// A manifest with two dependencies that have never been cloned.
    pub const TWO_DEPS_MANIFEST: &str = r#"name: demo
repository: https://example.com/demo
dependencies:
- path: vendor/libfoo
  url: https://example.com/libfoo.git
  version: ^1.2.0
- path: vendor/libbar
  url: https://example.com/libbar.git
"#;

    /// A lock pinning only the first of [`TWO_DEPS_MANIFEST`]'s dependencies.
    pub const PARTIAL_LOCK: &str =
        "vendor/libfoo: 5a83540f87665410bb6440b97f6c2f71a27471bd\n";

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "name: [unclosed";
}

/// Returns `true` if a `git` executable can be run.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Returns early from a test when `git` is not installed.
#[macro_export]
macro_rules! require_git {
    () => {
        if !$crate::common::git_available() {
            eprintln!("Skipping test: git is not available");
            return;
        }
    };
}

/// Runs git in `dir` with a throwaway identity, panicking on failure.
fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args([
            "-c",
            "user.name=taglock tests",
            "-c",
            "user.email=tests@taglock.invalid",
            "-c",
            "commit.gpgsign=false",
            "-c",
            "tag.gpgsign=false",
        ])
        .args(args)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// The commit checked out in the repository at `dir`.
pub fn head_of(dir: &Path) -> String {
    git(dir, &["rev-parse", "HEAD"])
}

/// A local git repository standing in for a dependency's remote.
pub struct UpstreamRepo {
    dir: assert_fs::TempDir,
}

impl UpstreamRepo {
    /// Create an empty repository with one initial commit.
    pub fn new() -> Self {
        let dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        git(dir.path(), &["init", "--quiet"]);
        let repo = Self { dir };
        repo.commit_with_message("initial");
        repo
    }

    /// Add a commit and tag it with each of `tags` in turn.
    pub fn with_tags(self, tags: &[&str]) -> Self {
        for tag in tags {
            self.tag(tag);
        }
        self
    }

    /// Commit a change and tag it (annotated), returning the commit hash.
    pub fn tag(&self, tag: &str) -> String {
        let hash = self.commit_with_message(&format!("release {tag}"));
        git(self.dir.path(), &["tag", "-a", tag, "-m", tag]);
        hash
    }

    /// Commit a change and give it a lightweight tag.
    #[allow(dead_code)]
    pub fn lightweight_tag(&self, tag: &str) -> String {
        let hash = self.commit_with_message(&format!("snapshot {tag}"));
        git(self.dir.path(), &["tag", tag]);
        hash
    }

    /// The commit a tag points at.
    pub fn hash_of(&self, tag: &str) -> String {
        git(self.dir.path(), &["rev-parse", &format!("{tag}^{{commit}}")])
    }

    /// URL to clone this repository from.
    pub fn url(&self) -> String {
        self.dir.path().display().to_string()
    }

    fn commit_with_message(&self, message: &str) -> String {
        // Every commit changes COUNTER so that no two tags share a commit
        let counter = self.dir.child("COUNTER");
        let count = std::fs::read_to_string(counter.path())
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(0);
        counter
            .write_str(&(count + 1).to_string())
            .expect("Failed to write file");
        git(self.dir.path(), &["add", "COUNTER"]);
        git(self.dir.path(), &["commit", "--quiet", "-m", message]);
        head_of(self.dir.path())
    }
}

impl Default for UpstreamRepo {
    fn default() -> Self {
        Self::new()
    }
}

/// A temporary project directory to run `taglock` in.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Run `taglock init` with a fixed name and repository.
    pub fn initialized(self) -> Self {
        self.command()
            .args(["init", "--name", "demo", "--repository"])
            .arg("https://example.com/demo")
            .assert()
            .success();
        self
    }

    /// Write the manifest directly.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp_dir
            .child(".taglock.yaml")
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Write the lockfile directly.
    pub fn with_lock(self, content: &str) -> Self {
        self.temp_dir
            .child(".taglock.lock")
            .write_str(content)
            .expect("Failed to write lockfile");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.temp_dir.path().join(".taglock.yaml")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.temp_dir.path().join(".taglock.lock")
    }

    /// Read the lockfile as a path-to-hash mapping.
    pub fn lock(&self) -> std::collections::BTreeMap<String, String> {
        let content = std::fs::read_to_string(self.lock_path()).expect("Failed to read lock");
        serde_yaml::from_str::<Option<_>>(&content)
            .expect("Lockfile should be valid YAML")
            .unwrap_or_default()
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory with
    /// plain output and no inherited taglock settings.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("taglock");
        cmd.current_dir(self.path())
            .env_remove("TAGLOCK_DIR")
            .env_remove("TAGLOCK_GIT")
            .env_remove("RUST_LOG")
            .env("GIT_TERMINAL_PROMPT", "0")
            .arg("--color")
            .arg("never");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_documents() {
        let fixture = TestFixture::new()
            .with_manifest(documents::TWO_DEPS_MANIFEST)
            .with_lock(documents::PARTIAL_LOCK);
        assert!(fixture.manifest_path().exists());
        assert_eq!(fixture.lock().len(), 1);
    }

    #[test]
    fn test_documents_are_valid_yaml() {
        for doc in [
            documents::EMPTY_MANIFEST,
            documents::TWO_DEPS_MANIFEST,
            documents::PARTIAL_LOCK,
        ] {
            serde_yaml::from_str::<serde_yaml::Value>(doc).expect("Document should be valid YAML");
        }
        assert!(serde_yaml::from_str::<serde_yaml::Value>(documents::INVALID_YAML).is_err());
    }

    #[test]
    fn test_upstream_tags_point_at_distinct_commits() {
        if !git_available() {
            return;
        }
        let upstream = UpstreamRepo::new().with_tags(&["v0.1.0", "v0.2.0"]);
        assert_ne!(upstream.hash_of("v0.1.0"), upstream.hash_of("v0.2.0"));
    }
}
