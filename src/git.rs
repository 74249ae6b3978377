//! Thin wrappers around the system `git` command.
//!
//! Using the `git` binary rather than a library binding means every
//! credential source the user already has configured is honoured:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig
//!
//! Every failure is reported as [`Error::Adapter`] carrying git's stderr.

use std::path::Path;
use std::process::{Command, Output};

use log::debug;

use crate::error::{Error, Result};
use crate::version::TagMap;

/// Name of the remote every dependency clone tracks.
pub const REMOTE_NAME: &str = "origin";

/// Runs `git` with `args` inside `dir` and returns its stdout.
fn run(program: &str, dir: &Path, args: &[&str], operation: &str) -> Result<String> {
    debug!("{} -C {} {}", program, dir.display(), args.join(" "));

    let output = Command::new(program)
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map_err(|e| Error::adapter(operation, dir.display().to_string(), e.to_string()))?;

    check_output(output, operation, dir)
}

fn check_output(output: Output, operation: &str, path: &Path) -> Result<String> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::Adapter {
            operation: operation.to_string(),
            path: path.display().to_string(),
            hint: auth_hint(&stderr),
            message: stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Suggests a fix for the usual authentication failures.
fn auth_hint(stderr: &str) -> Option<String> {
    if stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
    {
        Some(
            "Make sure you have access to the repository. For private repos, \
             check your SSH agent, git credential helper, or access token"
                .to_string(),
        )
    } else {
        None
    }
}

/// Checks whether `path` is the root of a git working tree.
///
/// A directory nested inside some other repository does not count, so the
/// project's own repository is never mistaken for a dependency clone.
pub fn is_repository(program: &str, path: &Path) -> bool {
    path.is_dir() && path.join(".git").exists() && open(program, path).is_ok()
}

/// Verifies that `path` holds a readable repository.
pub fn open(program: &str, path: &Path) -> Result<()> {
    run(program, path, &["rev-parse", "--git-dir"], "open").map(|_| ())
}

/// Clones `url` into `target_dir` with all tags.
///
/// The clone is a full one: lock hashes can point at any tagged commit, and
/// a shallow history would not contain them.
pub fn clone(program: &str, url: &str, target_dir: &Path) -> Result<()> {
    if let Some(parent) = target_dir.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::adapter("clone", target_dir.display().to_string(), e.to_string())
        })?;
    }

    debug!("{} clone {} {}", program, url, target_dir.display());
    let output = Command::new(program)
        .args(["clone", "--quiet", "--origin", REMOTE_NAME, url])
        .arg(target_dir)
        .output()
        .map_err(|e| Error::adapter("clone", target_dir.display().to_string(), e.to_string()))?;

    check_output(output, "clone", target_dir).map(|_| ())
}

/// Fetches new commits and tags from the tracked remote.
///
/// `git fetch` exits successfully when there is nothing new, so an
/// up-to-date clone is not an error.
pub fn fetch(program: &str, path: &Path) -> Result<()> {
    run(
        program,
        path,
        &["fetch", "--quiet", "--tags", "--force", REMOTE_NAME],
        "fetch",
    )
    .map(|_| ())
}

/// Lists every tag in the local repository with the commit it points at.
pub fn list_tags(program: &str, path: &Path) -> Result<TagMap> {
    let stdout = run(
        program,
        path,
        &[
            "for-each-ref",
            "--format=%(refname)%09%(objectname)%09%(*objectname)",
            "refs/tags",
        ],
        "list tags",
    )?;

    Ok(parse_tag_listing(&stdout))
}

/// Parses `for-each-ref` output of the form `<ref>\t<object>\t<peeled>`.
///
/// Annotated tags carry the tag object in the second column and the commit
/// in the third; lightweight tags leave the third column empty.
fn parse_tag_listing(stdout: &str) -> TagMap {
    stdout
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let name = fields.next()?.strip_prefix("refs/tags/")?;
            let object = fields.next()?;
            let peeled = fields.next().unwrap_or("");
            let hash = if peeled.is_empty() { object } else { peeled };
            if name.is_empty() || hash.is_empty() {
                return None;
            }
            Some((name.to_string(), hash.to_string()))
        })
        .collect()
}

/// Detaches the working tree at `hash`.
pub fn checkout(program: &str, path: &Path, hash: &str) -> Result<()> {
    run(
        program,
        path,
        &[
            "-c",
            "advice.detachedHead=false",
            "checkout",
            "--quiet",
            "--detach",
            hash,
        ],
        "checkout",
    )
    .map(|_| ())
}

/// Returns the URL of the tracked remote, if one is configured.
pub fn remote_url(program: &str, path: &Path) -> Result<Option<String>> {
    let remotes = run(program, path, &["remote"], "read remotes")?;
    if !remotes.lines().any(|r| r.trim() == REMOTE_NAME) {
        return Ok(None);
    }

    let url = run(program, path, &["remote", "get-url", REMOTE_NAME], "read remotes")?;
    Ok(Some(url.trim().to_string()))
}

/// Points the tracked remote at `url`, creating it when missing.
pub fn set_remote_url(program: &str, path: &Path, url: &str) -> Result<()> {
    let verb = match remote_url(program, path)? {
        Some(_) => "set-url",
        None => "add",
    };
    run(program, path, &["remote", verb, REMOTE_NAME, url], "set remote").map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_tag_listing_lightweight_and_annotated() {
        let stdout = "refs/tags/v0.1.0\taaaa\t\n\
                      refs/tags/v0.2.0\ttagobj\tbbbb\n";
        let tags = parse_tag_listing(stdout);

        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("v0.1.0").map(String::as_str), Some("aaaa"));
        assert_eq!(tags.get("v0.2.0").map(String::as_str), Some("bbbb"));
    }

    #[test]
    fn test_parse_tag_listing_keeps_nested_names() {
        let tags = parse_tag_listing("refs/tags/release/v1.0.0\tcccc\t\n");
        assert_eq!(
            tags.get("release/v1.0.0").map(String::as_str),
            Some("cccc")
        );
    }

    #[test]
    fn test_parse_tag_listing_skips_malformed_lines() {
        let stdout = "\nrefs/heads/main\tdddd\t\nrefs/tags/\teeee\t\ngarbage\n";
        assert!(parse_tag_listing(stdout).is_empty());
    }

    #[test]
    fn test_auth_hint() {
        assert!(auth_hint("fatal: Authentication failed for 'https://x'").is_some());
        assert!(auth_hint("git@github.com: Permission denied (publickey).").is_some());
        assert!(auth_hint("fatal: repository not found").is_none());
    }

    #[test]
    fn test_is_repository_false_for_plain_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(!is_repository("git", temp_dir.path()));
        assert!(!is_repository("git", &temp_dir.path().join("missing")));
    }

    #[test]
    fn test_missing_program_is_adapter_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = open("taglock-no-such-git", temp_dir.path()).unwrap_err();
        match err {
            Error::Adapter { operation, .. } => assert_eq!(operation, "open"),
            other => panic!("expected adapter error, got {other:?}"),
        }
    }

    #[test]
    fn test_clone_unwritable_parent_is_adapter_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("vendor");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = clone("git", "https://example.com/lib", &blocker.join("lib")).unwrap_err();
        match err {
            Error::Adapter { operation, .. } => assert_eq!(operation, "clone"),
            other => panic!("expected adapter error, got {other:?}"),
        }
    }
}
