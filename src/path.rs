//! Path resolution for dependency locations inside a project.
//!
//! Every dependency lives at a logical, base-relative path such as
//! `vendor/libfoo`. [`resolve`] turns that into a full path under the base
//! directory without touching the filesystem, rejecting anything that would
//! land outside it.

use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Resolves a logical dependency path against a project base directory.
///
/// The check is purely lexical: `.` segments are dropped and `..` segments
/// fold into their parent. The result must stay strictly below `base`, so
/// empty paths, absolute paths, paths that climb out, and paths that
/// collapse onto `base` itself are all rejected with [`Error::InvalidPath`].
pub fn resolve(base: &Path, logical: &str) -> Result<PathBuf> {
    let mut full = base.to_path_buf();
    full.extend(segments(logical)?);
    Ok(full)
}

/// Canonical form of a logical dependency path.
///
/// `vendor/lib`, `./vendor/lib`, `vendor/lib/` and `vendor/x/../lib` all
/// normalize to `vendor/lib`. Manifest and lock entries are keyed by this
/// form, so two spellings of one location can never both be dependencies.
/// Fails exactly when [`resolve`] does.
pub fn normalize(logical: &str) -> Result<String> {
    let parts: Vec<String> = segments(logical)?
        .into_iter()
        .map(|part| part.to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

/// Lookup key for `logical`: its normalized form, or the path unchanged when
/// it is not a valid dependency path.
pub fn key(logical: &str) -> String {
    normalize(logical).unwrap_or_else(|_| logical.to_string())
}

fn segments(logical: &str) -> Result<Vec<&OsStr>> {
    let invalid = |message: &str| Error::InvalidPath {
        path: logical.to_string(),
        message: message.to_string(),
    };

    if logical.trim().is_empty() {
        return Err(invalid("path is empty"));
    }

    let mut parts: Vec<&OsStr> = Vec::new();
    for component in Path::new(logical).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(invalid("path escapes the project directory"));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("path must be relative to the project directory"));
            }
        }
    }

    if parts.is_empty() {
        return Err(invalid("path resolves to the project directory itself"));
    }
    Ok(parts)
}
