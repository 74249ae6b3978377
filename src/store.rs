//! YAML document persistence shared by the manifest and lock stores.
//!
//! Documents are always read and written whole. Writes go to a temporary
//! sibling file that is then renamed over the target, so an interrupted
//! write leaves either the old document or the new one, never a torn file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Reads and decodes the YAML document at `path`.
///
/// Returns `Ok(None)` when the file does not exist. A blank file decodes to
/// `T::default()`.
pub fn load_yaml<T>(path: &Path) -> Result<Option<T>>
where
    T: DeserializeOwned + Default,
{
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(Error::ManifestParse {
                file: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(Some(T::default()));
    }

    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|e| Error::ManifestParse {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Encodes `value` as YAML and atomically replaces the file at `path`.
pub fn save_yaml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let persistence = |message: String| Error::Persistence {
        file: path.to_path_buf(),
        message,
    };

    let content = serde_yaml::to_string(value).map_err(|e| persistence(e.to_string()))?;

    let temp_path = temp_path_for(path);
    let write = || -> std::io::Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    };

    write().map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        persistence(e.to_string())
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
