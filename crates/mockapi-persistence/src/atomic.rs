//! Whole-file replacement and JSON helpers.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::error::{PersistenceError, Result};

/// Replaces the contents of `path` with `data` in one operation.
///
/// The data goes to a temporary file in the target directory which is then
/// renamed over the target, so readers see either the old or the new file.
/// Missing parent directories are created.
pub fn replace_file(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| PersistenceError::DirectoryError {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let write_err = |source: std::io::Error| PersistenceError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    temp_file.write_all(data).map_err(write_err)?;
    temp_file.flush().map_err(write_err)?;
    temp_file
        .persist(path)
        .map_err(|e| PersistenceError::WriteError {
            path: path.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}

/// Serializes `value` as pretty JSON and replaces `path` with it.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    replace_file(path, &json)
}

/// Reads and deserializes JSON from `path`, returning `None` if the file
/// does not exist.
///
/// A file that exists but cannot be decoded is reported as
/// [`PersistenceError::CorruptData`], never as an empty value.
pub fn read_json_optional<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PersistenceError::ReadError {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|source| PersistenceError::CorruptData {
            path: path.to_path_buf(),
            source,
        })
}
