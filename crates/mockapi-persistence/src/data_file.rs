//! The backing file of a MockAPI dataset.

use std::path::{Path, PathBuf};

use mockapi_models::Dataset;
use tracing::debug;

use crate::atomic::{read_json_optional, write_json};
use crate::error::Result;

/// Stores a complete [`Dataset`] as one JSON document.
///
/// ```text
/// {
///   "customers": {
///     "schema": { "fields": [...], "has": [...] },
///     "resources": { "<id>": { "<field>": <value>, ... } }
///   },
///   ...
/// }
/// ```
///
/// There is no locking: two processes saving the same file race and the
/// last rename wins.
#[derive(Debug, Clone)]
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    /// Creates a handle for the given file path. Nothing is read or written.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the backing file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the dataset. Returns `None` if the file does not exist.
    pub fn load(&self) -> Result<Option<Dataset>> {
        let dataset = read_json_optional::<Dataset>(&self.path)?;
        if let Some(ref data) = dataset {
            debug!(path = %self.path.display(), collections = data.len(), "loaded dataset");
        }
        Ok(dataset)
    }

    /// Serializes the complete dataset and replaces the backing file.
    pub fn save(&self, dataset: &Dataset) -> Result<()> {
        write_json(&self.path, dataset)?;
        debug!(path = %self.path.display(), "saved dataset");
        Ok(())
    }
}
