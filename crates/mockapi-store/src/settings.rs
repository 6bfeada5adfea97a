//! Store settings.

use std::path::{Path, PathBuf};

use mockapi_models::{Dataset, DEFAULT_FK_SUFFIX};

use crate::matching::FieldMatch;

/// Default data file name.
pub const DEFAULT_DATA_FILE: &str = "mockapi.json";

/// Settings used to open a [`crate::DataStore`].
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Path of the backing data file.
    pub data_file: PathBuf,
    /// Initial dataset, used only when the data file is absent or unreadable.
    pub schema: Option<Dataset>,
    /// Suffix appended to a collection name to form its foreign key field.
    pub fk_suffix: String,
    /// Comparison used by field searches and cascade deletes.
    pub field_match: FieldMatch,
}

impl StoreSettings {
    /// Creates settings for the given data file with default options.
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            ..Default::default()
        }
    }

    /// Sets the initial dataset used to seed a missing data file.
    pub fn with_schema(mut self, schema: Dataset) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets the foreign key suffix.
    pub fn with_fk_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.fk_suffix = suffix.into();
        self
    }

    /// Sets the field comparison mode.
    pub fn with_field_match(mut self, field_match: FieldMatch) -> Self {
        self.field_match = field_match;
        self
    }

    /// Returns the data file path.
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            schema: None,
            fk_suffix: DEFAULT_FK_SUFFIX.to_string(),
            field_match: FieldMatch::default(),
        }
    }
}
