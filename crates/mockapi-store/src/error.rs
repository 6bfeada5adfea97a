//! Error types for the collection store.

use std::path::PathBuf;

use mockapi_persistence::PersistenceError;
use thiserror::Error;

/// Errors returned by [`crate::DataStore`].
///
/// Lookups that find nothing are not errors; they return `None` or `false`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No data file exists and no schema was supplied to seed one.
    #[error("missing schema: {path} does not exist and no schema was supplied")]
    MissingSchema { path: PathBuf },

    /// The data file exists but could not be decoded, and no schema was
    /// supplied to reseed it.
    #[error("corrupt data file {path}: {source}")]
    CorruptData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The collection does not exist.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    /// Reading or writing the data file failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
