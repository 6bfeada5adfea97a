//! Persistence layer for MockAPI.
//!
//! The whole dataset is stored as one JSON document in a single file. Every
//! save rewrites the complete file (write to a temp file, then rename).
//!
//! # Example
//!
//! ```no_run
//! use mockapi_models::{Collection, Dataset, Schema};
//! use mockapi_persistence::DataFile;
//!
//! let file = DataFile::new("mockapi.json");
//!
//! let dataset = Dataset::new()
//!     .with_collection("customers", Collection::new(Schema::new(["firstname"])));
//! file.save(&dataset).unwrap();
//!
//! let loaded = file.load().unwrap();
//! assert_eq!(loaded, Some(dataset));
//! ```

pub mod atomic;
pub mod data_file;
pub mod error;

pub use data_file::DataFile;
pub use error::{PersistenceError, Result};
