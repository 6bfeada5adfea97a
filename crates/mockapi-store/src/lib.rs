//! Collection store for MockAPI.
//!
//! [`DataStore`] holds every collection of a dataset in memory, answers
//! lookups with optional related-resource expansion, and writes the complete
//! dataset back to its file after every mutation.
//!
//! # Example
//!
//! ```no_run
//! use mockapi_models::{Collection, Dataset, Schema};
//! use mockapi_store::{DataStore, QueryOptions, StoreSettings};
//! use serde_json::json;
//!
//! let schema = Dataset::new()
//!     .with_collection(
//!         "customers",
//!         Collection::new(Schema::new(["firstname"]).with_has("orders")),
//!     )
//!     .with_collection(
//!         "orders",
//!         Collection::new(
//!             Schema::new(["customers.id", "ordertotal"]).with_belongs_to("customers"),
//!         ),
//!     );
//!
//! let settings = StoreSettings::new("mockapi.json").with_schema(schema);
//! let mut store = DataStore::open(settings)?;
//! let fields = json!({"firstname": "John"});
//! let id = store.save_resource("customers", fields.as_object().unwrap(), None)?;
//! let options = QueryOptions::new().with_related("orders");
//! let customer = store.get_resource("customers", id.as_str(), &options);
//! # Ok::<(), mockapi_store::StoreError>(())
//! ```

pub mod error;
pub mod matching;
pub mod relations;
pub mod settings;
pub mod store;

pub use error::{Result, StoreError};
pub use matching::FieldMatch;
pub use settings::StoreSettings;
pub use store::{DataStore, QueryOptions};
