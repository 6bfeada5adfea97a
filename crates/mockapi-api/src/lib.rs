//! HTTP router for MockAPI.
//!
//! Every request path is split into segments and each segment classified as
//! a collection (`C`) or an identifier (`I`). The resulting pattern and the
//! request method select exactly one [`mockapi_store::DataStore`] operation:
//!
//! | Pattern | GET | POST | PUT | DELETE |
//! |---|---|---|---|---|
//! | `C` | list | create | - | - |
//! | `CI` | get | - | update | delete |
//! | `CIC` | get with related | create | - | - |
//! | `CC` | list with related | - | - | - |
//!
//! # Example
//!
//! ```ignore
//! use mockapi_api::{ApiConfig, AppState, serve};
//! use mockapi_store::{DataStore, StoreSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DataStore::open(StoreSettings::new("mockapi.json"))?;
//!     let config = ApiConfig::default();
//!
//!     serve(config.clone(), AppState::new(config, store)).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod latency;
pub mod pattern;
pub mod response;
pub mod router;
pub mod state;
pub mod types;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use pattern::RoutePattern;
pub use router::{create_router, serve};
pub use state::AppState;
