//! API request handlers.

pub mod collections;

pub use collections::*;
