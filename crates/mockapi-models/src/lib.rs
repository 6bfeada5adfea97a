//! Core data models for MockAPI.
//!
//! This crate provides the types that describe a MockAPI dataset: collection
//! schemas with their relationship declarations, resources, and the dataset
//! that maps collection names to their schema and resources.

pub mod dataset;
pub mod ids;
pub mod resource;
pub mod schema;

// Re-export main types
pub use dataset::{Collection, Dataset};
pub use ids::ResourceId;
pub use resource::{Resource, ResourceView, ID_FIELD};
pub use schema::{foreign_key, RelationKind, Relationship, Schema, DEFAULT_FK_SUFFIX};
