//! Collection schemas and relationship declarations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Default suffix appended to a collection name to form its foreign key field.
pub const DEFAULT_FK_SUFFIX: &str = ".id";

/// Kind of relationship a collection declares towards another collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// One-to-many: the related collection holds the foreign key.
    Has,
    /// Many-to-one: this collection holds the foreign key.
    BelongsTo,
    /// Many-to-many. Declared and persisted, never resolved.
    ManyToMany,
}

/// A single relationship declaration towards a target collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub kind: RelationKind,
    pub target: String,
}

/// Field list and relationship declarations of a collection.
///
/// Serialized as:
/// ```json
/// { "fields": ["customers.id", "orderdate"], "belongsTo": ["customers"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Ordered field names.
    #[serde(default)]
    pub fields: Vec<String>,

    /// Collections holding a foreign key to this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub has: Vec<String>,

    /// Collections this one holds a foreign key to.
    #[serde(
        default,
        rename = "belongsTo",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub belongs_to: Vec<String>,

    /// Many-to-many declarations (not resolved).
    #[serde(default, rename = "HABTM", skip_serializing_if = "Vec::is_empty")]
    pub habtm: Vec<String>,
}

impl Schema {
    /// Creates a schema with the given fields and no relationships.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Adds a one-to-many relationship.
    pub fn with_has(mut self, collection: impl Into<String>) -> Self {
        self.has.push(collection.into());
        self
    }

    /// Adds a many-to-one relationship.
    pub fn with_belongs_to(mut self, collection: impl Into<String>) -> Self {
        self.belongs_to.push(collection.into());
        self
    }

    /// Adds a many-to-many declaration.
    pub fn with_habtm(mut self, collection: impl Into<String>) -> Self {
        self.habtm.push(collection.into());
        self
    }

    /// Returns every relationship declaration, `has` first.
    pub fn relationships(&self) -> impl Iterator<Item = Relationship> + '_ {
        let has = self.has.iter().map(|t| (RelationKind::Has, t));
        let belongs_to = self.belongs_to.iter().map(|t| (RelationKind::BelongsTo, t));
        let habtm = self.habtm.iter().map(|t| (RelationKind::ManyToMany, t));

        has.chain(belongs_to)
            .chain(habtm)
            .map(|(kind, target)| Relationship {
                kind,
                target: target.clone(),
            })
    }

    /// Builds the target → kind lookup table for this schema.
    ///
    /// A target declared under several kinds resolves to the first one in
    /// `has`, `belongsTo`, `HABTM` order.
    pub fn relation_table(&self) -> HashMap<String, RelationKind> {
        let mut table = HashMap::new();
        for rel in self.relationships() {
            table.entry(rel.target).or_insert(rel.kind);
        }
        table
    }
}

/// Returns the foreign key field name referencing `collection`.
pub fn foreign_key(collection: &str, suffix: &str) -> String {
    format!("{}{}", collection, suffix)
}
