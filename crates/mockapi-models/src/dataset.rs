//! The dataset: every collection with its schema and resources.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::ids::ResourceId;
use crate::resource::{Resource, ID_FIELD};
use crate::schema::Schema;

/// A named group of resources sharing one schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub schema: Schema,
    #[serde(default, deserialize_with = "deserialize_resources")]
    pub resources: IndexMap<ResourceId, Resource>,
}

impl Collection {
    /// Creates an empty collection with the given schema.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            resources: IndexMap::new(),
        }
    }

    /// Adds a resource under the given key (builder style, for seeding).
    pub fn with_resource(mut self, id: impl Into<ResourceId>, resource: Resource) -> Self {
        self.resources.insert(id.into(), resource);
        self
    }

    /// Returns the number of resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if the collection holds no resources.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Accepts `resources` either as an `{id: fields}` object or as a list of
/// field objects. List entries use their string `id` field as key when
/// present, otherwise a generated one.
fn deserialize_resources<'de, D>(
    deserializer: D,
) -> Result<IndexMap<ResourceId, Resource>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Keyed(IndexMap<ResourceId, Resource>),
        Listed(Vec<Map<String, Value>>),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Keyed(map) => map,
        Repr::Listed(list) => list
            .into_iter()
            .map(|mut fields| {
                let id = match fields.remove(ID_FIELD) {
                    Some(Value::String(id)) if !id.is_empty() => ResourceId::from(id),
                    _ => ResourceId::generate(),
                };
                (id, fields.into_iter().collect())
            })
            .collect(),
    })
}

/// Mapping of collection name to collection. The unit of persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset(IndexMap<String, Collection>);

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a collection (builder style).
    pub fn with_collection(mut self, name: impl Into<String>, collection: Collection) -> Self {
        self.insert(name, collection);
        self
    }

    /// Inserts or replaces a collection.
    pub fn insert(&mut self, name: impl Into<String>, collection: Collection) {
        self.0.insert(name.into(), collection);
    }

    /// Returns a collection by name.
    pub fn get(&self, name: &str) -> Option<&Collection> {
        self.0.get(name)
    }

    /// Returns a mutable collection by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Collection> {
        self.0.get_mut(name)
    }

    /// Returns true if the collection exists.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Iterates over collection names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterates over collections in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Collection)> {
        self.0.iter()
    }

    /// Returns the number of collections.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the dataset has no collections.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
