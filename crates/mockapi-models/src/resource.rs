//! Resources and their output views.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::ResourceId;
use crate::schema::Schema;

/// Name of the synthesized primary key field in output views.
pub const ID_FIELD: &str = "id";

/// Output representation of a resource: its fields, any embedded related
/// resources, and the synthesized `id`.
pub type ResourceView = Map<String, Value>;

/// A single record of a collection.
///
/// The primary key is not stored here; it is the key under which the
/// resource lives in its collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(IndexMap<String, Value>);

impl Resource {
    /// Creates an empty resource.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shapes raw input into a resource holding exactly the schema's fields.
    ///
    /// Fields not declared by the schema are dropped. Declared fields missing
    /// from the input are stored as `null`.
    pub fn from_input(schema: &Schema, input: &Map<String, Value>) -> Self {
        let fields = schema
            .fields
            .iter()
            .map(|name| {
                let value = input.get(name).cloned().unwrap_or(Value::Null);
                (name.clone(), value)
            })
            .collect();
        Self(fields)
    }

    /// Returns the value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Iterates over fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the resource holds no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds the output view of this resource without the `id` field.
    pub fn to_fields_view(&self) -> ResourceView {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Builds the output view of this resource with `id` appended.
    pub fn to_view(&self, id: &ResourceId) -> ResourceView {
        let mut view = self.to_fields_view();
        view.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        view
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Resource {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
