//! Related-resource expansion.
//!
//! Given the result set of a lookup in a "local" collection, embeds the
//! resources of requested related collections under each local result, as a
//! list named after the related collection.

use std::collections::HashMap;

use indexmap::IndexMap;
use mockapi_models::{foreign_key, Collection, Dataset, RelationKind, ResourceId, ResourceView};
use serde_json::Value;
use tracing::trace;

use crate::matching::key_of;

/// Lookup results keyed by primary key, before `id` is appended.
pub type ResultSet = IndexMap<ResourceId, ResourceView>;

/// Relationship lookup table of one collection: target name → kind.
pub type RelationTable = HashMap<String, RelationKind>;

/// Resolves relationships of a local collection against a dataset.
pub struct Resolver<'a> {
    dataset: &'a Dataset,
    local: &'a str,
    relations: &'a RelationTable,
    fk_suffix: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(
        dataset: &'a Dataset,
        local: &'a str,
        relations: &'a RelationTable,
        fk_suffix: &'a str,
    ) -> Self {
        Self {
            dataset,
            local,
            relations,
            fk_suffix,
        }
    }

    /// Embeds every requested related collection into `results`.
    ///
    /// Each name is resolved independently. Names the local schema does not
    /// relate to (or relates to through HABTM) are ignored, as are related
    /// collections missing from the dataset.
    pub fn expand<S: AsRef<str>>(&self, related: &[S], results: &mut ResultSet) {
        for name in related {
            let name = name.as_ref();
            let Some(kind) = self.relations.get(name) else {
                trace!(local = self.local, related = name, "no relationship, skipping");
                continue;
            };
            let Some(collection) = self.dataset.get(name) else {
                trace!(related = name, "related collection missing, skipping");
                continue;
            };

            match kind {
                RelationKind::Has => self.expand_has(name, collection, results),
                RelationKind::BelongsTo => self.expand_belongs_to(name, collection, results),
                RelationKind::ManyToMany => {
                    trace!(local = self.local, related = name, "HABTM is not resolved");
                }
            }
        }
    }

    /// One-to-many: related resources carry `<local><suffix>`.
    fn expand_has(&self, name: &str, related: &Collection, results: &mut ResultSet) {
        let fk = foreign_key(self.local, self.fk_suffix);

        for (related_id, resource) in &related.resources {
            let Some(local_id) = resource.get(&fk).and_then(key_of) else {
                continue;
            };
            if let Some(view) = results.get_mut(local_id.as_str()) {
                append_related(view, name, Value::Object(resource.to_view(related_id)));
            }
        }
    }

    /// Many-to-one: local results carry `<related><suffix>`.
    fn expand_belongs_to(&self, name: &str, related: &Collection, results: &mut ResultSet) {
        let fk = foreign_key(name, self.fk_suffix);

        for view in results.values_mut() {
            let Some(related_id) = view.get(&fk).and_then(key_of) else {
                continue;
            };
            if let Some((id, resource)) = related.resources.get_key_value(related_id.as_str()) {
                append_related(view, name, Value::Object(resource.to_view(id)));
            }
        }
    }
}

/// Appends `item` to the list stored under `name`, creating it first.
fn append_related(view: &mut ResourceView, name: &str, item: Value) {
    let slot = view
        .entry(name.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    match slot {
        Value::Array(list) => list.push(item),
        other => *other = Value::Array(vec![item]),
    }
}
