//! The collection store.

use std::collections::HashMap;

use mockapi_models::{
    foreign_key, Collection, Dataset, Resource, ResourceId, ResourceView, Schema, ID_FIELD,
};
use mockapi_persistence::{DataFile, PersistenceError};
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::error::{Result, StoreError};
use crate::relations::{RelationTable, Resolver, ResultSet};
use crate::settings::StoreSettings;

/// Options for lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Related collections to embed into each result.
    pub related: Vec<String>,
}

impl QueryOptions {
    /// Creates options with no related collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a related collection to embed.
    pub fn with_related(mut self, collection: impl Into<String>) -> Self {
        self.related.push(collection.into());
        self
    }
}

/// In-memory collections backed by a single data file.
///
/// Lookups never fail: an unknown collection or id yields `None`. Every
/// mutation writes the whole dataset to the data file before returning, and
/// is rolled back in memory if that write fails.
#[derive(Debug)]
pub struct DataStore {
    data: Dataset,
    file: DataFile,
    settings: StoreSettings,
    relations: HashMap<String, RelationTable>,
}

impl DataStore {
    /// Opens the store described by `settings`.
    ///
    /// Loads the data file if it exists. Otherwise seeds the dataset from
    /// `settings.schema` and writes it immediately. A data file that cannot
    /// be decoded is reseeded from the schema when one is supplied.
    ///
    /// # Errors
    /// - [`StoreError::MissingSchema`] if there is no data file and no schema.
    /// - [`StoreError::CorruptData`] if the data file is unreadable and there
    ///   is no schema.
    pub fn open(settings: StoreSettings) -> Result<Self> {
        let file = DataFile::new(settings.data_file());

        let loaded = match file.load() {
            Ok(loaded) => loaded,
            Err(PersistenceError::CorruptData { path, source }) => {
                if settings.schema.is_none() {
                    return Err(StoreError::CorruptData { path, source });
                }
                warn!(
                    path = %path.display(),
                    error = %source,
                    "data file is corrupt, reseeding from schema"
                );
                None
            }
            Err(e) => return Err(e.into()),
        };

        let data = match loaded {
            Some(data) => {
                info!(path = %file.path().display(), collections = data.len(), "loaded data file");
                data
            }
            None => {
                let seed = Self::seed(&file, &settings)?;
                file.save(&seed)?;
                info!(
                    path = %file.path().display(),
                    collections = seed.len(),
                    "seeded data file from schema"
                );
                seed
            }
        };

        Ok(Self::assemble(data, file, settings))
    }

    /// Opens the store without ever writing the data file.
    ///
    /// A missing file falls back to the schema in memory only. A corrupt
    /// file is always an error, even when a schema is supplied.
    ///
    /// # Errors
    /// - [`StoreError::MissingSchema`] if there is no data file and no schema.
    /// - [`StoreError::CorruptData`] if the data file is unreadable.
    pub fn open_read_only(settings: StoreSettings) -> Result<Self> {
        let file = DataFile::new(settings.data_file());

        let data = match file.load() {
            Ok(Some(data)) => data,
            Ok(None) => {
                debug!(path = %file.path().display(), "no data file, reading schema only");
                Self::seed(&file, &settings)?
            }
            Err(PersistenceError::CorruptData { path, source }) => {
                return Err(StoreError::CorruptData { path, source })
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self::assemble(data, file, settings))
    }

    fn seed(file: &DataFile, settings: &StoreSettings) -> Result<Dataset> {
        settings
            .schema
            .clone()
            .ok_or_else(|| StoreError::MissingSchema {
                path: file.path().to_path_buf(),
            })
    }

    fn assemble(data: Dataset, file: DataFile, settings: StoreSettings) -> Self {
        let relations = data
            .iter()
            .map(|(name, collection)| (name.clone(), collection.schema.relation_table()))
            .collect();

        Self {
            data,
            file,
            settings,
            relations,
        }
    }

    /// Returns the whole dataset.
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// Returns true if the collection exists.
    pub fn collection_exists(&self, name: &str) -> bool {
        self.data.contains(name)
    }

    /// Returns a collection with its schema and raw resources.
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.data.get(name)
    }

    /// Returns a collection's schema.
    pub fn collection_schema(&self, name: &str) -> Option<&Schema> {
        self.data.get(name).map(|c| &c.schema)
    }

    /// Lists every resource of a collection in insertion order.
    pub fn list_resources(
        &self,
        collection: &str,
        options: &QueryOptions,
    ) -> Option<Vec<ResourceView>> {
        let source = self.data.get(collection)?;
        let results = source
            .resources
            .iter()
            .map(|(id, resource)| (id.clone(), resource.to_fields_view()))
            .collect();
        Some(self.finish(collection, results, options))
    }

    /// Returns one resource by primary key.
    pub fn get_resource(
        &self,
        collection: &str,
        id: &str,
        options: &QueryOptions,
    ) -> Option<ResourceView> {
        let source = self.data.get(collection)?;
        let (key, resource) = source.resources.get_key_value(id)?;

        let mut results = ResultSet::new();
        results.insert(key.clone(), resource.to_fields_view());
        self.finish(collection, results, options).into_iter().next()
    }

    /// Returns the resources whose `field` matches `value`.
    ///
    /// Comparison follows the store's [`crate::FieldMatch`] mode. A resource
    /// without the field compares as `null`.
    pub fn find_resources_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        options: &QueryOptions,
    ) -> Option<Vec<ResourceView>> {
        let source = self.data.get(collection)?;
        let mode = self.settings.field_match;

        let results = source
            .resources
            .iter()
            .filter(|(_, resource)| {
                mode.matches(resource.get(field).unwrap_or(&Value::Null), value)
            })
            .map(|(id, resource)| (id.clone(), resource.to_fields_view()))
            .collect();
        Some(self.finish(collection, results, options))
    }

    /// Creates or replaces a resource and writes the data file.
    ///
    /// Only the schema's fields are copied from `input`; missing fields are
    /// stored as `null`. Without an id (or with an empty one) a new id is
    /// generated. With an existing id the resource is replaced in place.
    pub fn save_resource(
        &mut self,
        collection: &str,
        input: &Map<String, Value>,
        id: Option<&str>,
    ) -> Result<ResourceId> {
        let target = self
            .data
            .get_mut(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;

        let id = match id {
            Some(id) if !id.is_empty() => ResourceId::from(id),
            _ => ResourceId::generate(),
        };
        let resource = Resource::from_input(&target.schema, input);
        let previous = target.resources.insert(id.clone(), resource);

        if let Err(e) = self.file.save(&self.data) {
            error!(collection, id = %id, error = %e, "failed to save resource");
            if let Some(target) = self.data.get_mut(collection) {
                match previous {
                    Some(previous) => {
                        target.resources.insert(id, previous);
                    }
                    None => {
                        target.resources.shift_remove(&id);
                    }
                }
            }
            return Err(e.into());
        }

        info!(collection, id = %id, "saved resource");
        Ok(id)
    }

    /// Deletes a resource and writes the data file.
    ///
    /// Returns `Ok(false)` without touching the file when the collection or
    /// id does not exist. With `cascade`, resources of every `has` collection
    /// whose foreign key equals the deleted id are removed as well.
    pub fn delete_resource(&mut self, collection: &str, id: &str, cascade: bool) -> Result<bool> {
        let exists = self
            .data
            .get(collection)
            .is_some_and(|c| c.resources.contains_key(id));
        if !exists {
            debug!(collection, id, "delete target not found");
            return Ok(false);
        }

        let snapshot = self.data.clone();
        let mut removed_related = 0;

        let dependents = match self.data.get_mut(collection) {
            Some(target) => {
                target.resources.shift_remove(id);
                if cascade {
                    target.schema.has.clone()
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        };

        let fk = foreign_key(collection, &self.settings.fk_suffix);
        let deleted = Value::String(id.to_string());
        let mode = self.settings.field_match;

        for name in &dependents {
            let Some(related) = self.data.get_mut(name) else {
                continue;
            };
            let before = related.resources.len();
            related
                .resources
                .retain(|_, r| !r.get(&fk).is_some_and(|v| mode.matches(v, &deleted)));
            removed_related += before - related.resources.len();
        }

        if let Err(e) = self.file.save(&self.data) {
            error!(collection, id, error = %e, "failed to save after delete");
            self.data = snapshot;
            return Err(e.into());
        }

        info!(collection, id, removed_related, "deleted resource");
        Ok(true)
    }

    /// Expands related collections and appends `id` to every result.
    fn finish(
        &self,
        collection: &str,
        mut results: ResultSet,
        options: &QueryOptions,
    ) -> Vec<ResourceView> {
        if !options.related.is_empty() {
            if let Some(table) = self.relations.get(collection) {
                Resolver::new(&self.data, collection, table, &self.settings.fk_suffix)
                    .expand(&options.related, &mut results);
            }
        }

        results
            .into_iter()
            .map(|(id, mut view)| {
                view.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
                view
            })
            .collect()
    }
}
