//! Command handlers for CLI subcommands.

use std::path::PathBuf;

use mockapi_api::AppState;
use mockapi_models::ResourceView;
use mockapi_persistence::{DataFile, PersistenceError};
use mockapi_store::{DataStore, QueryOptions, StoreError, StoreSettings};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::cli::{Cli, Commands};

/// Errors raised by CLI commands.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Schema file not found: {0}")]
    SchemaNotFound(PathBuf),

    #[error("Data file already exists: {0} (use --force to overwrite)")]
    AlreadyInitialized(PathBuf),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Builds store settings from the CLI, loading the schema file if one was given.
pub fn store_settings(cli: &Cli) -> Result<StoreSettings> {
    let settings = cli.base_settings();
    let Some(path) = &cli.schema else {
        return Ok(settings);
    };

    let schema = DataFile::new(path)
        .load()?
        .ok_or_else(|| CommandError::SchemaNotFound(path.clone()))?;
    Ok(settings.with_schema(schema))
}

/// Execute a CLI command. No command means `serve`.
pub async fn execute(cli: Cli) -> Result<()> {
    match &cli.command {
        None | Some(Commands::Serve) => cmd_serve(&cli).await,
        Some(Commands::Init { force }) => cmd_init(&cli, *force),
        Some(Commands::Dump) => cmd_dump(&cli),
        Some(Commands::Collections) => cmd_collections(&cli),
        Some(Commands::Find {
            collection,
            field,
            value,
            related,
        }) => cmd_find(&cli, collection, field, value, related),
    }
}

async fn cmd_serve(cli: &Cli) -> Result<()> {
    let store = DataStore::open(store_settings(cli)?)?;
    let config = cli.serve.api_config();

    info!(
        data_file = %cli.data_file.display(),
        collections = store.data().len(),
        "Starting MockAPI server"
    );

    mockapi_api::serve(config.clone(), AppState::new(config, store)).await?;
    Ok(())
}

fn cmd_init(cli: &Cli, force: bool) -> Result<()> {
    let store = init_store(cli, force)?;
    println!(
        "Initialized {} with {} collection(s)",
        cli.data_file.display(),
        store.data().len()
    );
    Ok(())
}

fn cmd_dump(cli: &Cli) -> Result<()> {
    let store = read_store(cli)?;
    println!("{}", serde_json::to_string_pretty(store.data())?);
    Ok(())
}

fn cmd_collections(cli: &Cli) -> Result<()> {
    let store = read_store(cli)?;
    for line in collection_summary(&store) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_find(
    cli: &Cli,
    collection: &str,
    field: &str,
    value: &str,
    related: &[String],
) -> Result<()> {
    let store = read_store(cli)?;
    let found = find(&store, collection, field, value, related)?;
    println!("{}", serde_json::to_string_pretty(&found)?);
    Ok(())
}

/// Opens the store for inspection. The data file is never created or
/// rewritten, even when it is missing or corrupt.
fn read_store(cli: &Cli) -> Result<DataStore> {
    Ok(DataStore::open_read_only(store_settings(cli)?)?)
}

/// Seeds the data file from the schema, replacing it only when `force` is set.
fn init_store(cli: &Cli, force: bool) -> Result<DataStore> {
    let settings = store_settings(cli)?;
    let file = DataFile::new(settings.data_file());

    if file.exists() {
        if !force {
            return Err(CommandError::AlreadyInitialized(file.path().to_path_buf()));
        }
        if settings.schema.is_none() {
            return Err(StoreError::MissingSchema {
                path: file.path().to_path_buf(),
            }
            .into());
        }
        std::fs::remove_file(file.path())?;
        info!(path = %file.path().display(), "Removed existing data file");
    }

    Ok(DataStore::open(settings)?)
}

/// One line per collection: name, resource count and relationships.
fn collection_summary(store: &DataStore) -> Vec<String> {
    store
        .data()
        .iter()
        .map(|(name, collection)| {
            let relations: Vec<String> = collection
                .schema
                .relationships()
                .map(|r| format!("{:?} {}", r.kind, r.target))
                .collect();

            if relations.is_empty() {
                format!("{} ({})", name, collection.len())
            } else {
                format!("{} ({}) [{}]", name, collection.len(), relations.join(", "))
            }
        })
        .collect()
}

fn find(
    store: &DataStore,
    collection: &str,
    field: &str,
    value: &str,
    related: &[String],
) -> Result<Vec<ResourceView>> {
    let options = related
        .iter()
        .fold(QueryOptions::new(), |options, r| options.with_related(r));

    store
        .find_resources_by_field(collection, field, &Value::String(value.to_string()), &options)
        .ok_or_else(|| CommandError::CollectionNotFound(collection.to_string()))
}
