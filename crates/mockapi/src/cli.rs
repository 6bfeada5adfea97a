//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mockapi_api::ApiConfig;
use mockapi_models::DEFAULT_FK_SUFFIX;
use mockapi_store::settings::DEFAULT_DATA_FILE;
use mockapi_store::{FieldMatch, StoreSettings};

/// MockAPI - mock REST API backed by a JSON data file
#[derive(Parser, Debug)]
#[command(name = "mockapi")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the data file
    #[arg(
        short = 'f',
        long,
        env = "MOCKAPI_DATA_FILE",
        default_value = DEFAULT_DATA_FILE,
        global = true
    )]
    pub data_file: PathBuf,

    /// Initial dataset (schema and optional seed resources), used when the
    /// data file does not exist yet
    #[arg(short, long, env = "MOCKAPI_SCHEMA", global = true)]
    pub schema: Option<PathBuf>,

    /// Suffix that turns a collection name into its foreign key field
    #[arg(long, env = "MOCKAPI_FK_SUFFIX", default_value = DEFAULT_FK_SUFFIX, global = true)]
    pub fk_suffix: String,

    /// Compare field values exactly instead of coercing numeric strings
    #[arg(long, global = true)]
    pub strict_match: bool,

    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the dataset over HTTP (default)
    Serve,

    /// Create the data file from the schema and exit
    Init {
        /// Overwrite an existing data file
        #[arg(long)]
        force: bool,
    },

    /// Print the whole dataset as JSON
    Dump,

    /// List collections with their resource counts
    Collections,

    /// Find resources whose field matches a value
    Find {
        /// Collection to search
        collection: String,

        /// Field name
        field: String,

        /// Value to match
        value: String,

        /// Related collection to embed (repeatable)
        #[arg(long = "with")]
        related: Vec<String>,
    },
}

/// Options of the `serve` command. Also accepted without the subcommand.
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(long, env = "MOCKAPI_HOST", default_value = "127.0.0.1", global = true)]
    pub host: String,

    /// Port to bind to
    #[arg(short, long, env = "MOCKAPI_PORT", default_value = "8080", global = true)]
    pub port: u16,

    /// Latency simulation factor (0 disables)
    #[arg(long, env = "MOCKAPI_LATENCY", default_value = "0", global = true)]
    pub latency: f64,

    /// Allowed CORS origin (repeatable, `*` for any)
    #[arg(long = "cors-origin", default_value = "*", global = true)]
    pub cors_origins: Vec<String>,
}

impl ServeArgs {
    /// Builds the API configuration.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(&self.host, self.port)
            .with_cors_origins(self.cors_origins.clone())
            .with_latency_factor(self.latency)
    }
}

impl Cli {
    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Returns the field comparison mode.
    pub fn field_match(&self) -> FieldMatch {
        if self.strict_match {
            FieldMatch::Strict
        } else {
            FieldMatch::Loose
        }
    }

    /// Builds store settings without the schema; see
    /// [`crate::commands::store_settings`] for loading it.
    pub fn base_settings(&self) -> StoreSettings {
        StoreSettings::new(&self.data_file)
            .with_fk_suffix(&self.fk_suffix)
            .with_field_match(self.field_match())
    }
}
