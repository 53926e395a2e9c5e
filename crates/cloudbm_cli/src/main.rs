//! CLI smoke entry point.
//!
//! # Responsibility
//! - Exercise `cloudbm_core` end-to-end against a database file.
//! - Keep output deterministic and line-oriented for quick local checks.

use clap::{Parser, Subcommand};
use cloudbm_core::{
    init_logging, open_db, parse_seed_entries, seed_system_items, CatalogKind, CatalogListQuery,
    CatalogService, CatalogServiceError, ConfigError, CoreConfig, DbError, Sort, SortField,
    SqliteCatalogStore,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// Reference-data catalog tool.
#[derive(Debug, Parser)]
#[command(name = "cloudbm", version, about = "Inspect and seed reference-data catalogs.")]
struct Cli {
    /// Database file; overrides `db_path` from the config.
    #[arg(long, global = true, value_name = "FILE")]
    db: Option<PathBuf>,
    /// JSON config file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core health and version.
    Ping,
    /// Install system items from a JSON seed file.
    Seed {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// List one catalog ordered by key.
    List {
        /// Catalog tag, e.g. `address_type`.
        catalog: CatalogKind,
        /// Display language; defaults to the configured language.
        #[arg(long)]
        language: Option<String>,
    },
    /// Delete an item by key.
    Delete { catalog: CatalogKind, key: String },
}

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Logging(String),
    Db(DbError),
    Catalog(CatalogServiceError),
    SeedFile { path: PathBuf, message: String },
    KeyNotFound { catalog: CatalogKind, key: String },
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::SeedFile { path, message } => {
                write!(f, "invalid seed file `{}`: {message}", path.display())
            }
            Self::KeyNotFound { catalog, key } => {
                write!(f, "{} not found for key: {key}", catalog.label())
            }
        }
    }
}

impl Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<CatalogServiceError> for CliError {
    fn from(value: CatalogServiceError) -> Self {
        Self::Catalog(value)
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    if let Command::Ping = cli.command {
        println!("cloudbm_core ping={}", cloudbm_core::ping());
        println!("cloudbm_core version={}", cloudbm_core::core_version());
        return Ok(());
    }

    init_logging(&config.log_settings()).map_err(CliError::Logging)?;
    match cli.command {
        Command::Ping => Ok(()),
        Command::Seed { file } => seed(&config, file),
        Command::List { catalog, language } => list(&config, catalog, language.as_deref()),
        Command::Delete { catalog, key } => delete(&config, catalog, &key),
    }
}

fn seed(config: &CoreConfig, file: PathBuf) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(&file).map_err(|err| CliError::SeedFile {
        path: file.clone(),
        message: err.to_string(),
    })?;
    let entries = parse_seed_entries(&raw).map_err(|err| CliError::SeedFile {
        path: file.clone(),
        message: err.to_string(),
    })?;

    let conn = open_db(&config.db_path)?;
    let report = seed_system_items(&conn, &entries, &config.catalog_options())?;
    println!("created={} skipped={}", report.created, report.skipped);
    for (catalog, count) in &report.created_by_catalog {
        println!("  {catalog}={count}");
    }
    Ok(())
}

fn list(config: &CoreConfig, catalog: CatalogKind, language: Option<&str>) -> Result<(), CliError> {
    let conn = open_db(&config.db_path)?;
    let store = SqliteCatalogStore::try_new(&conn, catalog).map_err(CatalogServiceError::from)?;
    let service = CatalogService::with_options(store, config.catalog_options());

    let query = CatalogListQuery {
        sort: Sort {
            fields: vec![SortField::ascending("key")],
        },
        ..CatalogListQuery::default()
    };
    let page = service.list_summaries(&query, language)?;
    for row in &page.items {
        let mut flags = String::new();
        if let Some(rate) = row.rate {
            flags.push_str(&format!(" rate={rate}"));
        }
        if row.is_default {
            flags.push_str(" [default]");
        }
        if row.is_system {
            flags.push_str(" [system]");
        }
        println!("{}\t{}\t{}{}", row.id, row.key, row.name, flags);
    }
    println!("total={}", page.total_count);
    Ok(())
}

fn delete(config: &CoreConfig, catalog: CatalogKind, key: &str) -> Result<(), CliError> {
    let conn = open_db(&config.db_path)?;
    let store = SqliteCatalogStore::try_new(&conn, catalog).map_err(CatalogServiceError::from)?;
    let service = CatalogService::with_options(store, config.catalog_options());

    let item = service
        .get_item_by_key(key)?
        .ok_or_else(|| CliError::KeyNotFound {
            catalog,
            key: key.to_string(),
        })?;
    service.delete_item(&item.id)?;
    println!("deleted {} {}", catalog, item.key);
    Ok(())
}

fn report_error(err: &CliError) -> ExitCode {
    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "error: {err}");
    ExitCode::FAILURE
}
