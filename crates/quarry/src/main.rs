//! Quarry command-line tool.
//!
//! Loads a record schema, connects to a database and runs one list, search or
//! lookup request, printing each record as a JSON line.
//!
//! ```text
//! quarry --schema demos/heroes.schema.json --database-url :memory: \
//!     --seed demos/heroes.json --term name=man --limit 5
//! ```

mod config;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use quarry_persistence::core::RecordStore;
use quarry_persistence::query::RecordResolver;
use quarry_persistence::schema::RecordSchema;
use quarry_persistence::types::Record;
use quarry_persistence::{BackendKind, StorageResult};
use tracing::info;

use crate::config::CliConfig;

#[cfg(feature = "sqlite")]
use quarry_persistence::backends::sqlite::SqliteBackend;

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `level`. Logs go to stderr so stdout
/// carries only records.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("quarry={},quarry_persistence={}", level, level))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Reads and validates a record schema file.
fn load_schema(path: &Path) -> anyhow::Result<RecordSchema> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file {}", path.display()))?;
    let schema: RecordSchema = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid record schema in {}", path.display()))?;
    info!(
        record = schema.name(),
        table = schema.table(),
        searchable = ?schema.searchable_fields().fields(),
        "Loaded record schema"
    );
    Ok(schema)
}

/// Creates the table and inserts the records of a seed file.
async fn seed_records(
    store: &dyn RecordStore,
    schema: &RecordSchema,
    path: &Path,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    let records: Vec<Record> = serde_json::from_str(&raw)
        .with_context(|| format!("Seed file {} is not a JSON array of records", path.display()))?;

    store.ensure_table(schema).await?;
    for record in &records {
        store.insert(schema, record).await?;
    }

    info!(record = schema.name(), count = records.len(), "Seeded records");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let schema = load_schema(&config.schema)?;

    let store: Arc<dyn RecordStore> = match config.backend {
        BackendKind::Sqlite => create_sqlite_store(&config)?,
        BackendKind::Postgres => create_postgres_store(&config).await?,
    };

    if let Some(seed) = &config.seed {
        seed_records(store.as_ref(), &schema, seed).await?;
    }

    // Strategy problems surface here, before any query runs.
    let resolver = RecordResolver::new(store, config.search_config())?;

    if config.explain {
        let statement = match config.lookup_id() {
            Some(id) => resolver.prepare_single(&schema, &id)?,
            None => resolver.prepare_multiple(&schema, &config.list_query())?,
        };
        println!("{}", statement.sql);
        println!("-- {} parameter(s)", statement.params.len());
        if config.get.is_none() && !config.terms.is_empty() {
            let compiled = resolver.compiler().compile(&schema, &config.term_set())?;
            println!("-- strategy: {}", resolver.compiler().strategy());
            println!("-- predicate: {}", serde_json::to_string(&compiled.predicate)?);
        }
        return Ok(());
    }

    let records = match config.lookup_id() {
        Some(id) => vec![resolver.resolve_single(&schema, &id).await?],
        None => resolver.resolve_multiple(&schema, &config.list_query()).await?,
    };

    print_records(&records)?;
    Ok(())
}

/// Writes one JSON object per line to stdout.
fn print_records(records: &[Record]) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in records {
        writeln!(out, "{}", serde_json::to_string(record)?)?;
    }
    Ok(())
}

/// Opens the SQLite database named by the configuration.
#[cfg(feature = "sqlite")]
fn create_sqlite_store(config: &CliConfig) -> StorageResult<Arc<dyn RecordStore>> {
    let path = config.sqlite_path();
    info!(database = %path, "Initializing SQLite backend");
    Ok(Arc::new(SqliteBackend::open(path)?))
}

/// Fallback when sqlite feature is not enabled.
#[cfg(not(feature = "sqlite"))]
fn create_sqlite_store(_config: &CliConfig) -> anyhow::Result<Arc<dyn RecordStore>> {
    anyhow::bail!(
        "The sqlite backend requires the 'sqlite' feature. \
         Build with: cargo build -p quarry-cli --features sqlite"
    )
}

/// Connects to the PostgreSQL database named by the configuration.
#[cfg(feature = "postgres")]
async fn create_postgres_store(config: &CliConfig) -> StorageResult<Arc<dyn RecordStore>> {
    use quarry_persistence::backends::postgres::PostgresBackend;

    let backend = match config.database_url.as_deref() {
        Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {
            info!("Initializing PostgreSQL backend from connection string");
            PostgresBackend::from_connection_string(url).await?
        }
        _ => {
            info!("Initializing PostgreSQL backend from environment variables");
            PostgresBackend::from_env().await?
        }
    };
    Ok(Arc::new(backend))
}

/// Fallback when postgres feature is not enabled.
#[cfg(not(feature = "postgres"))]
async fn create_postgres_store(_config: &CliConfig) -> anyhow::Result<Arc<dyn RecordStore>> {
    anyhow::bail!(
        "The postgres backend requires the 'postgres' feature. \
         Build with: cargo build -p quarry-cli --features postgres"
    )
}
