//! Command-line configuration for the `quarry` binary.
//!
//! Every option can also be set through an environment variable.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QUARRY_SCHEMA` | | Record schema file (JSON) |
//! | `QUARRY_BACKEND` | sqlite | Database backend (sqlite, postgres) |
//! | `QUARRY_DATABASE_URL` | quarry.db | SQLite path or PostgreSQL URL (else `QUARRY_PG_*`) |
//! | `QUARRY_SEARCH_STRATEGY` | auto | auto, generic or full-text-prefix |
//! | `QUARRY_TEXT_SEARCH_CONFIG` | | PostgreSQL text search configuration |
//! | `QUARRY_DEFAULT_LIMIT` | 10 | Page size when `--limit` is absent |
//! | `QUARRY_MAX_LIMIT` | 1000 | Largest page size served |
//! | `QUARRY_LOG_LEVEL` | info | Log level |

use std::path::PathBuf;

use clap::Parser;
use quarry_persistence::core::BackendKind;
use quarry_persistence::search::{SearchConfig, StrategyMode, TermSet};
use quarry_persistence::types::{ListQuery, RecordId};

/// Configuration for one `quarry` invocation.
#[derive(Debug, Clone, Parser)]
#[command(name = "quarry")]
#[command(about = "List and search records in a relational database")]
pub struct CliConfig {
    /// Record schema file (JSON).
    #[arg(long, env = "QUARRY_SCHEMA")]
    pub schema: PathBuf,

    /// Database backend (sqlite, postgres).
    #[arg(long, env = "QUARRY_BACKEND", default_value = "sqlite")]
    pub backend: BackendKind,

    /// SQLite database path or PostgreSQL connection string.
    #[arg(long, env = "QUARRY_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Search strategy (auto, generic, full-text-prefix).
    #[arg(long, env = "QUARRY_SEARCH_STRATEGY", default_value = "auto")]
    pub strategy: StrategyMode,

    /// PostgreSQL text search configuration used for prefix search.
    #[arg(long, env = "QUARRY_TEXT_SEARCH_CONFIG")]
    pub text_search_config: Option<String>,

    /// Page size when `--limit` is not given.
    #[arg(long, env = "QUARRY_DEFAULT_LIMIT", default_value = "10")]
    pub default_limit: u32,

    /// Largest page size served; larger limits are clamped.
    #[arg(long, env = "QUARRY_MAX_LIMIT", default_value = "1000")]
    pub max_limit: u32,

    /// Search term as `field=value` (repeatable).
    #[arg(long = "term", value_parser = parse_term)]
    pub terms: Vec<(String, String)>,

    /// Restrict the listing to these ids (repeatable).
    #[arg(long = "id")]
    pub ids: Vec<String>,

    /// Look up a single record by id instead of listing.
    #[arg(long, conflicts_with_all = ["terms", "ids", "limit", "offset"])]
    pub get: Option<String>,

    /// Page size.
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Rows to skip.
    #[arg(long, allow_negative_numbers = true)]
    pub offset: Option<i64>,

    /// JSON array of records to insert before the query runs.
    #[arg(long)]
    pub seed: Option<PathBuf>,

    /// Print the SQL that would run instead of running it.
    #[arg(long)]
    pub explain: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "QUARRY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            schema: PathBuf::from("schema.json"),
            backend: BackendKind::Sqlite,
            database_url: None,
            strategy: StrategyMode::Auto,
            text_search_config: None,
            default_limit: 10,
            max_limit: 1000,
            terms: Vec::new(),
            ids: Vec::new(),
            get: None,
            limit: None,
            offset: None,
            seed: None,
            explain: false,
            log_level: "info".to_string(),
        }
    }
}

/// Parses a `field=value` search term.
fn parse_term(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field.to_string(), value.to_string())),
        _ => Err(format!("expected field=value, got '{}'", s)),
    }
}

impl CliConfig {
    /// Validates the configuration.
    ///
    /// Returns every problem found so they can be reported together.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(quarry_persistence::error::ConfigError::Invalid { problems }) =
            self.search_config().validate()
        {
            errors.extend(problems);
        }

        if self.log_level.parse::<tracing::Level>().is_err() {
            errors.push(format!("Unknown log level '{}'", self.log_level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The search configuration for the resolver.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            strategy: self.strategy,
            text_search_config: self.text_search_config.clone(),
            default_limit: self.default_limit,
            max_limit: self.max_limit,
        }
    }

    /// The SQLite database path.
    pub fn sqlite_path(&self) -> &str {
        self.database_url.as_deref().unwrap_or("quarry.db")
    }

    /// The search terms given on the command line.
    pub fn term_set(&self) -> TermSet {
        self.terms.iter().cloned().collect()
    }

    /// The list request described by the command line.
    pub fn list_query(&self) -> ListQuery {
        let mut query = ListQuery::new();
        if !self.ids.is_empty() {
            query = query.ids(self.ids.iter().cloned());
        }
        if !self.terms.is_empty() {
            query = query.search(self.term_set());
        }
        if let Some(limit) = self.limit {
            query = query.limit(limit);
        }
        if let Some(offset) = self.offset {
            query = query.offset(offset);
        }
        query
    }

    /// The id to look up, if this is a single-record request.
    pub fn lookup_id(&self) -> Option<RecordId> {
        self.get.clone().map(RecordId::from)
    }
}
