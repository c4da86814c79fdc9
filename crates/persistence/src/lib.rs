//! Quarry Persistence Layer
//!
//! This crate sits between a typed API layer and a relational database. Record
//! types are declared as [`RecordSchema`](schema::RecordSchema)s; requests to
//! list or look up records are turned into parameterized SQL and run on a
//! [`RecordStore`](core::RecordStore).
//!
//! Record types can expose a set of text fields to *field-similarity search*:
//! callers pass a partial query (field to optional term) and get back the
//! records that approximately match, without a dedicated search engine.
//!
//! # Features
//!
//! - **Search strategies**: case-insensitive substring everywhere, lexeme-prefix
//!   matching with deterministic ranking where the backend has full-text search
//! - **Fail-fast configuration**: strategy and schema errors surface at startup
//! - **Query modifiers**: scope or reject queries before they run
//!
//! # Backend Features
//!
//! Enable backends with feature flags in `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! quarry-persistence = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! - `sqlite` (default) - SQLite with in-memory and file modes
//! - `postgres` - PostgreSQL with full-text prefix search
//!
//! # Architecture
//!
//! - [`schema`] - Record type declarations and table bootstrap
//! - [`search`] - Strategy selection, predicate and ranking compilation, SQL rendering
//! - [`query`] - SELECT assembly, query modifiers and the [`RecordResolver`](query::RecordResolver)
//! - [`types`] - Records, ids and list requests
//! - [`core`] - Backend kinds, capabilities and the store trait
//! - [`error`] - Error types for all operations
//! - [`backends`] - Backend implementations
//!
//! # Quick Start
//!
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//!
//! use quarry_persistence::backends::sqlite::SqliteBackend;
//! use quarry_persistence::core::RecordStore;
//! use quarry_persistence::query::RecordResolver;
//! use quarry_persistence::schema::{ColumnType, RecordSchema};
//! use quarry_persistence::search::{SearchConfig, TermSet};
//! use quarry_persistence::types::{ListQuery, Record};
//!
//! let heroes = RecordSchema::builder("Hero")
//!     .table("heroes")
//!     .column("id", ColumnType::Integer)
//!     .column("name", ColumnType::Text)
//!     .column("hometown", ColumnType::Text)
//!     .searchable(["name", "hometown"])
//!     .allow_unfiltered_fetch(true)
//!     .build()?;
//!
//! let store = Arc::new(SqliteBackend::in_memory()?);
//! store.ensure_table(&heroes).await?;
//! store
//!     .insert(&heroes, &Record::new().with("id", 1).with("name", "Superman"))
//!     .await?;
//!
//! let resolver = RecordResolver::new(store, SearchConfig::default())?;
//! let found = resolver
//!     .resolve_multiple(&heroes, &ListQuery::new().search(TermSet::new().with("name", "MAN")))
//!     .await?;
//! assert_eq!(found.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod query;
pub mod schema;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{StorageError, StorageResult};
pub use schema::RecordSchema;
pub use search::{SearchCompiler, SearchConfig, Strategy, StrategyMode, TermSet};
pub use types::{ListQuery, Record, RecordId};

// Re-export core traits
pub use core::{BackendKind, RecordStore, SearchCapabilities};
pub use query::{QueryModifier, RecordResolver};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
