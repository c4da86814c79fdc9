//! SQLite backend implementation.
//!
//! Supports in-memory databases (great for testing) and file-based databases.
//! SQLite has no text-search vector functions, so records stored here are
//! always searched with the generic substring strategy. Each pooled
//! connection registers a Unicode `casefold` function so that `LIKE` matches
//! case-insensitively beyond ASCII.
//!
//! # Example
//!
//! ```no_run
//! use quarry_persistence::backends::sqlite::SqliteBackend;
//! use quarry_persistence::core::RecordStore;
//! use quarry_persistence::schema::{ColumnType, RecordSchema};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//!
//! let heroes = RecordSchema::builder("Hero")
//!     .column("id", ColumnType::Integer)
//!     .column("name", ColumnType::Text)
//!     .build()?;
//! backend.ensure_table(&heroes).await?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod rows;

pub use backend::{SqliteBackend, SqliteBackendConfig};
