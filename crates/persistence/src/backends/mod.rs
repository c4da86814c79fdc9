//! Database backend implementations.
//!
//! Each backend implements [`RecordStore`](crate::core::RecordStore) and is
//! gated behind a feature flag.
//!
//! | Backend | Feature | Search strategy (auto) |
//! |---------|---------|------------------------|
//! | SQLite | `sqlite` | generic substring |
//! | PostgreSQL | `postgres` | full-text prefix with ranking |
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! use quarry_persistence::backends::sqlite::SqliteBackend;
//!
//! # #[cfg(feature = "sqlite")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an in-memory SQLite backend
//! let backend = SqliteBackend::in_memory()?;
//!
//! // Or use a file-based database
//! let backend = SqliteBackend::open("./data/heroes.db")?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;
