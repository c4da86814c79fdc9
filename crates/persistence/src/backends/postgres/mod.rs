//! PostgreSQL backend implementation.
//!
//! PostgreSQL exposes `to_tsvector`, `to_tsquery` and `POSITION`, so with the
//! default `auto` strategy records stored here are searched by lexeme prefix
//! and ranked by exact prefix and match position.
//!
//! # Example
//!
//! ```no_run
//! use quarry_persistence::backends::postgres::{PostgresBackend, PostgresConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = PostgresBackend::new(PostgresConfig::from_env()).await?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod rows;

pub use backend::{PostgresBackend, PostgresConfig, PostgresSslMode};
