//! The record store abstraction.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::schema::{RecordSchema, create_table_sql, insert_sql};
use crate::search::{SqlDialect, SqlFragment};
use crate::types::Record;

use super::backend::{BackendCapability, BackendKind, SearchCapabilities};

/// A database that can execute compiled statements for record types.
///
/// Stores only run SQL; building statements is the job of the
/// [`RecordResolver`](crate::query::RecordResolver). Statements passed to
/// [`RecordStore::fetch`] must select the schema's columns in declaration
/// order.
///
/// # Example
///
/// ```ignore
/// use quarry_persistence::core::{BackendCapability, RecordStore};
///
/// if store.supports(BackendCapability::FullTextSearch) {
///     // Prefix search with ranking is available
/// }
/// ```
#[async_trait]
pub trait RecordStore: Send + Sync + Debug {
    /// Returns the kind of backend.
    fn kind(&self) -> BackendKind;

    /// Returns a human-readable name for this backend.
    fn name(&self) -> &'static str;

    /// Returns all capabilities supported by this backend.
    fn capabilities(&self) -> Vec<BackendCapability>;

    /// Checks if this backend supports the given capability.
    fn supports(&self, capability: BackendCapability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// The text-search view of [`RecordStore::capabilities`].
    fn search_capabilities(&self) -> SearchCapabilities {
        SearchCapabilities::from_capabilities(&self.capabilities())
    }

    /// The SQL dialect this store executes.
    fn dialect(&self) -> SqlDialect {
        self.kind().dialect()
    }

    /// Runs a query and maps each row to a [`Record`] of `schema`.
    async fn fetch(&self, schema: &RecordSchema, statement: &SqlFragment)
    -> StorageResult<Vec<Record>>;

    /// Runs a statement and returns the number of affected rows.
    async fn execute(&self, statement: &SqlFragment) -> StorageResult<u64>;

    /// Creates the table of `schema` if it does not exist.
    async fn ensure_table(&self, schema: &RecordSchema) -> StorageResult<()> {
        let statement = SqlFragment::new(create_table_sql(schema, self.dialect()));
        self.execute(&statement).await?;
        Ok(())
    }

    /// Inserts one record.
    async fn insert(&self, schema: &RecordSchema, record: &Record) -> StorageResult<()> {
        let statement = insert_sql(schema, record, self.dialect())?;
        self.execute(&statement).await?;
        Ok(())
    }
}
