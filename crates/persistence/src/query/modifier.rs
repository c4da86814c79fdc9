//! Hooks that adjust list and lookup queries before execution.

use std::fmt::Debug;

use serde_json::Value;

use crate::error::QueryError;
use crate::schema::{RecordSchema, column_param};

use super::select::{Filter, SelectQuery};

/// Adjusts a [`SelectQuery`] before it runs.
///
/// Modifiers see every list and single-record query of every record type.
/// They can narrow the query (for example to the caller's rows) or refuse it
/// with [`QueryError::Rejected`].
pub trait QueryModifier: Send + Sync + Debug {
    /// Modifies `query` for `schema`.
    fn modify(&self, schema: &RecordSchema, query: &mut SelectQuery) -> Result<(), QueryError>;
}

/// Leaves queries untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopModifier;

impl QueryModifier for NoopModifier {
    fn modify(&self, _schema: &RecordSchema, _query: &mut SelectQuery) -> Result<(), QueryError> {
        Ok(())
    }
}

/// Restricts every record type that has `column` to rows where it equals `value`.
///
/// Record types without the column are rejected unless the scope is lenient.
#[derive(Debug, Clone)]
pub struct ColumnScope {
    column: String,
    value: Value,
    lenient: bool,
}

impl ColumnScope {
    /// Scopes queries to `column = value`.
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
            lenient: false,
        }
    }

    /// Lets record types without the column through unscoped.
    pub fn lenient(mut self) -> Self {
        self.lenient = true;
        self
    }
}

impl QueryModifier for ColumnScope {
    fn modify(&self, schema: &RecordSchema, query: &mut SelectQuery) -> Result<(), QueryError> {
        if schema.column(&self.column).is_none() {
            if self.lenient {
                return Ok(());
            }
            return Err(QueryError::Rejected {
                record: schema.name().to_string(),
                reason: format!("not scoped by '{}'", self.column),
            });
        }

        let value = column_param(schema, &self.column, &self.value)?;
        query.push_filter(Filter::ColumnEquals {
            column: self.column.clone(),
            value,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;
    use crate::search::SqlParam;

    fn schema(with_team: bool) -> RecordSchema {
        let mut builder = RecordSchema::builder("Hero")
            .column("id", ColumnType::Integer)
            .column("name", ColumnType::Text);
        if with_team {
            builder = builder.column("team", ColumnType::Text);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_scope_adds_filter() {
        let schema = schema(true);
        let mut query = SelectQuery::for_schema(&schema);
        ColumnScope::new("team", "justice")
            .modify(&schema, &mut query)
            .unwrap();
        assert_eq!(
            query.filters(),
            &[Filter::ColumnEquals {
                column: "team".to_string(),
                value: SqlParam::text("justice"),
            }]
        );
    }

    #[test]
    fn test_scope_rejects_unscoped_record() {
        let schema = schema(false);
        let mut query = SelectQuery::for_schema(&schema);
        let err = ColumnScope::new("team", "justice")
            .modify(&schema, &mut query)
            .unwrap_err();
        assert!(matches!(err, QueryError::Rejected { .. }));
    }

    #[test]
    fn test_lenient_scope_skips_unscoped_record() {
        let schema = schema(false);
        let mut query = SelectQuery::for_schema(&schema);
        ColumnScope::new("team", "justice")
            .lenient()
            .modify(&schema, &mut query)
            .unwrap();
        assert!(query.filters().is_empty());
    }

    #[test]
    fn test_scope_value_is_type_checked() {
        let schema = schema(true);
        let mut query = SelectQuery::for_schema(&schema);
        let err = ColumnScope::new("team", 7)
            .modify(&schema, &mut query)
            .unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { .. }));
    }
}
