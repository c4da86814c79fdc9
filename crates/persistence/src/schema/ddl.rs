//! Table bootstrap and row insertion statements.

use serde_json::Value;

use crate::error::QueryError;
use crate::search::{SqlDialect, SqlFragment, SqlParam, SqlWriter};
use crate::types::Record;

use super::{ColumnType, RecordSchema};

fn sql_type(column_type: ColumnType, dialect: SqlDialect) -> &'static str {
    match (column_type, dialect) {
        (ColumnType::Text, _) => "TEXT",
        (ColumnType::Integer, SqlDialect::Sqlite) => "INTEGER",
        (ColumnType::Integer, SqlDialect::Postgres) => "BIGINT",
        (ColumnType::Float, SqlDialect::Sqlite) => "REAL",
        (ColumnType::Float, SqlDialect::Postgres) => "DOUBLE PRECISION",
        (ColumnType::Boolean, SqlDialect::Sqlite) => "INTEGER",
        (ColumnType::Boolean, SqlDialect::Postgres) => "BOOLEAN",
    }
}

/// Returns the `CREATE TABLE IF NOT EXISTS` statement for `schema`.
pub fn create_table_sql(schema: &RecordSchema, dialect: SqlDialect) -> String {
    let columns: Vec<String> = schema
        .columns()
        .iter()
        .map(|column| {
            let mut def = format!(
                "{} {}",
                dialect.quote_identifier(&column.name),
                sql_type(column.column_type, dialect)
            );
            if column.name == schema.primary_key() {
                def.push_str(" PRIMARY KEY");
            }
            def
        })
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        dialect.quote_identifier(schema.table()),
        columns.join(", ")
    )
}

/// Converts a JSON value into a parameter for `column`, checking its type.
pub fn column_param(
    schema: &RecordSchema,
    column: &str,
    value: &Value,
) -> Result<SqlParam, QueryError> {
    let def = schema
        .column(column)
        .ok_or_else(|| QueryError::UnknownColumn {
            record: schema.name().to_string(),
            column: column.to_string(),
        })?;

    let param = match (def.column_type, value) {
        (_, Value::Null) => Some(SqlParam::Null),
        (ColumnType::Text, Value::String(s)) => Some(SqlParam::Text(s.clone())),
        (ColumnType::Integer, Value::Number(n)) => n.as_i64().map(SqlParam::Integer),
        (ColumnType::Float, Value::Number(n)) => n.as_f64().map(SqlParam::Float),
        (ColumnType::Boolean, Value::Bool(b)) => Some(SqlParam::Bool(*b)),
        _ => None,
    };

    param.ok_or_else(|| QueryError::TypeMismatch {
        record: schema.name().to_string(),
        column: column.to_string(),
        expected: def.column_type.to_string(),
    })
}

/// Builds an `INSERT` for `record`.
///
/// Every key of the record must be a declared column. Columns that are
/// missing or null are left out and take their database default.
pub fn insert_sql(
    schema: &RecordSchema,
    record: &Record,
    dialect: SqlDialect,
) -> Result<SqlFragment, QueryError> {
    if let Some((column, _)) = record.iter().find(|(c, _)| schema.column(c).is_none()) {
        return Err(QueryError::UnknownColumn {
            record: schema.name().to_string(),
            column: column.to_string(),
        });
    }

    let table = dialect.quote_identifier(schema.table());
    let mut writer = SqlWriter::new(dialect);
    let mut names = Vec::new();
    let mut placeholders = Vec::new();

    for column in schema.columns() {
        if let Some(value) = record.get(&column.name).filter(|v| !v.is_null()) {
            let param = column_param(schema, &column.name, value)?;
            names.push(dialect.quote_identifier(&column.name));
            placeholders.push(writer.bind(param));
        }
    }

    let sql = if names.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES", table)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            names.join(", "),
            placeholders.join(", ")
        )
    };

    Ok(writer.finish(sql))
}
