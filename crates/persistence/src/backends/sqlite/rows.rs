//! Parameter binding and row mapping for SQLite.

use rusqlite::Row;
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqliteValue, ValueRef};
use serde_json::{Map, Number, Value};

use crate::schema::{ColumnType, RecordSchema};
use crate::search::SqlParam;
use crate::types::Record;

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlParam::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SqlParam::Integer(i) => ToSqlOutput::Owned(SqliteValue::Integer(*i)),
            SqlParam::Float(f) => ToSqlOutput::Owned(SqliteValue::Real(*f)),
            SqlParam::Bool(b) => ToSqlOutput::Owned(SqliteValue::Integer(i64::from(*b))),
            SqlParam::Null => ToSqlOutput::Owned(SqliteValue::Null),
        })
    }
}

/// Maps a row selecting the schema's columns in declaration order.
pub(crate) fn row_to_record(row: &Row<'_>, schema: &RecordSchema) -> rusqlite::Result<Record> {
    let mut values = Map::new();
    for (idx, column) in schema.columns().iter().enumerate() {
        let value = match column.column_type {
            ColumnType::Text => row
                .get::<_, Option<String>>(idx)?
                .map_or(Value::Null, Value::String),
            ColumnType::Integer => row
                .get::<_, Option<i64>>(idx)?
                .map_or(Value::Null, |i| Value::Number(i.into())),
            ColumnType::Float => row
                .get::<_, Option<f64>>(idx)?
                .and_then(Number::from_f64)
                .map_or(Value::Null, Value::Number),
            ColumnType::Boolean => row
                .get::<_, Option<bool>>(idx)?
                .map_or(Value::Null, Value::Bool),
        };
        values.insert(column.name.clone(), value);
    }
    Ok(Record::from(values))
}
