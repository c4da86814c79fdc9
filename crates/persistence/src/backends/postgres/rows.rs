//! Row mapping for PostgreSQL.

use serde_json::{Map, Number, Value};
use tokio_postgres::Row;
use tokio_postgres::types::Type;

use crate::schema::{ColumnType, RecordSchema};
use crate::types::Record;

/// Maps a row selecting the schema's columns in declaration order.
///
/// Integer and float columns are read at the width the table declares, so
/// tables created outside this crate (`INTEGER`, `REAL`) map as well.
pub(crate) fn row_to_record(
    row: &Row,
    schema: &RecordSchema,
) -> Result<Record, tokio_postgres::Error> {
    let mut values = Map::new();
    for (idx, column) in schema.columns().iter().enumerate() {
        let ty = row.columns()[idx].type_();
        let value = match column.column_type {
            ColumnType::Text => row
                .try_get::<_, Option<String>>(idx)?
                .map_or(Value::Null, Value::String),
            ColumnType::Integer => {
                let value = if *ty == Type::INT2 {
                    row.try_get::<_, Option<i16>>(idx)?.map(i64::from)
                } else if *ty == Type::INT4 {
                    row.try_get::<_, Option<i32>>(idx)?.map(i64::from)
                } else {
                    row.try_get::<_, Option<i64>>(idx)?
                };
                value.map_or(Value::Null, |i| Value::Number(i.into()))
            }
            ColumnType::Float => {
                let value = if *ty == Type::FLOAT4 {
                    row.try_get::<_, Option<f32>>(idx)?.map(f64::from)
                } else {
                    row.try_get::<_, Option<f64>>(idx)?
                };
                value
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
            ColumnType::Boolean => row
                .try_get::<_, Option<bool>>(idx)?
                .map_or(Value::Null, Value::Bool),
        };
        values.insert(column.name.clone(), value);
    }
    Ok(Record::from(values))
}
