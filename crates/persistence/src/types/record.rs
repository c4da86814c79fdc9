//! Records and record identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::ColumnType;
use crate::search::SqlParam;

/// A row of a record type, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: Map<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    /// Builder-style [`Record::set`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Returns a column value.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Returns a text column value.
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.values.get(column).and_then(Value::as_str)
    }

    /// Iterates over the columns present in the record.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of columns present.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no column is present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Converts the record into a JSON value.
    pub fn into_json(self) -> Value {
        Value::Object(self.values)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

/// A primary key value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Integer key.
    Integer(i64),
    /// Text key.
    Text(String),
}

impl RecordId {
    /// Converts the id to a parameter for a key column of `column_type`.
    ///
    /// Text ids that parse as integers are accepted for integer keys, which
    /// lets ids come from command lines and URLs.
    pub fn to_param(&self, column_type: ColumnType) -> Option<SqlParam> {
        match (self, column_type) {
            (RecordId::Integer(i), ColumnType::Integer) => Some(SqlParam::Integer(*i)),
            (RecordId::Integer(i), ColumnType::Text) => Some(SqlParam::Text(i.to_string())),
            (RecordId::Text(s), ColumnType::Text) => Some(SqlParam::Text(s.clone())),
            (RecordId::Text(s), ColumnType::Integer) => s.parse().ok().map(SqlParam::Integer),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Integer(i) => write!(f, "{}", i),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(i: i64) -> Self {
        RecordId::Integer(i)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_builder() {
        let record = Record::new().with("id", 1).with("name", "Superman");
        assert_eq!(record.get_str("name"), Some("Superman"));
        assert_eq!(record.get("id"), Some(&json!(1)));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_record_is_a_json_object() {
        let record: Record = serde_json::from_value(json!({"id": 7, "name": null})).unwrap();
        assert_eq!(record.get("name"), Some(&Value::Null));
        assert_eq!(record.into_json(), json!({"id": 7, "name": null}));
    }

    #[test]
    fn test_record_id_untagged() {
        let ids: Vec<RecordId> = serde_json::from_str(r#"[1, "abc"]"#).unwrap();
        assert_eq!(ids, vec![RecordId::Integer(1), RecordId::Text("abc".to_string())]);
    }

    #[test]
    fn test_record_id_to_param() {
        assert_eq!(
            RecordId::from("42").to_param(ColumnType::Integer),
            Some(SqlParam::Integer(42))
        );
        assert_eq!(RecordId::from("abc").to_param(ColumnType::Integer), None);
        assert_eq!(
            RecordId::from(5).to_param(ColumnType::Text),
            Some(SqlParam::Text("5".to_string()))
        );
        assert_eq!(RecordId::from(5).to_param(ColumnType::Boolean), None);
    }
}
