//! Record schema declarations.
//!
//! A [`RecordSchema`] describes one record type: the table it lives in, its
//! typed columns, its primary key and its [`SearchOptions`]. Schemas are
//! validated once when they are built, so that errors such as a searchable
//! field on a numeric column surface at definition time rather than on the
//! first request.
//!
//! # Example
//!
//! ```
//! use quarry_persistence::schema::{ColumnType, RecordSchema};
//!
//! let heroes = RecordSchema::builder("Hero")
//!     .table("heroes")
//!     .column("id", ColumnType::Integer)
//!     .column("name", ColumnType::Text)
//!     .column("hometown", ColumnType::Text)
//!     .searchable(["name", "hometown"])
//!     .allow_unfiltered_fetch(true)
//!     .build()
//!     .unwrap();
//!
//! assert!(heroes.is_searchable());
//! ```

mod ddl;
mod fields;

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

pub use ddl::{column_param, create_table_sql, insert_sql};
pub use fields::{SearchableFieldSet, TermSetBuilder};

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

/// Checks that `name` is a plain SQL identifier.
pub(crate) fn validate_identifier(name: &str) -> Result<(), SchemaError> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(SchemaError::InvalidIdentifier {
            identifier: name.to_string(),
        })
    }
}

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Text (TEXT).
    Text,
    /// 64-bit integer (INTEGER on SQLite, BIGINT on PostgreSQL).
    Integer,
    /// Double precision float.
    Float,
    /// Boolean.
    Boolean,
}

impl ColumnType {
    /// Returns true for column types that text search can operate on.
    pub fn is_textual(&self) -> bool {
        matches!(self, ColumnType::Text)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Text => write!(f, "text"),
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Boolean => write!(f, "boolean"),
        }
    }
}

/// A typed column of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Column storage type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

/// Search-related options of a record type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Fields exposed to text search, in ranking order.
    #[serde(default)]
    pub searchable_fields: Vec<String>,
    /// Whether the record can be listed without explicit ids.
    ///
    /// Searching is a form of listing, so declaring searchable fields
    /// requires this to be set.
    #[serde(default)]
    pub allow_unfiltered_fetch: bool,
}

/// Serialized form of a record schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordSchemaDef {
    name: String,
    #[serde(default)]
    table: Option<String>,
    #[serde(default = "default_primary_key")]
    primary_key: String,
    columns: Vec<ColumnDef>,
    #[serde(default)]
    search: SearchOptions,
}

fn default_primary_key() -> String {
    "id".to_string()
}

/// A validated record type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordSchemaDef", into = "RecordSchemaDef")]
pub struct RecordSchema {
    name: String,
    table: String,
    primary_key: String,
    columns: Vec<ColumnDef>,
    search: SearchOptions,
    searchable: SearchableFieldSet,
}

impl RecordSchema {
    /// Starts declaring a record type.
    pub fn builder(name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder::new(name)
    }

    /// The record type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The backing table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The primary key column.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// The declared columns, in declaration order.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The primary key column definition.
    pub fn primary_key_column(&self) -> &ColumnDef {
        // Validated at build time.
        self.column(&self.primary_key)
            .unwrap_or_else(|| &self.columns[0])
    }

    /// The search options this schema was declared with.
    pub fn search_options(&self) -> &SearchOptions {
        &self.search
    }

    /// The searchable fields.
    pub fn searchable_fields(&self) -> &SearchableFieldSet {
        &self.searchable
    }

    /// Returns true if the record declares at least one searchable field.
    pub fn is_searchable(&self) -> bool {
        !self.searchable.is_empty()
    }

    /// Returns true if the record can be listed without ids.
    pub fn allows_unfiltered_fetch(&self) -> bool {
        self.search.allow_unfiltered_fetch
    }

    fn from_def(def: RecordSchemaDef) -> Result<Self, SchemaError> {
        let RecordSchemaDef {
            name,
            table,
            primary_key,
            columns,
            search,
        } = def;

        validate_identifier(&name)?;
        let table = table.unwrap_or_else(|| name.to_lowercase());
        validate_identifier(&table)?;

        if columns.is_empty() {
            return Err(SchemaError::NoColumns { record: name });
        }

        let mut seen = HashSet::new();
        for column in &columns {
            validate_identifier(&column.name)?;
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    record: name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        if !seen.contains(primary_key.as_str()) {
            return Err(SchemaError::UnknownPrimaryKey {
                record: name,
                column: primary_key,
            });
        }

        let searchable = SearchableFieldSet::new(&name, search.searchable_fields.iter().cloned())?;
        for field in searchable.iter() {
            let column = columns.iter().find(|c| c.name == field).ok_or_else(|| {
                SchemaError::UnknownSearchField {
                    record: name.clone(),
                    field: field.to_string(),
                }
            })?;
            if !column.column_type.is_textual() {
                return Err(SchemaError::NonTextualSearchField {
                    record: name.clone(),
                    field: field.to_string(),
                    column_type: column.column_type.to_string(),
                });
            }
        }

        if !searchable.is_empty() && !search.allow_unfiltered_fetch {
            return Err(SchemaError::SearchRequiresUnfilteredFetch { record: name });
        }

        Ok(Self {
            name,
            table,
            primary_key,
            columns,
            search,
            searchable,
        })
    }
}

impl TryFrom<RecordSchemaDef> for RecordSchema {
    type Error = SchemaError;

    fn try_from(def: RecordSchemaDef) -> Result<Self, Self::Error> {
        Self::from_def(def)
    }
}

impl From<RecordSchema> for RecordSchemaDef {
    fn from(schema: RecordSchema) -> Self {
        Self {
            name: schema.name,
            table: Some(schema.table),
            primary_key: schema.primary_key,
            columns: schema.columns,
            search: schema.search,
        }
    }
}

/// Builder for [`RecordSchema`].
#[derive(Debug, Clone)]
pub struct RecordSchemaBuilder {
    def: RecordSchemaDef,
}

impl RecordSchemaBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            def: RecordSchemaDef {
                name: name.into(),
                table: None,
                primary_key: default_primary_key(),
                columns: Vec::new(),
                search: SearchOptions::default(),
            },
        }
    }

    /// Sets the backing table (defaults to the lowercased record name).
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.def.table = Some(table.into());
        self
    }

    /// Sets the primary key column (defaults to `id`).
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.def.primary_key = column.into();
        self
    }

    /// Adds a column.
    pub fn column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.def.columns.push(ColumnDef {
            name: name.into(),
            column_type,
        });
        self
    }

    /// Declares the searchable fields.
    pub fn searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.def.search.searchable_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Allows listing without ids.
    pub fn allow_unfiltered_fetch(mut self, allow: bool) -> Self {
        self.def.search.allow_unfiltered_fetch = allow;
        self
    }

    /// Validates and builds the schema.
    pub fn build(self) -> Result<RecordSchema, SchemaError> {
        RecordSchema::from_def(self.def)
    }
}
