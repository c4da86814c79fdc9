//! Parameterized SQL fragments and dialect helpers.
//!
//! Every user-supplied value reaches the database as a bound parameter. The
//! [`SqlWriter`] hands out placeholders in the syntax of the target
//! [`SqlDialect`] and collects the values in placeholder order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar function every SQLite connection registers to lower-case text
/// with full Unicode case mapping.
pub const SQLITE_CASEFOLD: &str = "casefold";

/// The SQL flavour a fragment is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    /// SQLite: `?N` placeholders, `LIKE` over [`SQLITE_CASEFOLD`]ed operands.
    Sqlite,
    /// PostgreSQL: `$N` placeholders, `ILIKE`, text-search functions.
    Postgres,
}

impl SqlDialect {
    /// Returns the placeholder for the 1-based parameter `index`.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            SqlDialect::Sqlite => format!("?{}", index),
            SqlDialect::Postgres => format!("${}", index),
        }
    }

    /// Quotes an identifier.
    pub fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Renders a case-insensitive match of `column` against `pattern` with
    /// `\` as the escape character.
    ///
    /// SQLite's own `LIKE` folds ASCII only, so both operands go through the
    /// Unicode-aware [`SQLITE_CASEFOLD`] function first.
    pub fn case_insensitive_like(&self, column: &str, pattern: &str) -> String {
        match self {
            SqlDialect::Sqlite => format!(
                "{f}({}) LIKE {f}({}) ESCAPE '\\'",
                column,
                pattern,
                f = SQLITE_CASEFOLD
            ),
            SqlDialect::Postgres => format!("{} ILIKE {} ESCAPE '\\'", column, pattern),
        }
    }

    /// Returns true if the dialect has text-search vector/query functions.
    pub fn supports_full_text(&self) -> bool {
        matches!(self, SqlDialect::Postgres)
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlDialect::Sqlite => write!(f, "sqlite"),
            SqlDialect::Postgres => write!(f, "postgres"),
        }
    }
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// Text parameter.
    Text(String),
    /// Integer parameter.
    Integer(i64),
    /// Float parameter.
    Float(f64),
    /// Boolean parameter.
    Bool(bool),
    /// Null parameter.
    Null,
}

impl SqlParam {
    /// Creates a text parameter.
    pub fn text(s: impl Into<String>) -> Self {
        SqlParam::Text(s.into())
    }

    /// Creates an integer parameter.
    pub fn integer(i: i64) -> Self {
        SqlParam::Integer(i)
    }

    /// Creates a float parameter.
    pub fn float(f: f64) -> Self {
        SqlParam::Float(f)
    }

    /// Returns the text value, if this is a text parameter.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlParam::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A fragment of SQL with bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    /// The SQL text.
    pub sql: String,
    /// Bound parameter values, in placeholder order.
    pub params: Vec<SqlParam>,
}

impl SqlFragment {
    /// Creates a fragment without parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a fragment with parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

impl fmt::Display for SqlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}

/// Collects bound parameters while a statement is rendered.
///
/// Placeholders are numbered in the order [`SqlWriter::bind`] is called, so
/// the pieces of one statement must be rendered in the order they appear in
/// the final SQL text.
#[derive(Debug, Clone)]
pub struct SqlWriter {
    dialect: SqlDialect,
    text_search_config: Option<String>,
    params: Vec<SqlParam>,
}

impl SqlWriter {
    /// Creates a writer for `dialect`.
    pub fn new(dialect: SqlDialect) -> Self {
        Self {
            dialect,
            text_search_config: None,
            params: Vec::new(),
        }
    }

    /// Sets the text-search configuration passed to `to_tsvector`/`to_tsquery`.
    pub fn with_text_search_config(mut self, config: Option<String>) -> Self {
        self.text_search_config = config;
        self
    }

    /// The target dialect.
    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// The text-search configuration, if any.
    pub fn text_search_config(&self) -> Option<&str> {
        self.text_search_config.as_deref()
    }

    /// Binds a parameter and returns its placeholder.
    pub fn bind(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        self.dialect.placeholder(self.params.len())
    }

    /// Quotes an identifier for the target dialect.
    pub fn ident(&self, name: &str) -> String {
        self.dialect.quote_identifier(name)
    }

    /// Number of parameters bound so far.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Finishes the statement.
    pub fn finish(self, sql: impl Into<String>) -> SqlFragment {
        SqlFragment::with_params(sql, self.params)
    }
}

/// Escapes LIKE wildcards so that `term` matches literally under `ESCAPE '\'`.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
