//! Error types for the persistence layer.
//!
//! Errors are grouped by where they originate: schema declaration, search
//! compilation, list-query assembly, configuration and the database backend.
//! [`StorageError`] wraps all of them so callers can use a single result type.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all persistence operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Record schema declaration errors
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Search compilation errors
    #[error(transparent)]
    Search(#[from] SearchError),

    /// List/lookup request errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors raised while declaring a record schema.
///
/// These surface at schema-definition time so that misconfigured record types
/// never reach the request path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A table, column or record name is not a plain SQL identifier.
    #[error("invalid identifier '{identifier}': expected [A-Za-z_][A-Za-z0-9_]*")]
    InvalidIdentifier { identifier: String },

    /// The same column was declared twice.
    #[error("duplicate column '{column}' on record {record}")]
    DuplicateColumn { record: String, column: String },

    /// The primary key does not name a declared column.
    #[error("primary key '{column}' is not a column of record {record}")]
    UnknownPrimaryKey { record: String, column: String },

    /// A searchable field does not name a declared column.
    #[error("searchable field '{field}' is not a column of record {record}")]
    UnknownSearchField { record: String, field: String },

    /// A searchable field is declared on a non-textual column.
    #[error("searchable field '{field}' on record {record} must be a text column, found {column_type}")]
    NonTextualSearchField {
        record: String,
        field: String,
        column_type: String,
    },

    /// The same searchable field was declared twice.
    #[error("searchable field '{field}' declared more than once")]
    DuplicateSearchField { field: String },

    /// Searchable fields were declared on a record that cannot be listed without ids.
    #[error("record {record} declares searchable fields but does not allow unfiltered fetch")]
    SearchRequiresUnfilteredFetch { record: String },

    /// The record declares no columns.
    #[error("record {record} declares no columns")]
    NoColumns { record: String },
}

/// Errors related to search compilation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A term names a field that is not in the record's searchable field set.
    #[error("field '{field}' is not searchable on {record}")]
    InvalidSearchField { record: String, field: String },

    /// The requested strategy needs primitives the backend does not provide.
    #[error("search strategy '{strategy}' is not supported by backend {backend}")]
    UnsupportedStrategy { strategy: String, backend: String },
}

/// Errors raised while assembling or answering a list/lookup request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The record type requires explicit ids to be listed.
    #[error("record {record} cannot be fetched without ids")]
    UnfilteredFetchNotAllowed { record: String },

    /// A paging argument is out of range.
    #[error("invalid {argument}: {value}")]
    InvalidPaging { argument: String, value: i64 },

    /// No record exists with the given id.
    #[error("{record} not found: {id}")]
    NotFound { record: String, id: String },

    /// A query modifier refused the request.
    #[error("query rejected for {record}: {reason}")]
    Rejected { record: String, reason: String },

    /// A value names a column the record does not declare.
    #[error("{record} has no column '{column}'")]
    UnknownColumn { record: String, column: String },

    /// A value does not fit the declared column type.
    #[error("column '{column}' of {record} expects {expected}")]
    TypeMismatch {
        record: String,
        column: String,
        expected: String,
    },
}

/// Configuration errors, reported once at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more settings are invalid.
    #[error("invalid configuration: {}", problems.join("; "))]
    Invalid { problems: Vec<String> },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Connection pool exhausted.
    #[error("connection pool exhausted for {backend_name}")]
    PoolExhausted { backend_name: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for persistence operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for search compilation.
pub type SearchResult<T> = Result<T, SearchError>;

impl StorageError {
    /// Returns true if the error was caused by the caller's request rather
    /// than by configuration or the backend.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            StorageError::Search(SearchError::InvalidSearchField { .. })
                | StorageError::Query(_)
        )
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for StorageError {
    fn from(_err: r2d2::Error) -> Self {
        StorageError::Backend(BackendError::PoolExhausted {
            backend_name: "sqlite".to_string(),
        })
    }
}

#[cfg(feature = "postgres")]
impl From<tokio_postgres::Error> for StorageError {
    fn from(err: tokio_postgres::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "postgres".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}
