//! Backend identification and capabilities.
//!
//! A backend advertises what it can do through [`BackendCapability`] values.
//! The search compiler only looks at the reduced [`SearchCapabilities`] view
//! when it decides between strategies.

use serde::{Deserialize, Serialize};

use crate::search::SqlDialect;

/// Identifies the type of database backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// SQLite database (file-based or in-memory).
    Sqlite,
    /// PostgreSQL database.
    Postgres,
}

impl BackendKind {
    /// The SQL dialect spoken by this backend.
    pub fn dialect(&self) -> SqlDialect {
        match self {
            BackendKind::Sqlite => SqlDialect::Sqlite,
            BackendKind::Postgres => SqlDialect::Postgres,
        }
    }

    /// Capabilities a stock installation of this backend provides.
    pub fn default_capabilities(&self) -> Vec<BackendCapability> {
        match self {
            BackendKind::Sqlite => Vec::new(),
            BackendKind::Postgres => vec![
                BackendCapability::FullTextSearch,
                BackendCapability::SubstringPosition,
            ],
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Sqlite => write!(f, "sqlite"),
            BackendKind::Postgres => write!(f, "postgres"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(BackendKind::Sqlite),
            "postgres" | "postgresql" => Ok(BackendKind::Postgres),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}

/// Optional capabilities a backend may support beyond case-insensitive
/// substring matching, which every backend provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendCapability {
    /// Text-search vector and query primitives (`to_tsvector`, `to_tsquery`, `@@`).
    FullTextSearch,
    /// A substring-position function (`POSITION(.. IN ..)`).
    SubstringPosition,
}

impl std::fmt::Display for BackendCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BackendCapability::FullTextSearch => "full-text-search",
            BackendCapability::SubstringPosition => "substring-position",
        };
        write!(f, "{}", name)
    }
}

/// The text-search primitives a backend exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchCapabilities {
    /// Text-search vector/query functions and the match operator.
    pub text_search: bool,
    /// A function returning the position of a substring.
    pub substring_position: bool,
}

impl SearchCapabilities {
    /// No text-search primitives.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every primitive the prefix strategy needs.
    pub fn full() -> Self {
        Self {
            text_search: true,
            substring_position: true,
        }
    }

    /// Derives the search view of a backend's capability list.
    pub fn from_capabilities(capabilities: &[BackendCapability]) -> Self {
        Self {
            text_search: capabilities.contains(&BackendCapability::FullTextSearch),
            substring_position: capabilities.contains(&BackendCapability::SubstringPosition),
        }
    }

    /// Search capabilities of a stock installation of `kind`.
    pub fn for_backend(kind: BackendKind) -> Self {
        Self::from_capabilities(&kind.default_capabilities())
    }

    /// Returns true if both primitives are present.
    pub fn is_full(&self) -> bool {
        self.text_search && self.substring_position
    }
}
