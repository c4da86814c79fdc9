//! Matching strategy selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{BackendKind, SearchCapabilities};
use crate::error::{SearchError, SearchResult};

/// How terms are matched against field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Case-insensitive substring match, available everywhere.
    Generic,
    /// Lexeme-prefix match with exact-prefix/position ranking.
    FullTextPrefix,
}

impl Strategy {
    /// Picks the best strategy the capabilities allow.
    ///
    /// Partially present full-text primitives count as absent.
    pub fn select(capabilities: SearchCapabilities) -> Strategy {
        if capabilities.is_full() {
            Strategy::FullTextPrefix
        } else {
            Strategy::Generic
        }
    }

    /// Returns true if this strategy produces a ranking.
    pub fn ranks(&self) -> bool {
        matches!(self, Strategy::FullTextPrefix)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Generic => write!(f, "generic"),
            Strategy::FullTextPrefix => write!(f, "full-text-prefix"),
        }
    }
}

/// The configured strategy request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyMode {
    /// Use [`Strategy::select`].
    #[default]
    Auto,
    /// Always use [`Strategy::Generic`].
    Generic,
    /// Require [`Strategy::FullTextPrefix`].
    FullTextPrefix,
}

impl StrategyMode {
    /// Resolves the mode against a backend's capabilities.
    ///
    /// Forcing the prefix strategy on a backend without the full-text
    /// primitives fails with [`SearchError::UnsupportedStrategy`].
    pub fn resolve(
        &self,
        capabilities: SearchCapabilities,
        backend: BackendKind,
    ) -> SearchResult<Strategy> {
        match self {
            StrategyMode::Auto => Ok(Strategy::select(capabilities)),
            StrategyMode::Generic => Ok(Strategy::Generic),
            StrategyMode::FullTextPrefix if capabilities.is_full() => Ok(Strategy::FullTextPrefix),
            StrategyMode::FullTextPrefix => Err(SearchError::UnsupportedStrategy {
                strategy: Strategy::FullTextPrefix.to_string(),
                backend: backend.to_string(),
            }),
        }
    }
}

impl fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyMode::Auto => write!(f, "auto"),
            StrategyMode::Generic => write!(f, "generic"),
            StrategyMode::FullTextPrefix => write!(f, "full-text-prefix"),
        }
    }
}

impl std::str::FromStr for StrategyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(StrategyMode::Auto),
            "generic" => Ok(StrategyMode::Generic),
            "full-text-prefix" => Ok(StrategyMode::FullTextPrefix),
            other => Err(format!(
                "unknown strategy '{}': expected auto, generic or full-text-prefix",
                other
            )),
        }
    }
}
