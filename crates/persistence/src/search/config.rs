//! Search configuration.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::strategy::StrategyMode;

static REGCONFIG_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*\.)?[A-Za-z_][A-Za-z0-9_]*$")
        .expect("regconfig pattern is valid")
});

/// Deployment-wide search settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Requested matching strategy.
    #[serde(default)]
    pub strategy: StrategyMode,

    /// Text-search configuration name (e.g. `english`, `simple`) passed to
    /// `to_tsvector`/`to_tsquery`. The server default is used when unset.
    #[serde(default)]
    pub text_search_config: Option<String>,

    /// Page size when a list request gives no limit.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Largest page size; larger requests are clamped.
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

fn default_limit() -> u32 {
    10
}

fn default_max_limit() -> u32 {
    1000
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyMode::default(),
            text_search_config: None,
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl SearchConfig {
    /// Sets the strategy mode.
    pub fn with_strategy(mut self, strategy: StrategyMode) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the text-search configuration name.
    pub fn with_text_search_config(mut self, config: impl Into<String>) -> Self {
        self.text_search_config = Some(config.into());
        self
    }

    /// Validates the configuration, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.default_limit == 0 {
            problems.push("default limit cannot be 0".to_string());
        }

        if self.max_limit == 0 {
            problems.push("max limit cannot be 0".to_string());
        }

        if self.default_limit > self.max_limit {
            problems.push("default limit cannot exceed max limit".to_string());
        }

        if let Some(name) = &self.text_search_config {
            if !REGCONFIG_NAME.is_match(name) {
                problems.push(format!("invalid text search config '{}'", name));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { problems })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.strategy, StrategyMode::Auto);
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.max_limit, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"strategy": "generic", "max_limit": 50}"#).unwrap();
        assert_eq!(config.strategy, StrategyMode::Generic);
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.max_limit, 50);
    }

    #[test]
    fn test_validate_reports_all_problems() {
        let config = SearchConfig {
            default_limit: 0,
            max_limit: 0,
            text_search_config: Some("english; drop".to_string()),
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::Invalid { problems }) => assert_eq!(problems.len(), 3),
            other => panic!("expected invalid config, got {:?}", other),
        }
    }

    #[test]
    fn test_qualified_regconfig_is_valid() {
        let config = SearchConfig::default().with_text_search_config("pg_catalog.english");
        assert!(config.validate().is_ok());
    }
}
