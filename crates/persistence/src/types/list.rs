//! List requests.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::QueryError;
use crate::search::{SearchConfig, TermSet};

use super::record::RecordId;

/// Arguments of a multi-record request.
///
/// ```
/// use quarry_persistence::search::TermSet;
/// use quarry_persistence::types::ListQuery;
///
/// let query = ListQuery::new()
///     .limit(5)
///     .search(TermSet::new().with("name", "man"));
/// assert_eq!(query.limit, Some(5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Restrict to these primary keys.
    #[serde(default)]
    pub ids: Option<Vec<RecordId>>,

    /// Page size; the configured default when unset.
    #[serde(default)]
    pub limit: Option<i64>,

    /// Rows to skip; 0 when unset.
    #[serde(default)]
    pub offset: Option<i64>,

    /// Search terms.
    #[serde(default)]
    pub query: Option<TermSet>,
}

impl ListQuery {
    /// Creates an empty request: first page, no ids, no search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the request to `ids`.
    pub fn ids<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RecordId>,
    {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the page size.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the number of rows to skip.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the search terms.
    pub fn search(mut self, terms: TermSet) -> Self {
        self.query = Some(terms);
        self
    }

    /// Resolves limit and offset against `config`.
    ///
    /// Negative values are rejected; limits above the configured maximum are
    /// clamped.
    pub fn page(&self, config: &SearchConfig) -> Result<Page, QueryError> {
        let max_limit = i64::from(config.max_limit);
        let limit = match self.limit {
            None => i64::from(config.default_limit),
            Some(limit) if limit < 0 => {
                return Err(QueryError::InvalidPaging {
                    argument: "limit".to_string(),
                    value: limit,
                });
            }
            Some(limit) if limit > max_limit => {
                warn!(requested = limit, max = max_limit, "Clamping list limit");
                max_limit
            }
            Some(limit) => limit,
        };

        let offset = match self.offset {
            None => 0,
            Some(offset) if offset < 0 => {
                return Err(QueryError::InvalidPaging {
                    argument: "offset".to_string(),
                    value: offset,
                });
            }
            Some(offset) => offset,
        };

        Ok(Page { limit, offset })
    }
}

/// Resolved paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Page size.
    pub limit: i64,
    /// Rows to skip.
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = ListQuery::new().page(&SearchConfig::default()).unwrap();
        assert_eq!(page, Page { limit: 10, offset: 0 });
    }

    #[test]
    fn test_limit_is_clamped() {
        let config = SearchConfig {
            max_limit: 50,
            ..Default::default()
        };
        let page = ListQuery::new().limit(500).offset(20).page(&config).unwrap();
        assert_eq!(page, Page { limit: 50, offset: 20 });
    }

    #[test]
    fn test_zero_limit_is_allowed() {
        let page = ListQuery::new().limit(0).page(&SearchConfig::default()).unwrap();
        assert_eq!(page.limit, 0);
    }

    #[test]
    fn test_negative_values_rejected() {
        let config = SearchConfig::default();
        assert_eq!(
            ListQuery::new().limit(-1).page(&config),
            Err(QueryError::InvalidPaging {
                argument: "limit".to_string(),
                value: -1,
            })
        );
        assert!(ListQuery::new().offset(-5).page(&config).is_err());
    }

    #[test]
    fn test_deserialize_request() {
        let query: ListQuery = serde_json::from_str(
            r#"{"ids": [1, 2], "limit": 3, "query": {"name": "man", "hometown": null}}"#,
        )
        .unwrap();
        assert_eq!(query.ids.as_ref().map(Vec::len), Some(2));
        assert_eq!(query.offset, None);
        assert_eq!(query.query.unwrap().term("name"), Some("man"));
    }
}
