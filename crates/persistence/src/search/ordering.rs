//! Search result ranking.
//!
//! Ranking only exists for [`Strategy::FullTextPrefix`](super::Strategy). The
//! compiled ordering has three keys:
//!
//! 1. exact-prefix flag, descending: the value starts with the literal term;
//! 2. match position, ascending, not-found last: 1-based offset of the first
//!    case-insensitive occurrence of the term;
//! 3. primary key, ascending.
//!
//! With several searched fields the per-field keys are folded best-of: the
//! greatest flag and the least position across fields.

use serde::Serialize;

use crate::error::SearchResult;
use crate::schema::SearchableFieldSet;

use super::predicate::lexemes;
use super::terms::TermSet;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// SQL keyword.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A searched field and its raw term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldTerm {
    /// Field name.
    pub field: String,
    /// Raw, non-empty term.
    pub term: String,
}

/// An expression to sort by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "over", rename_all = "snake_case")]
pub enum RankExpr {
    /// 1 if any field starts with its term (case-insensitive), else 0.
    ExactPrefix(Vec<FieldTerm>),
    /// Least 1-based match position across fields, NULL when not found.
    MatchPosition(Vec<FieldTerm>),
    /// A plain column.
    Column(String),
}

/// One key of an ORDER BY clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    /// Sorted expression.
    pub expr: RankExpr,
    /// Direction.
    pub direction: SortDirection,
    /// Whether NULLs sort after every value.
    pub nulls_last: bool,
}

impl SortKey {
    /// Ascending key on a column.
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            expr: RankExpr::Column(name.into()),
            direction: SortDirection::Asc,
            nulls_last: false,
        }
    }
}

/// An ordered list of sort keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledOrdering {
    keys: Vec<SortKey>,
}

impl CompiledOrdering {
    /// Creates an ordering from keys.
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    /// Orders by a single column ascending.
    pub fn by_column(name: impl Into<String>) -> Self {
        Self::new(vec![SortKey::column(name)])
    }

    /// The sort keys, most significant first.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }
}

/// Builds the ranking for `terms`.
///
/// Returns `None` when no field carries a term with at least one word, in
/// which case the caller falls back to its default ordering.
pub fn build_ordering(
    fields: &SearchableFieldSet,
    terms: &TermSet,
    primary_key: &str,
) -> SearchResult<Option<CompiledOrdering>> {
    fields.check(terms)?;

    let ranked: Vec<FieldTerm> = fields
        .iter()
        .filter_map(|field| {
            let term = terms.term(field)?;
            if lexemes(term).is_empty() {
                return None;
            }
            Some(FieldTerm {
                field: field.to_string(),
                term: term.to_string(),
            })
        })
        .collect();

    if ranked.is_empty() {
        return Ok(None);
    }

    Ok(Some(CompiledOrdering::new(vec![
        SortKey {
            expr: RankExpr::ExactPrefix(ranked.clone()),
            direction: SortDirection::Desc,
            nulls_last: false,
        },
        SortKey {
            expr: RankExpr::MatchPosition(ranked),
            direction: SortDirection::Asc,
            nulls_last: true,
        },
        SortKey::column(primary_key),
    ])))
}
