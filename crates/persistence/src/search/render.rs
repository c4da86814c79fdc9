//! Rendering of predicates and orderings to SQL.
//!
//! Terms are always bound through the [`SqlWriter`]; only quoted identifiers
//! and fixed keywords are written into the SQL text.

use crate::error::{SearchError, SearchResult};

use super::ordering::{CompiledOrdering, FieldTerm, RankExpr, SortKey};
use super::predicate::{MatchClause, Predicate, prefix_query};
use super::sql::{SqlDialect, SqlParam, SqlWriter, escape_like};
use super::strategy::Strategy;

/// Renders a predicate as a boolean SQL expression.
pub fn render_predicate(predicate: &Predicate, writer: &mut SqlWriter) -> SearchResult<String> {
    match predicate {
        Predicate::True => Ok("1 = 1".to_string()),
        Predicate::False => Ok("1 = 0".to_string()),
        Predicate::Match(clause) => render_clause(clause, writer),
        Predicate::Or { any } => {
            let parts = any
                .iter()
                .map(|p| render_predicate(p, writer))
                .collect::<SearchResult<Vec<_>>>()?;
            Ok(format!("({})", parts.join(" OR ")))
        }
    }
}

fn render_clause(clause: &MatchClause, writer: &mut SqlWriter) -> SearchResult<String> {
    match clause {
        MatchClause::Contains { field, term } => {
            let column = writer.ident(field);
            let pattern = writer.bind(SqlParam::text(format!("%{}%", escape_like(term))));
            Ok(writer.dialect().case_insensitive_like(&column, &pattern))
        }
        MatchClause::LexemePrefix { field, lexemes } => {
            require_full_text(writer.dialect())?;
            let column = writer.ident(field);
            let vector_config = bind_text_search_config(writer);
            let query_config = bind_text_search_config(writer);
            let query = writer.bind(SqlParam::text(prefix_query(lexemes)));
            Ok(format!(
                "to_tsvector({}{}) @@ to_tsquery({}{})",
                vector_config, column, query_config, query
            ))
        }
    }
}

/// Binds the configured regconfig and returns the leading argument, or an
/// empty string to use the server default.
fn bind_text_search_config(writer: &mut SqlWriter) -> String {
    match writer.text_search_config().map(str::to_string) {
        Some(config) => format!("{}::text::regconfig, ", writer.bind(SqlParam::Text(config))),
        None => String::new(),
    }
}

/// Renders the body of an ORDER BY clause.
pub fn render_ordering(ordering: &CompiledOrdering, writer: &mut SqlWriter) -> SearchResult<String> {
    let keys = ordering
        .keys()
        .iter()
        .map(|key| render_sort_key(key, writer))
        .collect::<SearchResult<Vec<_>>>()?;
    Ok(keys.join(", "))
}

fn render_sort_key(key: &SortKey, writer: &mut SqlWriter) -> SearchResult<String> {
    let expr = render_rank_expr(&key.expr, writer)?;
    let mut sql = format!("{} {}", expr, key.direction.as_sql());
    if key.nulls_last {
        sql.push_str(" NULLS LAST");
    }
    Ok(sql)
}

fn render_rank_expr(expr: &RankExpr, writer: &mut SqlWriter) -> SearchResult<String> {
    match expr {
        RankExpr::Column(name) => Ok(writer.ident(name)),
        RankExpr::ExactPrefix(over) => {
            require_full_text(writer.dialect())?;
            let flags = over
                .iter()
                .map(|ft| exact_prefix_flag(ft, writer))
                .collect::<Vec<_>>();
            Ok(fold("GREATEST", flags))
        }
        RankExpr::MatchPosition(over) => {
            require_full_text(writer.dialect())?;
            let positions = over
                .iter()
                .map(|ft| match_position(ft, writer))
                .collect::<Vec<_>>();
            Ok(fold("LEAST", positions))
        }
    }
}

fn exact_prefix_flag(ft: &FieldTerm, writer: &mut SqlWriter) -> String {
    let column = writer.ident(&ft.field);
    let pattern = writer.bind(SqlParam::text(format!("{}%", escape_like(&ft.term))));
    format!(
        "CASE WHEN {} THEN 1 ELSE 0 END",
        writer.dialect().case_insensitive_like(&column, &pattern)
    )
}

fn match_position(ft: &FieldTerm, writer: &mut SqlWriter) -> String {
    let column = writer.ident(&ft.field);
    let term = writer.bind(SqlParam::text(ft.term.clone()));
    format!(
        "NULLIF(POSITION(LOWER({}::text) IN LOWER({})), 0)",
        term, column
    )
}

fn fold(function: &str, mut parts: Vec<String>) -> String {
    if parts.len() == 1 {
        parts.remove(0)
    } else {
        format!("{}({})", function, parts.join(", "))
    }
}

fn require_full_text(dialect: SqlDialect) -> SearchResult<()> {
    if dialect.supports_full_text() {
        Ok(())
    } else {
        Err(SearchError::UnsupportedStrategy {
            strategy: Strategy::FullTextPrefix.to_string(),
            backend: dialect.to_string(),
        })
    }
}
