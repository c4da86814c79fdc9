//! The search compiler entry point.

use serde::Serialize;
use tracing::debug;

use crate::core::{BackendKind, SearchCapabilities};
use crate::error::{SearchError, SearchResult};
use crate::schema::RecordSchema;

use super::config::SearchConfig;
use super::ordering::{CompiledOrdering, build_ordering};
use super::predicate::{Predicate, build_predicate};
use super::render::{render_ordering, render_predicate};
use super::sql::{SqlDialect, SqlFragment, SqlWriter};
use super::strategy::{Strategy, StrategyMode};
use super::terms::TermSet;

/// The compiled form of one search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledSearch {
    /// Filter condition.
    pub predicate: Predicate,
    /// Ranking, present only for ranked strategies with searched fields.
    pub ordering: Option<CompiledOrdering>,
}

/// Compiles term sets into predicates and rankings for one backend.
///
/// The strategy is fixed at construction; compiling holds no state between
/// calls, so a compiler can be shared freely across tasks.
#[derive(Debug, Clone)]
pub struct SearchCompiler {
    strategy: Strategy,
    dialect: SqlDialect,
    text_search_config: Option<String>,
}

impl SearchCompiler {
    /// Resolves the configured strategy against the backend.
    ///
    /// Fails with [`SearchError::UnsupportedStrategy`] when the configuration
    /// forces a strategy the backend cannot run.
    pub fn new(
        config: &SearchConfig,
        backend: BackendKind,
        capabilities: SearchCapabilities,
    ) -> SearchResult<Self> {
        let mut strategy = config.strategy.resolve(capabilities, backend)?;
        let dialect = backend.dialect();

        // Capabilities can be configured; the dialect still has to render them.
        if strategy == Strategy::FullTextPrefix && !dialect.supports_full_text() {
            if config.strategy == StrategyMode::Auto {
                strategy = Strategy::Generic;
            } else {
                return Err(SearchError::UnsupportedStrategy {
                    strategy: strategy.to_string(),
                    backend: backend.to_string(),
                });
            }
        }

        debug!(
            backend = %backend,
            mode = %config.strategy,
            strategy = %strategy,
            "Resolved search strategy"
        );

        Ok(Self {
            strategy,
            dialect,
            text_search_config: config.text_search_config.clone(),
        })
    }

    /// The resolved strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The target dialect.
    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Compiles `terms` against the searchable fields of `schema`.
    pub fn compile(&self, schema: &RecordSchema, terms: &TermSet) -> SearchResult<CompiledSearch> {
        let fields = schema.searchable_fields();
        let predicate = build_predicate(fields, terms, self.strategy)?;
        let ordering = if self.strategy.ranks() {
            build_ordering(fields, terms, schema.primary_key())?
        } else {
            None
        };

        debug!(
            record = schema.name(),
            strategy = %self.strategy,
            clauses = predicate.clauses().len(),
            ranked = ordering.is_some(),
            "Compiled search"
        );

        Ok(CompiledSearch {
            predicate,
            ordering,
        })
    }

    /// Starts a writer for a statement in this compiler's dialect.
    pub fn writer(&self) -> SqlWriter {
        SqlWriter::new(self.dialect).with_text_search_config(self.text_search_config.clone())
    }

    /// Renders a compiled search as a standalone `WHERE .. [ORDER BY ..]` tail.
    pub fn to_sql(&self, compiled: &CompiledSearch) -> SearchResult<SqlFragment> {
        let mut writer = self.writer();
        let mut sql = format!("WHERE {}", render_predicate(&compiled.predicate, &mut writer)?);
        if let Some(ordering) = &compiled.ordering {
            sql.push_str(" ORDER BY ");
            sql.push_str(&render_ordering(ordering, &mut writer)?);
        }
        Ok(writer.finish(sql))
    }
}
