//! Field-similarity search.
//!
//! Records declare a set of searchable text fields. A request supplies a
//! [`TermSet`] (field to optional term) and the [`SearchCompiler`] turns it
//! into a filter and, where the backend supports it, a ranking:
//!
//! | Strategy | Filter | Ranking |
//! |----------|--------|---------|
//! | [`Strategy::Generic`] | `field ILIKE '%term%'` per field, OR-ed | none |
//! | [`Strategy::FullTextPrefix`] | `to_tsvector(field) @@ to_tsquery('w1:* & w2:*')` | exact prefix, match position, primary key |
//!
//! The strategy is resolved once from the configured [`StrategyMode`] and the
//! backend's [`SearchCapabilities`](crate::core::SearchCapabilities).
//!
//! # Example
//!
//! ```
//! use quarry_persistence::core::{BackendKind, SearchCapabilities};
//! use quarry_persistence::schema::{ColumnType, RecordSchema};
//! use quarry_persistence::search::{SearchCompiler, SearchConfig, Strategy, TermSet};
//!
//! let heroes = RecordSchema::builder("Hero")
//!     .column("id", ColumnType::Integer)
//!     .column("name", ColumnType::Text)
//!     .searchable(["name"])
//!     .allow_unfiltered_fetch(true)
//!     .build()
//!     .unwrap();
//!
//! let compiler = SearchCompiler::new(
//!     &SearchConfig::default(),
//!     BackendKind::Sqlite,
//!     SearchCapabilities::for_backend(BackendKind::Sqlite),
//! )
//! .unwrap();
//! assert_eq!(compiler.strategy(), Strategy::Generic);
//!
//! let compiled = compiler.compile(&heroes, &TermSet::new().with("name", "man")).unwrap();
//! let tail = compiler.to_sql(&compiled).unwrap();
//! assert_eq!(tail.sql, "WHERE casefold(\"name\") LIKE casefold(?1) ESCAPE '\\'");
//! ```

mod compiler;
mod config;
mod ordering;
mod predicate;
mod render;
mod sql;
mod strategy;
mod terms;

pub use compiler::{CompiledSearch, SearchCompiler};
pub use config::SearchConfig;
pub use ordering::{
    CompiledOrdering, FieldTerm, RankExpr, SortDirection, SortKey, build_ordering,
};
pub use predicate::{MatchClause, Predicate, build_predicate, lexemes, prefix_query};
pub use render::{render_ordering, render_predicate};
pub use sql::{SQLITE_CASEFOLD, SqlDialect, SqlFragment, SqlParam, SqlWriter, escape_like};
pub use strategy::{Strategy, StrategyMode};
pub use terms::TermSet;
