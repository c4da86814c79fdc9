//! PostgreSQL backend integration tests.
//!
//! Statement-shape tests compile searches for the PostgreSQL dialect without a
//! database. Tests that require a running PostgreSQL instance use
//! testcontainers to spin one up in Docker.
//!
//! Run with: `cargo test -p quarry-persistence --features postgres -- postgres`

#![cfg(feature = "postgres")]

mod common;

use quarry_persistence::backends::postgres::PostgresConfig;
use quarry_persistence::core::{BackendCapability, BackendKind, SearchCapabilities};
use quarry_persistence::query::{Filter, SelectQuery};
use quarry_persistence::search::{SearchCompiler, SearchConfig, Strategy, StrategyMode, TermSet};

use common::hero_schema;

fn compiler(config: &SearchConfig) -> SearchCompiler {
    SearchCompiler::new(config, BackendKind::Postgres, SearchCapabilities::full())
        .expect("Failed to create compiler")
}

// ============================================================================
// Backend Configuration Tests (no PostgreSQL instance required)
// ============================================================================

#[test]
fn test_postgres_config_defaults() {
    let config = PostgresConfig::default();
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 5432);
    assert_eq!(config.dbname, "quarry");
    assert_eq!(config.user, "quarry");
    assert!(config.password.is_none());
    assert_eq!(config.max_connections, 10);
    assert_eq!(config.connect_timeout_secs, 5);
    assert_eq!(config.statement_timeout_ms, 30000);
}

#[test]
fn test_postgres_config_serialization() {
    let config = PostgresConfig {
        host: "pg-server".to_string(),
        port: 5433,
        dbname: "test_db".to_string(),
        user: "test_user".to_string(),
        password: Some("secret".to_string()),
        ..Default::default()
    };

    let json = serde_json::to_string(&config).unwrap();
    let deserialized: PostgresConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.host, "pg-server");
    assert_eq!(deserialized.port, 5433);
    assert_eq!(deserialized.dbname, "test_db");
    assert_eq!(deserialized.user, "test_user");
    assert_eq!(deserialized.password, Some("secret".to_string()));
}

#[test]
fn test_postgres_capabilities_enable_prefix_search() {
    let capabilities = BackendKind::Postgres.default_capabilities();
    assert!(capabilities.contains(&BackendCapability::FullTextSearch));
    assert!(capabilities.contains(&BackendCapability::SubstringPosition));
    assert!(SearchCapabilities::from_capabilities(&capabilities).is_full());
}

// ============================================================================
// Statement Shape Tests (no PostgreSQL instance required)
// ============================================================================

#[test]
fn test_auto_strategy_is_full_text_prefix() {
    let compiler = compiler(&SearchConfig::default());
    assert_eq!(compiler.strategy(), Strategy::FullTextPrefix);
}

#[test]
fn test_ranked_search_statement() {
    let config = SearchConfig::default().with_text_search_config("english");
    let compiler = compiler(&config);
    let schema = hero_schema("heroes");

    let compiled = compiler
        .compile(&schema, &TermSet::new().with("name", "man"))
        .unwrap();
    let ordering = compiled.ordering.expect("prefix search ranks");
    let statement = SelectQuery::for_schema(&schema)
        .filter(Filter::Search(compiled.predicate))
        .order_by(ordering)
        .page(10, 0)
        .render(compiler.writer())
        .unwrap();

    assert_eq!(
        statement.sql,
        "SELECT \"id\", \"name\", \"hometown\", \"alias\", \"team_id\" FROM \"heroes\" \
         WHERE to_tsvector($1::text::regconfig, \"name\") @@ to_tsquery($2::text::regconfig, $3) \
         ORDER BY CASE WHEN \"name\" ILIKE $4 ESCAPE '\\' THEN 1 ELSE 0 END DESC, \
         NULLIF(POSITION(LOWER($5::text) IN LOWER(\"name\")), 0) ASC NULLS LAST, \
         \"id\" ASC LIMIT 10"
    );
    let params: Vec<_> = statement
        .params
        .iter()
        .map(|p| p.as_text().unwrap())
        .collect();
    assert_eq!(params, vec!["english", "english", "man:*", "man%", "man"]);
}

#[test]
fn test_forced_generic_uses_ilike() {
    let config = SearchConfig::default().with_strategy(StrategyMode::Generic);
    let compiler = compiler(&config);
    let schema = hero_schema("heroes");

    let compiled = compiler
        .compile(&schema, &TermSet::new().with("hometown", "Gotham"))
        .unwrap();
    assert!(compiled.ordering.is_none());

    let fragment = compiler.to_sql(&compiled).unwrap();
    assert_eq!(fragment.sql, "WHERE \"hometown\" ILIKE $1 ESCAPE '\\'");
    assert_eq!(fragment.params[0].as_text(), Some("%Gotham%"));
}

#[test]
fn test_wordless_term_matches_nothing() {
    let compiler = compiler(&SearchConfig::default());
    let schema = hero_schema("heroes");

    let compiled = compiler
        .compile(&schema, &TermSet::new().with("name", "%%"))
        .unwrap();
    let fragment = compiler.to_sql(&compiled).unwrap();
    assert_eq!(fragment.sql, "WHERE 1 = 0");
    assert!(fragment.params.is_empty());
}

// ============================================================================
// Integration Tests (requires Docker for testcontainers)
// ============================================================================

/// Integration tests that require a real PostgreSQL instance via testcontainers.
///
/// To skip these when Docker is unavailable:
///   cargo test -p quarry-persistence --features postgres -- --skip postgres_integration
#[cfg(test)]
mod postgres_integration {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use quarry_persistence::backends::postgres::{PostgresBackend, PostgresConfig};
    use quarry_persistence::core::{BackendKind, RecordStore};
    use quarry_persistence::error::{SearchError, StorageError};
    use quarry_persistence::query::RecordResolver;
    use quarry_persistence::schema::RecordSchema;
    use quarry_persistence::search::{SearchConfig, StrategyMode, TermSet};
    use quarry_persistence::types::{ListQuery, RecordId};

    use testcontainers::ImageExt;
    use testcontainers::runners::AsyncRunner;
    use testcontainers_modules::postgres::Postgres;
    use tokio::sync::OnceCell;

    use super::common::{hero_schema, ids_of, seed_heroes};

    /// Shared PostgreSQL container reused across all tests in this module.
    struct SharedPg {
        host: String,
        port: u16,
        /// Kept alive for the duration of the test binary; dropped at process exit.
        _container: testcontainers::ContainerAsync<Postgres>,
    }

    static SHARED_PG: OnceCell<SharedPg> = OnceCell::const_new();
    static TABLE_SEQ: AtomicUsize = AtomicUsize::new(0);

    async fn shared_pg() -> &'static SharedPg {
        SHARED_PG
            .get_or_init(|| async {
                let run_id = std::env::var("GITHUB_RUN_ID").unwrap_or_default();
                let container = Postgres::default()
                    .with_label("github.run_id", &run_id)
                    .start()
                    .await
                    .expect("Failed to start PostgreSQL container");

                let port = container
                    .get_host_port_ipv4(5432)
                    .await
                    .expect("Failed to get host port");

                let host = container
                    .get_host()
                    .await
                    .expect("Failed to get host")
                    .to_string();

                SharedPg {
                    host,
                    port,
                    _container: container,
                }
            })
            .await
    }

    /// Creates a PostgresBackend connected to the shared testcontainers PostgreSQL instance.
    async fn create_backend() -> Arc<PostgresBackend> {
        let pg = shared_pg().await;

        let config = PostgresConfig {
            host: pg.host.clone(),
            port: pg.port,
            dbname: "postgres".to_string(),
            user: "postgres".to_string(),
            password: Some("postgres".to_string()),
            max_connections: 5,
            ..Default::default()
        };

        Arc::new(
            PostgresBackend::new(config)
                .await
                .expect("Failed to create PostgresBackend"),
        )
    }

    /// Seeds a fresh hero table so tests sharing the database do not collide.
    async fn create_resolver_with(config: SearchConfig) -> (RecordResolver, RecordSchema) {
        let backend = create_backend().await;
        let table = format!("heroes_{}", TABLE_SEQ.fetch_add(1, Ordering::SeqCst));
        let schema = hero_schema(&table);
        seed_heroes(backend.as_ref(), &schema).await;

        let resolver = RecordResolver::new(backend, config).expect("Failed to create resolver");
        (resolver, schema)
    }

    async fn create_resolver() -> (RecordResolver, RecordSchema) {
        create_resolver_with(SearchConfig::default().with_text_search_config("english")).await
    }

    async fn search(resolver: &RecordResolver, schema: &RecordSchema, terms: TermSet) -> Vec<i64> {
        let records = resolver
            .resolve_multiple(schema, &ListQuery::new().search(terms))
            .await
            .expect("search failed");
        ids_of(&records)
    }

    #[tokio::test]
    async fn postgres_integration_backend_kind() {
        let backend = create_backend().await;
        assert_eq!(backend.kind(), BackendKind::Postgres);
        assert_eq!(backend.name(), "postgres");
        assert!(backend.search_capabilities().is_full());
    }

    #[tokio::test]
    async fn postgres_integration_prefix_search_ranks_results() {
        let (resolver, schema) = create_resolver().await;

        // Prefix matches of the whole value first, then by match position.
        let ids = search(&resolver, &schema, TermSet::new().with("name", "man")).await;
        assert_eq!(ids, vec![3, 8, 9, 7]);
    }

    #[tokio::test]
    async fn postgres_integration_prefix_search_matches_word_starts_only() {
        let (resolver, schema) = create_resolver().await;

        let ids = search(&resolver, &schema, TermSet::new().with("name", "man")).await;
        assert!(!ids.contains(&1), "Superman has no word starting with 'man'");
        assert!(!ids.contains(&4), "Batman has no word starting with 'man'");

        let ids = search(&resolver, &schema, TermSet::new().with("name", "super")).await;
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn postgres_integration_search_is_case_insensitive() {
        let (resolver, schema) = create_resolver().await;

        let lower = search(&resolver, &schema, TermSet::new().with("name", "man")).await;
        let upper = search(&resolver, &schema, TermSet::new().with("name", "MAN")).await;
        assert_eq!(lower, upper);
    }

    #[tokio::test]
    async fn postgres_integration_fields_are_or_combined() {
        let (resolver, schema) = create_resolver().await;

        let terms = TermSet::new()
            .with("name", "clark")
            .with("hometown", "smallville");
        let ids = search(&resolver, &schema, terms).await;
        assert_eq!(ids, vec![1, 5]);
    }

    #[tokio::test]
    async fn postgres_integration_wordless_term_matches_nothing() {
        let (resolver, schema) = create_resolver().await;

        let ids = search(&resolver, &schema, TermSet::new().with("name", "%%")).await;
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn postgres_integration_ranked_paging() {
        let (resolver, schema) = create_resolver().await;

        let request = ListQuery::new()
            .search(TermSet::new().with("name", "man"))
            .limit(2)
            .offset(1);
        let records = resolver.resolve_multiple(&schema, &request).await.unwrap();
        assert_eq!(ids_of(&records), vec![8, 9]);
    }

    #[tokio::test]
    async fn postgres_integration_generic_strategy() {
        let config = SearchConfig::default().with_strategy(StrategyMode::Generic);
        let (resolver, schema) = create_resolver_with(config).await;

        let ids = search(&resolver, &schema, TermSet::new().with("name", "man")).await;
        assert_eq!(ids, vec![1, 3, 4, 7, 8, 9]);

        let ids = search(&resolver, &schema, TermSet::new().with("hometown", "_")).await;
        assert_eq!(ids, vec![6]);
    }

    #[tokio::test]
    async fn postgres_integration_unknown_field_is_rejected() {
        let (resolver, schema) = create_resolver().await;

        let result = resolver
            .resolve_multiple(
                &schema,
                &ListQuery::new().search(TermSet::new().with("alias", "Kent")),
            )
            .await;
        assert!(matches!(
            result,
            Err(StorageError::Search(SearchError::InvalidSearchField { .. }))
        ));
    }

    #[tokio::test]
    async fn postgres_integration_ids_and_search() {
        let (resolver, schema) = create_resolver().await;

        let request = ListQuery::new()
            .ids([2i64, 3, 7])
            .search(TermSet::new().with("name", "man"));
        let records = resolver.resolve_multiple(&schema, &request).await.unwrap();
        assert_eq!(ids_of(&records), vec![3, 7]);
    }

    #[tokio::test]
    async fn postgres_integration_resolve_single() {
        let (resolver, schema) = create_resolver().await;

        let record = resolver
            .resolve_single(&schema, &RecordId::from(4i64))
            .await
            .unwrap();
        assert_eq!(record.get_str("name"), Some("Batman"));
        assert_eq!(record.get_str("alias"), Some("Bruce Wayne"));
        assert_eq!(record.get("team_id").and_then(|v| v.as_i64()), Some(2));
    }
}
