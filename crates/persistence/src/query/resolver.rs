//! List and lookup resolution.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::core::RecordStore;
use crate::error::{QueryError, StorageResult};
use crate::schema::RecordSchema;
use crate::search::{SearchCompiler, SearchConfig, SqlFragment, SqlParam};
use crate::types::{ListQuery, Record, RecordId};

use super::modifier::{NoopModifier, QueryModifier};
use super::select::{Filter, SelectQuery};

/// Answers single-record and multi-record requests against a store.
///
/// The search strategy is resolved when the resolver is created, so a
/// configuration the store cannot honour fails before any request is served.
#[derive(Debug, Clone)]
pub struct RecordResolver {
    store: Arc<dyn RecordStore>,
    config: SearchConfig,
    compiler: SearchCompiler,
    modifier: Arc<dyn QueryModifier>,
}

impl RecordResolver {
    /// Creates a resolver for `store`.
    pub fn new(store: Arc<dyn RecordStore>, config: SearchConfig) -> StorageResult<Self> {
        config.validate()?;
        let compiler = SearchCompiler::new(&config, store.kind(), store.search_capabilities())?;

        info!(
            backend = store.name(),
            strategy = %compiler.strategy(),
            default_limit = config.default_limit,
            max_limit = config.max_limit,
            "Record resolver initialized"
        );

        Ok(Self {
            store,
            config,
            compiler,
            modifier: Arc::new(NoopModifier),
        })
    }

    /// Installs a query modifier.
    pub fn with_modifier(mut self, modifier: Arc<dyn QueryModifier>) -> Self {
        self.modifier = modifier;
        self
    }

    /// The search compiler.
    pub fn compiler(&self) -> &SearchCompiler {
        &self.compiler
    }

    /// The search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Builds the statement for a multi-record request without running it.
    pub fn prepare_multiple(
        &self,
        schema: &RecordSchema,
        request: &ListQuery,
    ) -> StorageResult<SqlFragment> {
        if request.ids.is_none() && !schema.allows_unfiltered_fetch() {
            return Err(QueryError::UnfilteredFetchNotAllowed {
                record: schema.name().to_string(),
            }
            .into());
        }

        let page = request.page(&self.config)?;
        let mut select = SelectQuery::for_schema(schema);

        if let Some(ids) = &request.ids {
            select.push_filter(self.id_filter(schema, ids)?);
        }

        if let Some(terms) = &request.query {
            let compiled = self.compiler.compile(schema, terms)?;
            if !compiled.predicate.is_true() {
                select.push_filter(Filter::Search(compiled.predicate));
            }
            if let Some(ordering) = compiled.ordering {
                select = select.order_by(ordering);
            }
        }

        let mut select = select.page(page.limit, page.offset);
        self.modifier.modify(schema, &mut select)?;

        let statement = select.render(self.compiler.writer())?;
        debug!(
            record = schema.name(),
            sql = %statement.sql,
            params = statement.params.len(),
            "Prepared list query"
        );
        Ok(statement)
    }

    /// Builds the statement for a single-record lookup without running it.
    pub fn prepare_single(&self, schema: &RecordSchema, id: &RecordId) -> StorageResult<SqlFragment> {
        let mut select = SelectQuery::for_schema(schema)
            .filter(self.id_filter(schema, std::slice::from_ref(id))?)
            .page(1, 0);
        self.modifier.modify(schema, &mut select)?;

        let statement = select.render(self.compiler.writer())?;
        debug!(
            record = schema.name(),
            sql = %statement.sql,
            "Prepared lookup query"
        );
        Ok(statement)
    }

    /// Lists records: by ids, by search terms, or both.
    ///
    /// Ids and search terms narrow the result together. Without ids the record
    /// type must allow unfiltered fetch.
    #[instrument(skip(self, schema, request), fields(record = schema.name()))]
    pub async fn resolve_multiple(
        &self,
        schema: &RecordSchema,
        request: &ListQuery,
    ) -> StorageResult<Vec<Record>> {
        let statement = self.prepare_multiple(schema, request)?;
        let records = self.store.fetch(schema, &statement).await?;
        debug!(rows = records.len(), "Resolved list query");
        Ok(records)
    }

    /// Looks up one record by primary key.
    #[instrument(skip(self, schema), fields(record = schema.name()))]
    pub async fn resolve_single(&self, schema: &RecordSchema, id: &RecordId) -> StorageResult<Record> {
        let statement = self.prepare_single(schema, id)?;
        let mut records = self.store.fetch(schema, &statement).await?;
        if records.is_empty() {
            return Err(QueryError::NotFound {
                record: schema.name().to_string(),
                id: id.to_string(),
            }
            .into());
        }
        Ok(records.swap_remove(0))
    }

    fn id_filter(&self, schema: &RecordSchema, ids: &[RecordId]) -> Result<Filter, QueryError> {
        let key = schema.primary_key_column();
        let params = ids
            .iter()
            .map(|id| {
                id.to_param(key.column_type)
                    .ok_or_else(|| QueryError::TypeMismatch {
                        record: schema.name().to_string(),
                        column: key.name.clone(),
                        expected: key.column_type.to_string(),
                    })
            })
            .collect::<Result<Vec<SqlParam>, _>>()?;

        Ok(Filter::IdIn {
            column: key.name.clone(),
            ids: params,
        })
    }
}
