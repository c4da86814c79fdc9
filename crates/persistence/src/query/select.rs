//! SELECT statements over a record table.

use crate::error::SearchResult;
use crate::schema::RecordSchema;
use crate::search::{
    CompiledOrdering, Predicate, SqlFragment, SqlParam, SqlWriter, render_ordering,
    render_predicate,
};

/// A condition on the rows of a [`SelectQuery`]. Filters are ANDed.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Primary key is one of `ids`. An empty list matches nothing.
    IdIn {
        /// Key column.
        column: String,
        /// Key values.
        ids: Vec<SqlParam>,
    },
    /// A compiled search predicate.
    Search(Predicate),
    /// `column = value`, or `column IS NULL` for a null value.
    ColumnEquals {
        /// Column name.
        column: String,
        /// Value to compare against.
        value: SqlParam,
    },
}

/// A single-table SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    table: String,
    columns: Vec<String>,
    filters: Vec<Filter>,
    ordering: CompiledOrdering,
    limit: Option<i64>,
    offset: i64,
}

impl SelectQuery {
    /// Selects every column of `schema`, ordered by primary key.
    pub fn for_schema(schema: &RecordSchema) -> Self {
        Self {
            table: schema.table().to_string(),
            columns: schema.columns().iter().map(|c| c.name.clone()).collect(),
            filters: Vec::new(),
            ordering: CompiledOrdering::by_column(schema.primary_key()),
            limit: None,
            offset: 0,
        }
    }

    /// The selected table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The selected columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The filters, in application order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// The ORDER BY keys.
    pub fn ordering(&self) -> &CompiledOrdering {
        &self.ordering
    }

    /// The row limit, if any.
    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    /// Rows skipped.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Adds a filter.
    pub fn push_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Builder-style [`SelectQuery::push_filter`].
    pub fn filter(mut self, filter: Filter) -> Self {
        self.push_filter(filter);
        self
    }

    /// Replaces the ordering.
    pub fn order_by(mut self, ordering: CompiledOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Sets the paging window.
    pub fn page(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit);
        self.offset = offset;
        self
    }

    /// Renders the statement with `writer`'s dialect.
    pub fn render(&self, mut writer: SqlWriter) -> SearchResult<SqlFragment> {
        let columns: Vec<String> = self.columns.iter().map(|c| writer.ident(c)).collect();
        let mut sql = format!(
            "SELECT {} FROM {}",
            columns.join(", "),
            writer.ident(&self.table)
        );

        let mut conditions = Vec::new();
        for filter in &self.filters {
            if let Some(condition) = render_filter(filter, &mut writer)? {
                conditions.push(condition);
            }
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        if !self.ordering.keys().is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&render_ordering(&self.ordering, &mut writer)?);
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if self.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", self.offset));
        }

        Ok(writer.finish(sql))
    }
}

fn render_filter(filter: &Filter, writer: &mut SqlWriter) -> SearchResult<Option<String>> {
    match filter {
        Filter::Search(Predicate::True) => Ok(None),
        Filter::Search(predicate) => render_predicate(predicate, writer).map(Some),
        Filter::IdIn { ids, .. } if ids.is_empty() => Ok(Some("1 = 0".to_string())),
        Filter::IdIn { column, ids } => {
            let column = writer.ident(column);
            let placeholders: Vec<String> = ids.iter().map(|id| writer.bind(id.clone())).collect();
            Ok(Some(format!("{} IN ({})", column, placeholders.join(", "))))
        }
        Filter::ColumnEquals {
            column,
            value: SqlParam::Null,
        } => Ok(Some(format!("{} IS NULL", writer.ident(column)))),
        Filter::ColumnEquals { column, value } => {
            let column = writer.ident(column);
            let placeholder = writer.bind(value.clone());
            Ok(Some(format!("{} = {}", column, placeholder)))
        }
    }
}
