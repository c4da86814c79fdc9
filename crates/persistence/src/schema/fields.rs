//! Searchable field declarations.

use std::collections::HashSet;

use crate::error::{SchemaError, SearchError, SearchResult};
use crate::search::TermSet;

use super::validate_identifier;

/// The ordered set of fields a record type exposes to text search.
///
/// The set is fixed when the schema is declared. Its order is the order in
/// which match clauses and ranking keys are emitted, which keeps compiled
/// expressions deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchableFieldSet {
    record: String,
    fields: Vec<String>,
}

impl SearchableFieldSet {
    /// Declares the searchable fields of `record`.
    ///
    /// Duplicate fields and non-identifier names are rejected.
    pub fn new<I, S>(record: impl Into<String>, fields: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let record = record.into();
        let mut seen = HashSet::new();
        let mut declared = Vec::new();

        for field in fields {
            let field = field.into();
            validate_identifier(&field)?;
            if !seen.insert(field.clone()) {
                return Err(SchemaError::DuplicateSearchField { field });
            }
            declared.push(field);
        }

        Ok(Self {
            record,
            fields: declared,
        })
    }

    /// Creates an empty set for a record that is not searchable.
    pub fn empty(record: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            fields: Vec::new(),
        }
    }

    /// The record type owning these fields.
    pub fn record(&self) -> &str {
        &self.record
    }

    /// The declared fields, in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns true if `field` is searchable.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Returns true if no field is searchable.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of searchable fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates over the declared fields.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Checks that every key of `terms` is a searchable field.
    pub fn check(&self, terms: &TermSet) -> SearchResult<()> {
        match terms.fields().find(|field| !self.contains(field)) {
            Some(field) => Err(SearchError::InvalidSearchField {
                record: self.record.clone(),
                field: field.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Starts a term set that only accepts fields of this set.
    pub fn term_set(&self) -> TermSetBuilder<'_> {
        TermSetBuilder {
            fields: self,
            terms: TermSet::new(),
        }
    }
}

/// Builds a [`TermSet`] that is checked against its field set on every insert.
#[derive(Debug)]
pub struct TermSetBuilder<'a> {
    fields: &'a SearchableFieldSet,
    terms: TermSet,
}

impl TermSetBuilder<'_> {
    /// Adds a term for `field`.
    pub fn term(mut self, field: &str, term: impl Into<String>) -> SearchResult<Self> {
        self.ensure_searchable(field)?;
        self.terms.insert(field, Some(term.into()));
        Ok(self)
    }

    /// Adds a field with no term; it is listed but not searched on.
    pub fn absent(mut self, field: &str) -> SearchResult<Self> {
        self.ensure_searchable(field)?;
        self.terms.insert(field, None);
        Ok(self)
    }

    /// Finishes the term set.
    pub fn build(self) -> TermSet {
        self.terms
    }

    fn ensure_searchable(&self, field: &str) -> SearchResult<()> {
        if self.fields.contains(field) {
            Ok(())
        } else {
            Err(SearchError::InvalidSearchField {
                record: self.fields.record().to_string(),
                field: field.to_string(),
            })
        }
    }
}
