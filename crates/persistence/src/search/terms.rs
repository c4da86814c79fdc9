//! Search term sets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A partial query: searchable field to optional term.
///
/// Absent and empty terms are equivalent, they do not narrow the result.
/// A term made only of whitespace is content and is searched on. On the wire
/// a term set is a JSON object of optional strings:
///
/// ```
/// use quarry_persistence::search::TermSet;
///
/// let terms: TermSet = serde_json::from_str(r#"{"name": "man", "hometown": null}"#).unwrap();
/// assert_eq!(terms.term("name"), Some("man"));
/// assert_eq!(terms.term("hometown"), None);
/// assert!(terms.has_terms());
/// ```
///
/// Keys are kept in a sorted map; the order in which match clauses are
/// emitted comes from the record's searchable field set, not from here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermSet {
    terms: BTreeMap<String, Option<String>>,
}

impl TermSet {
    /// Creates an empty term set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the term for `field`, replacing any previous term.
    pub fn insert(&mut self, field: impl Into<String>, term: Option<String>) {
        self.terms.insert(field.into(), term);
    }

    /// Builder-style [`TermSet::insert`] with a present term.
    pub fn with(mut self, field: impl Into<String>, term: impl Into<String>) -> Self {
        self.insert(field, Some(term.into()));
        self
    }

    /// Returns the term for `field` if it is present and non-empty.
    pub fn term(&self, field: &str) -> Option<&str> {
        self.terms
            .get(field)
            .and_then(|t| t.as_deref())
            .filter(|t| !t.is_empty())
    }

    /// Iterates over every key, including keys without a term.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Iterates over the fields that carry a non-empty term.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.terms.iter().filter_map(|(field, term)| match term.as_deref() {
            Some(t) if !t.is_empty() => Some((field.as_str(), t)),
            _ => None,
        })
    }

    /// Returns true if the set has no keys at all.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns true if at least one field carries a non-empty term.
    pub fn has_terms(&self) -> bool {
        self.iter().next().is_some()
    }
}

impl<K, V> FromIterator<(K, V)> for TermSet
where
    K: Into<String>,
    V: Into<Option<String>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            terms: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
