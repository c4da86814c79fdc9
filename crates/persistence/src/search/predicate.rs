//! Search predicate trees.
//!
//! [`build_predicate`] turns a [`TermSet`] into a [`Predicate`]: one match
//! clause per searched field, combined with OR. The tree is dialect-free;
//! see [`super::render`] for the SQL form.

use serde::Serialize;

use crate::error::SearchResult;
use crate::schema::SearchableFieldSet;

use super::strategy::Strategy;
use super::terms::TermSet;

/// A boolean search condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Matches every row.
    True,
    /// Matches no row.
    False,
    /// A single field match.
    Match(MatchClause),
    /// Matches rows satisfying any of the inner predicates.
    Or {
        /// The alternatives; at least two when built through [`Predicate::or`].
        any: Vec<Predicate>,
    },
}

impl Predicate {
    /// Combines predicates with OR.
    ///
    /// `False` operands are dropped, an empty result is `False` and a single
    /// remaining operand is returned unwrapped.
    pub fn or(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
        let mut any: Vec<Predicate> = predicates
            .into_iter()
            .filter(|p| *p != Predicate::False)
            .collect();

        if any.contains(&Predicate::True) {
            return Predicate::True;
        }
        match any.len() {
            0 => Predicate::False,
            1 => any.remove(0),
            _ => Predicate::Or { any },
        }
    }

    /// Returns true if the predicate does not narrow the result.
    pub fn is_true(&self) -> bool {
        matches!(self, Predicate::True)
    }

    /// The match clauses of this predicate, in emission order.
    pub fn clauses(&self) -> Vec<&MatchClause> {
        match self {
            Predicate::True | Predicate::False => Vec::new(),
            Predicate::Match(clause) => vec![clause],
            Predicate::Or { any } => any.iter().flat_map(Predicate::clauses).collect(),
        }
    }
}

/// How one field is matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MatchClause {
    /// Case-insensitive literal substring.
    Contains {
        /// Field to match.
        field: String,
        /// Raw term; wildcards are escaped at render time.
        term: String,
    },
    /// Every lexeme must prefix-match a lexeme of the field's text vector.
    LexemePrefix {
        /// Field to match.
        field: String,
        /// Alphanumeric words of the term. Never empty.
        lexemes: Vec<String>,
    },
}

impl MatchClause {
    /// The matched field.
    pub fn field(&self) -> &str {
        match self {
            MatchClause::Contains { field, .. } | MatchClause::LexemePrefix { field, .. } => field,
        }
    }
}

/// Splits a term into its words: maximal runs of alphanumeric characters.
///
/// Everything else is a separator, which keeps text-search operators such as
/// `&`, `|`, `!`, `:` and parentheses out of the generated query.
pub fn lexemes(term: &str) -> Vec<String> {
    term.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Formats lexemes as a prefix query: `word:* & word:*`.
pub fn prefix_query(lexemes: &[String]) -> String {
    lexemes
        .iter()
        .map(|word| format!("{}:*", word))
        .collect::<Vec<_>>()
        .join(" & ")
}

/// Builds the filter for `terms` over `fields`.
///
/// Fields are visited in declaration order; fields without a non-empty term
/// are skipped. A term set that searches nothing yields [`Predicate::True`].
pub fn build_predicate(
    fields: &SearchableFieldSet,
    terms: &TermSet,
    strategy: Strategy,
) -> SearchResult<Predicate> {
    fields.check(terms)?;

    if !terms.has_terms() {
        return Ok(Predicate::True);
    }

    let clauses = fields.iter().filter_map(|field| {
        let term = terms.term(field)?;
        Some(match strategy {
            Strategy::Generic => Predicate::Match(MatchClause::Contains {
                field: field.to_string(),
                term: term.to_string(),
            }),
            Strategy::FullTextPrefix => {
                let lexemes = lexemes(term);
                if lexemes.is_empty() {
                    Predicate::False
                } else {
                    Predicate::Match(MatchClause::LexemePrefix {
                        field: field.to_string(),
                        lexemes,
                    })
                }
            }
        })
    });

    Ok(Predicate::or(clauses))
}
