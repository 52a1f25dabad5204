//! Backend-neutral document filters.
//!
//! Adapters express their queries as a [`Filter`] tree. The Postgres store
//! compiles it to SQL over JSONB; the in-memory store evaluates it directly
//! with [`Filter::matches`]. Both must agree on semantics: a field that is
//! missing or of the wrong type never matches a positive predicate.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use vitrine_core::DocumentId;

use crate::RawDocument;

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// Matches nothing. Used when an adapter cannot serve a request filter.
    Never,
    /// JSON equality on a top-level field.
    Eq { field: String, value: Value },
    /// Case-insensitive equality on a field's text form.
    EqIgnoreCase { field: String, value: String },
    /// Case-insensitive prefix match on a field's text form.
    Prefix { field: String, value: String },
    /// Case-insensitive substring match on a field's text form.
    Contains { field: String, value: String },
    /// Numeric field strictly greater than `value`; non-numbers never match.
    GreaterThan { field: String, value: Decimal },
    IdEq(DocumentId),
    Not(Box<Filter>),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    #[must_use]
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.to_string(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn eq_ignore_case(field: &str, value: &str) -> Self {
        Self::EqIgnoreCase {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    #[must_use]
    pub fn prefix(field: &str, value: &str) -> Self {
        Self::Prefix {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    #[must_use]
    pub fn contains(field: &str, value: &str) -> Self {
        Self::Contains {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    #[must_use]
    pub fn greater_than(field: &str, value: Decimal) -> Self {
        Self::GreaterThan {
            field: field.to_string(),
            value,
        }
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Filter) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Conjunction that drops `All` clauses and collapses to `Never` as soon as
    /// any clause is `Never`.
    #[must_use]
    pub fn and(clauses: Vec<Filter>) -> Self {
        let mut kept = Vec::with_capacity(clauses.len());
        for clause in clauses {
            match clause {
                Filter::All => {}
                Filter::Never => return Filter::Never,
                other => kept.push(other),
            }
        }
        match kept.len() {
            0 => Filter::All,
            1 => kept.remove(0),
            _ => Filter::And(kept),
        }
    }

    /// Whether the filter can never match, so the fetch can be skipped.
    #[must_use]
    pub fn is_never(&self) -> bool {
        matches!(self, Filter::Never)
    }

    #[must_use]
    pub fn matches(&self, doc: &RawDocument) -> bool {
        match self {
            Filter::All => true,
            Filter::Never => false,
            Filter::Eq { field, value } => doc.get(field) == Some(value),
            Filter::EqIgnoreCase { field, value } => {
                text_of(doc.get(field)).is_some_and(|text| text == value.to_lowercase())
            }
            Filter::Prefix { field, value } => text_of(doc.get(field))
                .is_some_and(|text| text.starts_with(&value.to_lowercase())),
            Filter::Contains { field, value } => text_of(doc.get(field))
                .is_some_and(|text| text.contains(&value.to_lowercase())),
            Filter::GreaterThan { field, value } => {
                number_of(doc.get(field)).is_some_and(|n| n > *value)
            }
            Filter::IdEq(id) => doc.id == *id,
            Filter::Not(inner) => !inner.matches(doc),
            Filter::And(clauses) => clauses.iter().all(|c| c.matches(doc)),
            Filter::Or(clauses) => clauses.iter().any(|c| c.matches(doc)),
        }
    }
}

/// Lowercased text form of a scalar, mirroring Postgres `->>` on JSONB.
fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.to_lowercase()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn number_of(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(body: Value) -> RawDocument {
        RawDocument::new(DocumentId::new(), body)
    }

    #[test]
    fn eq_requires_exact_json_value() {
        let d = doc(json!({"isFeatured": true, "gender": "men"}));
        assert!(Filter::eq("isFeatured", true).matches(&d));
        assert!(!Filter::eq("isFeatured", "true").matches(&d));
        assert!(!Filter::eq("gender", "Men").matches(&d));
        assert!(!Filter::eq("missing", "x").matches(&d));
    }

    #[test]
    fn case_insensitive_predicates() {
        let d = doc(json!({"category": "Sneakers", "name": "Air Runner Pro"}));
        assert!(Filter::eq_ignore_case("category", "sneakers").matches(&d));
        assert!(Filter::prefix("category", "SNEAK").matches(&d));
        assert!(!Filter::prefix("category", "belt").matches(&d));
        assert!(Filter::contains("name", "runner").matches(&d));
        assert!(!Filter::contains("brand", "runner").matches(&d));
    }

    #[test]
    fn greater_than_ignores_non_numbers() {
        assert!(Filter::greater_than("stock", Decimal::ZERO).matches(&doc(json!({"stock": 3}))));
        assert!(!Filter::greater_than("stock", Decimal::ZERO).matches(&doc(json!({"stock": 0}))));
        assert!(!Filter::greater_than("stock", Decimal::ZERO).matches(&doc(json!({"stock": "9"}))));
    }

    #[test]
    fn not_treats_missing_field_as_non_match_of_inner() {
        let filter = Filter::not(Filter::eq_ignore_case("status", "cancelled"));
        assert!(filter.matches(&doc(json!({"status": "delivered"}))));
        assert!(filter.matches(&doc(json!({}))));
        assert!(!filter.matches(&doc(json!({"status": "Cancelled"}))));
    }

    #[test]
    fn and_simplifies_all_and_never() {
        assert_eq!(Filter::and(vec![]), Filter::All);
        assert_eq!(Filter::and(vec![Filter::All, Filter::All]), Filter::All);
        assert!(Filter::and(vec![Filter::eq("a", 1), Filter::Never]).is_never());
        assert_eq!(
            Filter::and(vec![Filter::All, Filter::eq("a", 1)]),
            Filter::eq("a", 1)
        );
    }

    #[test]
    fn id_eq_matches_document_identity() {
        let d = doc(json!({}));
        assert!(Filter::IdEq(d.id).matches(&d));
        assert!(!Filter::IdEq(DocumentId::new()).matches(&d));
    }
}
