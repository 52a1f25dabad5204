use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use vitrine_core::DocumentId;

/// A stored document as plain data, detached from the backend that held it.
///
/// Stores convert their native rows into this shape before anything else sees
/// them, so normalizers only ever deal with one representation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub id: DocumentId,
    /// Insertion time recorded by the store, when it tracks one.
    pub created_at: Option<DateTime<Utc>>,
    pub body: Value,
}

impl RawDocument {
    #[must_use]
    pub fn new(id: DocumentId, body: Value) -> Self {
        Self {
            id,
            created_at: None,
            body,
        }
    }

    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// The document body as a map, if it is one.
    #[must_use]
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.body.as_object()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }
}
