use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use vitrine_core::DocumentId;

use crate::{Collection, DbError, Filter, RawDocument};

/// Capability interface over a document database.
///
/// Implementations must be safe to share across request tasks. Reads return
/// documents in the store's natural order; callers sort.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in `collection` matching `filter`.
    async fn find(&self, collection: Collection, filter: &Filter)
        -> Result<Vec<RawDocument>, DbError>;

    async fn find_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Option<RawDocument>, DbError>;

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, DbError>;

    /// Sum of a numeric field over matching documents. Non-numeric or missing
    /// values contribute nothing.
    async fn sum(
        &self,
        collection: Collection,
        filter: &Filter,
        field: &str,
    ) -> Result<Decimal, DbError>;

    /// Inserts a new document under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidDocument`] unless `body` is a JSON object.
    async fn create(&self, collection: Collection, body: Value) -> Result<RawDocument, DbError>;

    /// Shallow-merges `patch` into an existing document. Returns `None` when
    /// no document has that id.
    async fn update(
        &self,
        collection: Collection,
        id: DocumentId,
        patch: Value,
    ) -> Result<Option<RawDocument>, DbError>;

    /// Removes a document, returning it if it existed.
    async fn delete(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Option<RawDocument>, DbError>;

    /// Inserts documents whose ids are already assigned, replacing any
    /// existing document with the same id.
    async fn insert_many(
        &self,
        collection: Collection,
        docs: Vec<RawDocument>,
    ) -> Result<usize, DbError>;

    async fn ping(&self) -> Result<(), DbError>;
}

/// A read handle bound to one collection.
///
/// Schema adapters hold one of these so they never need to know which
/// backend, or which other collections, exist.
#[derive(Clone)]
pub struct CollectionHandle {
    store: Arc<dyn DocumentStore>,
    collection: Collection,
}

impl CollectionHandle {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, collection: Collection) -> Self {
        Self { store, collection }
    }

    #[must_use]
    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// # Errors
    ///
    /// Propagates the backend's [`DbError`].
    pub async fn find(&self, filter: &Filter) -> Result<Vec<RawDocument>, DbError> {
        self.store.find(self.collection, filter).await
    }

    /// # Errors
    ///
    /// Propagates the backend's [`DbError`].
    pub async fn find_by_id(&self, id: DocumentId) -> Result<Option<RawDocument>, DbError> {
        self.store.find_by_id(self.collection, id).await
    }

    /// # Errors
    ///
    /// Propagates the backend's [`DbError`].
    pub async fn count(&self, filter: &Filter) -> Result<u64, DbError> {
        self.store.count(self.collection, filter).await
    }
}

impl std::fmt::Debug for CollectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionHandle")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

/// Ensures a document body is an object, the only shape stores accept.
pub(crate) fn require_object(body: &Value) -> Result<(), DbError> {
    if body.is_object() {
        Ok(())
    } else {
        Err(DbError::InvalidDocument(
            "document body must be a JSON object".to_string(),
        ))
    }
}

/// Shallow merge of `patch` into `target`; both must be objects.
pub(crate) fn merge_patch(target: &mut Value, patch: Value) -> Result<(), DbError> {
    let Value::Object(patch) = patch else {
        return Err(DbError::InvalidDocument(
            "update patch must be a JSON object".to_string(),
        ));
    };
    let Some(fields) = target.as_object_mut() else {
        return Err(DbError::InvalidDocument(
            "stored document is not a JSON object".to_string(),
        ));
    };
    for (key, value) in patch {
        fields.insert(key, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_patch_overwrites_and_adds_top_level_keys() {
        let mut doc = json!({"name": "Old", "price": 10, "meta": {"a": 1}});
        merge_patch(&mut doc, json!({"price": 12, "brand": "Acme", "meta": {"b": 2}}))
            .expect("merge");
        assert_eq!(
            doc,
            json!({"name": "Old", "price": 12, "brand": "Acme", "meta": {"b": 2}})
        );
    }

    #[test]
    fn merge_patch_rejects_non_objects() {
        let mut doc = json!({"name": "x"});
        assert!(matches!(
            merge_patch(&mut doc, json!([1, 2])),
            Err(DbError::InvalidDocument(_))
        ));
        assert!(require_object(&json!("text")).is_err());
        assert!(require_object(&json!({})).is_ok());
    }
}
