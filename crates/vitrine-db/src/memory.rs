//! In-process [`DocumentStore`] used by tests and local demos.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use vitrine_core::DocumentId;

use crate::filter::number_of;
use crate::store::{merge_patch, require_object};
use crate::{Collection, DbError, DocumentStore, Filter, RawDocument};

#[derive(Default)]
struct Inner {
    docs: HashMap<Collection, Vec<RawDocument>>,
    unavailable: HashSet<Collection>,
    latency: HashMap<Collection, Duration>,
}

/// Documents held in insertion order per collection.
///
/// Collections can be marked unavailable or slow to exercise the catalog's
/// failure isolation.
#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<Inner>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every operation on `collection` fail with [`DbError::Unavailable`].
    pub fn set_unavailable(&self, collection: Collection, unavailable: bool) {
        if let Ok(mut inner) = self.inner.write() {
            if unavailable {
                inner.unavailable.insert(collection);
            } else {
                inner.unavailable.remove(&collection);
            }
        }
    }

    /// Delays every read of `collection` by `delay`.
    pub fn set_latency(&self, collection: Collection, delay: Duration) {
        if let Ok(mut inner) = self.inner.write() {
            inner.latency.insert(collection, delay);
        }
    }

    /// Checks availability and returns the configured delay for `collection`.
    fn gate(&self, collection: Collection) -> Result<Option<Duration>, DbError> {
        let inner = self.read()?;
        if inner.unavailable.contains(&collection) {
            return Err(DbError::Unavailable(collection.to_string()));
        }
        Ok(inner.latency.get(&collection).copied())
    }

    async fn enter(&self, collection: Collection) -> Result<(), DbError> {
        if let Some(delay) = self.gate(collection)? {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, DbError> {
        self.inner
            .read()
            .map_err(|_| DbError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, DbError> {
        self.inner
            .write()
            .map_err(|_| DbError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn matching(&self, collection: Collection, filter: &Filter) -> Result<Vec<RawDocument>, DbError> {
        let inner = self.read()?;
        Ok(inner
            .docs
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<RawDocument>, DbError> {
        self.enter(collection).await?;
        self.matching(collection, filter)
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Option<RawDocument>, DbError> {
        self.enter(collection).await?;
        Ok(self
            .matching(collection, &Filter::IdEq(id))?
            .into_iter()
            .next())
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, DbError> {
        self.enter(collection).await?;
        let n = self.matching(collection, filter)?.len();
        Ok(u64::try_from(n).unwrap_or(u64::MAX))
    }

    async fn sum(
        &self,
        collection: Collection,
        filter: &Filter,
        field: &str,
    ) -> Result<Decimal, DbError> {
        self.enter(collection).await?;
        self.matching(collection, filter)?
            .iter()
            .filter_map(|d| number_of(d.get(field)))
            .try_fold(Decimal::ZERO, |total, n| total.checked_add(n))
            .ok_or_else(|| {
                DbError::InvalidDocument(format!("sum of {field} in {collection} overflows"))
            })
    }

    async fn create(&self, collection: Collection, body: Value) -> Result<RawDocument, DbError> {
        self.enter(collection).await?;
        require_object(&body)?;
        let now = Utc::now();
        let mut body = body;
        if let Some(fields) = body.as_object_mut() {
            fields
                .entry("createdAt")
                .or_insert_with(|| Value::String(now.to_rfc3339()));
        }
        let doc = RawDocument::new(DocumentId::new(), body).with_created_at(now);
        self.write()?
            .docs
            .entry(collection)
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn update(
        &self,
        collection: Collection,
        id: DocumentId,
        patch: Value,
    ) -> Result<Option<RawDocument>, DbError> {
        self.enter(collection).await?;
        let mut inner = self.write()?;
        let Some(doc) = inner
            .docs
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
        else {
            return Ok(None);
        };
        merge_patch(&mut doc.body, patch)?;
        Ok(Some(doc.clone()))
    }

    async fn delete(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Option<RawDocument>, DbError> {
        self.enter(collection).await?;
        let mut inner = self.write()?;
        let Some(docs) = inner.docs.get_mut(&collection) else {
            return Ok(None);
        };
        Ok(docs
            .iter()
            .position(|d| d.id == id)
            .map(|index| docs.remove(index)))
    }

    async fn insert_many(
        &self,
        collection: Collection,
        docs: Vec<RawDocument>,
    ) -> Result<usize, DbError> {
        self.enter(collection).await?;
        for doc in &docs {
            require_object(&doc.body)?;
        }
        let mut inner = self.write()?;
        let stored = inner.docs.entry(collection).or_default();
        let count = docs.len();
        for doc in docs {
            if let Some(existing) = stored.iter_mut().find(|d| d.id == doc.id) {
                *existing = doc;
            } else {
                stored.push(doc);
            }
        }
        Ok(count)
    }

    async fn ping(&self) -> Result<(), DbError> {
        self.read().map(|_| ())
    }
}
