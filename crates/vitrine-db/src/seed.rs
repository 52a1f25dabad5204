use serde_json::Value;
use tracing::info;
use uuid::Uuid;
use vitrine_core::{normalize::parse_timestamp, CatalogFixtures, DocumentId};

use crate::{Collection, DbError, DocumentStore, RawDocument};

/// Load fixture documents into `store`, one collection at a time.
///
/// A document keeps its `id` (or `_id`) when that is a UUID. Otherwise its id
/// is derived from the collection name and position, so reseeding the same
/// file replaces rather than duplicates. Returns the number of documents
/// written.
///
/// # Errors
///
/// Returns [`DbError::UnknownCollection`] for a collection name the catalog
/// does not know, before anything is written, or the store's error if an
/// insert fails.
pub async fn seed_collections(
    store: &dyn DocumentStore,
    fixtures: &CatalogFixtures,
) -> Result<usize, DbError> {
    let mut batches = Vec::with_capacity(fixtures.collections.len());
    for (name, docs) in &fixtures.collections {
        let collection: Collection = name.parse()?;
        let batch: Vec<RawDocument> = docs
            .iter()
            .enumerate()
            .map(|(index, body)| seed_document(collection, index, body))
            .collect();
        batches.push((collection, batch));
    }

    let mut total = 0usize;
    for (collection, batch) in batches {
        let written = store.insert_many(collection, batch).await?;
        info!(%collection, written, "seeded collection");
        total += written;
    }
    Ok(total)
}

fn seed_document(collection: Collection, index: usize, body: &Value) -> RawDocument {
    let id = ["id", "_id"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .find_map(|raw| DocumentId::parse(raw).ok())
        .unwrap_or_else(|| {
            let name = format!("vitrine/{collection}/{index}");
            DocumentId::from(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
        });
    let doc = RawDocument::new(id, body.clone());
    match body.get("createdAt").and_then(parse_timestamp) {
        Some(created_at) => doc.with_created_at(created_at),
        None => doc,
    }
}
