//! Postgres-backed [`DocumentStore`].
//!
//! All collections share the `documents` table; each row carries its
//! collection name and the raw JSONB body.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use vitrine_core::DocumentId;

use crate::sql::push_filter;
use crate::store::require_object;
use crate::{Collection, DbError, DocumentStore, Filter, RawDocument};

/// A row from the `documents` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    doc: Json<Value>,
    created_at: DateTime<Utc>,
}

impl From<DocumentRow> for RawDocument {
    fn from(row: DocumentRow) -> Self {
        RawDocument::new(DocumentId::from(row.id), row.doc.0).with_created_at(row.created_at)
    }
}

#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Starts a query scoped to `collection` and narrowed by `filter`.
fn scoped<'a>(select: &str, collection: Collection, filter: &Filter) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(select);
    qb.push(" FROM documents WHERE collection = ");
    qb.push_bind(collection.as_str());
    qb.push(" AND (");
    push_filter(&mut qb, filter);
    qb.push(")");
    qb
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<RawDocument>, DbError> {
        if filter.is_never() {
            return Ok(Vec::new());
        }
        let mut qb = scoped("SELECT id, doc, created_at", collection, filter);
        qb.push(" ORDER BY created_at, id");
        let rows = qb
            .build_query_as::<DocumentRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(RawDocument::from).collect())
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Option<RawDocument>, DbError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, doc, created_at FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(RawDocument::from))
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, DbError> {
        if filter.is_never() {
            return Ok(0);
        }
        let n: i64 = scoped("SELECT COUNT(*)", collection, filter)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(n).unwrap_or(0))
    }

    async fn sum(
        &self,
        collection: Collection,
        filter: &Filter,
        field: &str,
    ) -> Result<Decimal, DbError> {
        if filter.is_never() {
            return Ok(Decimal::ZERO);
        }
        let mut qb = QueryBuilder::new("SELECT COALESCE(SUM(CASE WHEN jsonb_typeof(doc -> ");
        qb.push_bind(field.to_string());
        qb.push(") = 'number' THEN (doc ->> ");
        qb.push_bind(field.to_string());
        qb.push(")::numeric ELSE 0 END), 0) FROM documents WHERE collection = ");
        qb.push_bind(collection.as_str());
        qb.push(" AND (");
        push_filter(&mut qb, filter);
        qb.push(")");
        let total: Decimal = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn create(&self, collection: Collection, body: Value) -> Result<RawDocument, DbError> {
        require_object(&body)?;
        let now = Utc::now();
        let mut body = body;
        if let Some(fields) = body.as_object_mut() {
            fields
                .entry("createdAt")
                .or_insert_with(|| Value::String(now.to_rfc3339()));
        }
        let row = sqlx::query_as::<_, DocumentRow>(
            "INSERT INTO documents (id, collection, doc, created_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, doc, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(collection.as_str())
        .bind(Json(&body))
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update(
        &self,
        collection: Collection,
        id: DocumentId,
        patch: Value,
    ) -> Result<Option<RawDocument>, DbError> {
        if !patch.is_object() {
            return Err(DbError::InvalidDocument(
                "update patch must be a JSON object".to_string(),
            ));
        }
        // jsonb `||` on two objects is a shallow merge.
        let row = sqlx::query_as::<_, DocumentRow>(
            "UPDATE documents SET doc = doc || $3, updated_at = NOW() \
             WHERE collection = $1 AND id = $2 \
             RETURNING id, doc, created_at",
        )
        .bind(collection.as_str())
        .bind(id.as_uuid())
        .bind(Json(&patch))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(RawDocument::from))
    }

    async fn delete(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Option<RawDocument>, DbError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "DELETE FROM documents WHERE collection = $1 AND id = $2 \
             RETURNING id, doc, created_at",
        )
        .bind(collection.as_str())
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(RawDocument::from))
    }

    async fn insert_many(
        &self,
        collection: Collection,
        docs: Vec<RawDocument>,
    ) -> Result<usize, DbError> {
        for doc in &docs {
            require_object(&doc.body)?;
        }
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        for doc in &docs {
            sqlx::query(
                "INSERT INTO documents (id, collection, doc, created_at) \
                 VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (collection, id) DO UPDATE SET \
                     doc = EXCLUDED.doc, \
                     updated_at = NOW()",
            )
            .bind(doc.id.as_uuid())
            .bind(collection.as_str())
            .bind(Json(&doc.body))
            .bind(doc.created_at.unwrap_or(now))
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(docs.len())
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
