//! Catalog read and admin write paths.
//!
//! Listing is availability-first: source failures shrink the result and any
//! panic in the pipeline yields an empty page. Lookup and admin writes are
//! correctness-first and surface classified errors.

use std::cmp::Ordering;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use futures::FutureExt;
use icu_collator::{Collator, CollatorOptions, Strength};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use vitrine_core::{CanonicalProduct, CatalogError, DocumentId, Pagination, ProductPage};
use vitrine_db::{DbError, DocumentStore, RawDocument};

use crate::adapters::SchemaAdapter;
use crate::query::{ListQuery, SortField, SortOrder};
use crate::registry::{AdapterSet, CategoryRegistry};
use crate::source::{absorb_source_error, fetch_with_timeout};
use crate::summary::{summarize, DashboardSummary};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// The catalog service: a registry of adapters over one document store.
pub struct Catalog {
    store: Arc<dyn DocumentStore>,
    registry: CategoryRegistry,
    store_timeout: Duration,
}

impl Catalog {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, store_timeout: Duration) -> Self {
        Self {
            registry: CategoryRegistry::new(store.clone()),
            store,
            store_timeout,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    #[must_use]
    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    /// Lists one page of a category, merged across its schema generations.
    ///
    /// # Errors
    ///
    /// Only category resolution fails: [`CatalogError::MissingCategory`] or
    /// [`CatalogError::UnsupportedCategory`].
    pub async fn list_products(
        &self,
        category: &str,
        query: &ListQuery,
    ) -> Result<ProductPage, CatalogError> {
        let set = self.registry.resolve(category)?;
        match AssertUnwindSafe(self.run_listing(set, query))
            .catch_unwind()
            .await
        {
            Ok(page) => Ok(page),
            Err(_) => {
                error!(
                    category = set.name,
                    "listing pipeline panicked; returning empty page"
                );
                Ok(ProductPage::empty())
            }
        }
    }

    async fn run_listing(&self, set: &AdapterSet, query: &ListQuery) -> ProductPage {
        let fetches = set.adapters.iter().map(|adapter| {
            let filter = adapter.build_query(&query.filters);
            async move {
                if filter.is_never() {
                    return Vec::new();
                }
                let handle = adapter.handle();
                let result = fetch_with_timeout(self.store_timeout, handle.find(&filter)).await;
                absorb_source_error(handle.collection(), result)
            }
        });
        let fetched = join_all(fetches).await;

        let mut merged = Vec::new();
        for (adapter, docs) in set.adapters.iter().zip(fetched) {
            debug!(
                collection = %adapter.collection(),
                count = docs.len(),
                "fetched source documents"
            );
            merged.extend(docs.iter().map(|doc| adapter.normalize(doc)));
        }

        sort_products(&mut merged, query.sort, query.order);
        paginate(merged, query.page, query.limit)
    }

    /// Fetches one product by id, consulting the category's adapters in
    /// registry order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidId`] for a malformed id, a category
    /// resolution error, or [`CatalogError::NotFound`] when no adapter holds
    /// the id.
    pub async fn get_product(
        &self,
        category: &str,
        id: &str,
    ) -> Result<CanonicalProduct, CatalogError> {
        let id = DocumentId::parse(id)?;
        let set = self.registry.resolve(category)?;

        let lookups = set.adapters.iter().map(|adapter| async move {
            let handle = adapter.handle();
            let result = fetch_with_timeout(self.store_timeout, handle.find_by_id(id)).await;
            absorb_source_error(handle.collection(), result)
        });
        let found = join_all(lookups).await;

        set.adapters
            .iter()
            .zip(found)
            .find_map(|(adapter, doc)| doc.map(|doc| adapter.normalize(&doc)))
            .ok_or_else(|| CatalogError::NotFound {
                category: set.name.to_string(),
                id: id.to_string(),
            })
    }

    /// Admin dashboard figures; never fails. A panic while aggregating
    /// yields an all-zero summary.
    pub async fn summary(&self) -> DashboardSummary {
        match AssertUnwindSafe(summarize(self.store.as_ref(), self.store_timeout))
            .catch_unwind()
            .await
        {
            Ok(summary) => summary,
            Err(_) => {
                error!("summary aggregation panicked; returning zeroed figures");
                DashboardSummary::default()
            }
        }
    }

    /// Creates a product in the alias's write target.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidDocument`] unless `body` is a JSON
    /// object, a category resolution error, or [`CatalogError::Storage`].
    pub async fn create_product(
        &self,
        category: &str,
        body: Value,
    ) -> Result<CanonicalProduct, CatalogError> {
        let set = self.registry.resolve(category)?;
        if !body.is_object() {
            return Err(CatalogError::InvalidDocument(
                "product body must be a JSON object".to_string(),
            ));
        }
        let adapter = write_adapter(set)?;
        let doc = self
            .store
            .create(set.write_target, body)
            .await
            .map_err(storage_error)?;
        info!(collection = %set.write_target, id = %doc.id, "created product");
        Ok(adapter.normalize(&doc))
    }

    /// Shallow-merges `patch` into the product with `id`, wherever in the
    /// category it lives.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidId`], [`CatalogError::InvalidDocument`]
    /// for a non-object patch, [`CatalogError::NotFound`], a category
    /// resolution error, or [`CatalogError::Storage`].
    pub async fn update_product(
        &self,
        category: &str,
        id: &str,
        patch: Value,
    ) -> Result<CanonicalProduct, CatalogError> {
        let id = DocumentId::parse(id)?;
        let set = self.registry.resolve(category)?;
        if !patch.is_object() {
            return Err(CatalogError::InvalidDocument(
                "update patch must be a JSON object".to_string(),
            ));
        }
        let owner = self.find_owner(set, id).await?;
        let doc = self
            .store
            .update(owner.collection(), id, patch)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| not_found(set, id))?;
        info!(collection = %owner.collection(), %id, "updated product");
        Ok(owner.normalize(&doc))
    }

    /// Deletes the product with `id`, returning it as it was.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidId`], [`CatalogError::NotFound`], a
    /// category resolution error, or [`CatalogError::Storage`].
    pub async fn delete_product(
        &self,
        category: &str,
        id: &str,
    ) -> Result<CanonicalProduct, CatalogError> {
        let id = DocumentId::parse(id)?;
        let set = self.registry.resolve(category)?;
        let owner = self.find_owner(set, id).await?;
        let doc = self
            .store
            .delete(owner.collection(), id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| not_found(set, id))?;
        info!(collection = %owner.collection(), %id, "deleted product");
        Ok(owner.normalize(&doc))
    }

    /// First adapter in registry order holding `id`. Store errors propagate:
    /// a write must not guess which collection owns a record.
    async fn find_owner<'a>(
        &self,
        set: &'a AdapterSet,
        id: DocumentId,
    ) -> Result<&'a Arc<dyn SchemaAdapter>, CatalogError> {
        for adapter in &set.adapters {
            let found: Option<RawDocument> = adapter
                .handle()
                .find_by_id(id)
                .await
                .map_err(storage_error)?;
            if found.is_some() {
                return Ok(adapter);
            }
        }
        Err(not_found(set, id))
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("registry", &self.registry)
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

fn write_adapter(set: &AdapterSet) -> Result<&Arc<dyn SchemaAdapter>, CatalogError> {
    set.adapter_for(set.write_target).ok_or_else(|| {
        CatalogError::Storage(format!(
            "no adapter reads write target {} for {}",
            set.write_target, set.name
        ))
    })
}

fn not_found(set: &AdapterSet, id: DocumentId) -> CatalogError {
    CatalogError::NotFound {
        category: set.name.to_string(),
        id: id.to_string(),
    }
}

fn storage_error(e: DbError) -> CatalogError {
    match e {
        DbError::InvalidDocument(reason) => CatalogError::InvalidDocument(reason),
        other => CatalogError::Storage(other.to_string()),
    }
}

/// Stable sort on one field. Descending reverses the comparator, so equal
/// keys keep their merge order either way.
pub fn sort_products(products: &mut [CanonicalProduct], field: SortField, order: SortOrder) {
    let collator = match field {
        SortField::Title | SortField::Name => title_collator(),
        _ => None,
    };
    products.sort_by(|a, b| {
        let ordering = compare(a, b, field, collator.as_ref());
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Root-locale collation at secondary strength: accents count, case does not.
fn title_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Secondary);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            warn!(error = ?e, "title collation unavailable; comparing lowercase text");
            None
        }
    }
}

fn compare(
    a: &CanonicalProduct,
    b: &CanonicalProduct,
    field: SortField,
    collator: Option<&Collator>,
) -> Ordering {
    match field {
        SortField::Price | SortField::Mrp => a.mrp.cmp(&b.mrp),
        SortField::DiscountPercent => a.discount_percent.cmp(&b.discount_percent),
        SortField::Title | SortField::Name => match collator {
            Some(collator) => collator.compare(&a.title, &b.title),
            None => a
                .title
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.title.chars().flat_map(char::to_lowercase)),
        },
        SortField::CreatedAt => a.created_at_millis().cmp(&b.created_at_millis()),
    }
}

/// Slices an already sorted list. `page` and `limit` are at least 1.
#[must_use]
pub fn paginate(products: Vec<CanonicalProduct>, page: u32, limit: u32) -> ProductPage {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = u64::try_from(products.len()).unwrap_or(u64::MAX);
    let skip = usize::try_from(page - 1)
        .unwrap_or(usize::MAX)
        .saturating_mul(usize::try_from(limit).unwrap_or(usize::MAX));
    let take = usize::try_from(limit).unwrap_or(usize::MAX);

    ProductPage {
        products: products.into_iter().skip(skip).take(take).collect(),
        pagination: Pagination {
            page,
            limit,
            total,
            pages: total.div_ceil(u64::from(limit)),
        },
    }
}
