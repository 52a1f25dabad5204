use std::sync::Arc;

use vitrine_core::{CanonicalProduct, Category, SchemaType};
use vitrine_db::{Collection, CollectionHandle, DocumentStore, Filter, RawDocument};

use super::{common_clauses, is_token, normalize_document, SchemaAdapter, SchemaProfile, TextMatching};
use crate::query::ListFilters;

static SAREE: SchemaProfile = SchemaProfile {
    name: "saree",
    collection: Collection::Sarees,
    category: Category::Women,
    schema_type: SchemaType::Saree,
    matching: TextMatching::Folded,
    has_category_id: true,
    title_keys: &["title", "name"],
    search_fields: &["title", "name", "brand", "description", "fabric"],
    sub_category_keys: &[],
};

const SAREE_TOKENS: &[&str] = &["saree", "sarees", "sari", "saris"];

const WOMEN_TOKENS: &[&str] = &["women", "woman", "womens", "female", "ladies"];

/// Adapter for the `sarees` collection, served under women.
///
/// Every document in the collection is a saree for women, so classification
/// filters either confirm that (no clause) or rule the collection out.
#[derive(Debug)]
pub struct SareeAdapter {
    handle: CollectionHandle,
}

impl SareeAdapter {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            handle: CollectionHandle::new(store, SAREE.collection),
        }
    }
}

impl SchemaAdapter for SareeAdapter {
    fn profile(&self) -> &SchemaProfile {
        &SAREE
    }

    fn handle(&self) -> &CollectionHandle {
        &self.handle
    }

    fn build_query(&self, filters: &ListFilters) -> Filter {
        let classification = [filters.category(), filters.sub_category()];
        if classification
            .iter()
            .flatten()
            .any(|value| !is_token(value, SAREE_TOKENS))
        {
            return Filter::Never;
        }
        if filters
            .gender()
            .is_some_and(|gender| !is_token(&gender, WOMEN_TOKENS))
        {
            return Filter::Never;
        }
        Filter::and(common_clauses(&SAREE, filters))
    }

    fn normalize(&self, doc: &RawDocument) -> CanonicalProduct {
        let mut product = normalize_document(&SAREE, doc);
        product.sub_category = Some("saree".to_string());
        if product.gender.is_none() {
            product.gender = Some("women".to_string());
        }
        product
    }
}
