use std::sync::Arc;

use vitrine_core::{CanonicalProduct, Category, SchemaType};
use vitrine_db::{Collection, CollectionHandle, DocumentStore, Filter, RawDocument};

use super::{
    common_clauses, normalize_document, text_clause, SchemaAdapter, SchemaProfile, TextMatching,
};
use crate::query::ListFilters;

pub(crate) static LEGACY_WATCH: SchemaProfile = SchemaProfile {
    name: "legacy-watch",
    collection: Collection::Watches,
    category: Category::Watches,
    schema_type: SchemaType::Old,
    matching: TextMatching::CaseInsensitive,
    has_category_id: false,
    title_keys: &["name", "title"],
    search_fields: &["name", "brand", "description"],
    sub_category_keys: &["subCategory", "category"],
};

pub(crate) static NEW_WATCH: SchemaProfile = SchemaProfile {
    name: "new-watch",
    collection: Collection::NewWatches,
    category: Category::Watches,
    schema_type: SchemaType::New,
    matching: TextMatching::Folded,
    has_category_id: true,
    title_keys: &["title", "name"],
    search_fields: &["title", "name", "brand", "description"],
    sub_category_keys: &["subCategory"],
};

pub(crate) static LEGACY_ACCESSORY: SchemaProfile = SchemaProfile {
    name: "legacy-accessory",
    collection: Collection::Accessories,
    category: Category::Accessories,
    schema_type: SchemaType::Old,
    matching: TextMatching::CaseInsensitive,
    has_category_id: false,
    title_keys: &["name", "title"],
    search_fields: &["name", "brand", "description"],
    sub_category_keys: &["subCategory", "category"],
};

pub(crate) static LEGACY_WOMEN: SchemaProfile = SchemaProfile {
    name: "legacy-women",
    collection: Collection::Women,
    category: Category::Women,
    schema_type: SchemaType::Old,
    matching: TextMatching::CaseInsensitive,
    has_category_id: false,
    title_keys: &["name", "title"],
    search_fields: &["name", "brand", "description"],
    sub_category_keys: &["subCategory", "category"],
};

pub(crate) static SKINCARE: SchemaProfile = SchemaProfile {
    name: "skincare",
    collection: Collection::Skincare,
    category: Category::Skincare,
    schema_type: SchemaType::Skincare,
    matching: TextMatching::Folded,
    has_category_id: true,
    title_keys: &["title", "name"],
    search_fields: &["title", "name", "brand", "description"],
    sub_category_keys: &["subCategory", "category"],
};

/// Adapter for schemas whose classification fields map one-to-one onto the
/// shared filters.
#[derive(Debug)]
pub struct StandardAdapter {
    profile: &'static SchemaProfile,
    handle: CollectionHandle,
}

impl StandardAdapter {
    #[must_use]
    pub fn with_profile(profile: &'static SchemaProfile, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            profile,
            handle: CollectionHandle::new(store, profile.collection),
        }
    }

    /// `watches`: `name`, `price`, free-cased `gender`/`category`.
    #[must_use]
    pub fn legacy_watch(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_profile(&LEGACY_WATCH, store)
    }

    /// `new_watches`: `title`, `mrp` plus discount, lowercase classification.
    #[must_use]
    pub fn new_watch(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_profile(&NEW_WATCH, store)
    }

    #[must_use]
    pub fn legacy_accessory(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_profile(&LEGACY_ACCESSORY, store)
    }

    #[must_use]
    pub fn legacy_women(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_profile(&LEGACY_WOMEN, store)
    }

    #[must_use]
    pub fn skincare(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_profile(&SKINCARE, store)
    }
}

impl SchemaAdapter for StandardAdapter {
    fn profile(&self) -> &SchemaProfile {
        self.profile
    }

    fn handle(&self) -> &CollectionHandle {
        &self.handle
    }

    fn build_query(&self, filters: &ListFilters) -> Filter {
        let mut clauses = Vec::new();
        for (field, value) in [
            ("gender", filters.gender()),
            ("subCategory", filters.sub_category()),
            ("category", filters.category()),
        ] {
            if let Some(value) = value {
                clauses.push(text_clause(self.profile, field, &value));
            }
        }
        clauses.extend(common_clauses(self.profile, filters));
        Filter::and(clauses)
    }

    fn normalize(&self, doc: &RawDocument) -> CanonicalProduct {
        normalize_document(self.profile, doc)
    }
}
