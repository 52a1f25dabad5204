//! Schema adapters: one per schema generation per category.
//!
//! An adapter binds one physical collection to the canonical product shape.
//! It translates the shared [`ListFilters`] into a storage [`Filter`] for its
//! own field layout and normalizes raw documents. Both operations are pure;
//! fetching goes through the adapter's [`CollectionHandle`].

mod saree;
mod shoe;
mod standard;

pub use saree::SareeAdapter;
pub use shoe::ShoeAdapter;
pub use standard::StandardAdapter;

use vitrine_core::normalize::{
    collect_images, derive_prices, first_decimal, first_text, fold, parse_timestamp,
    stock_count, truthy, RawPrices,
};
use vitrine_core::{CanonicalProduct, Category, SchemaType};
use vitrine_db::{Collection, CollectionHandle, Filter, RawDocument};

use crate::query::ListFilters;

pub trait SchemaAdapter: Send + Sync {
    fn profile(&self) -> &SchemaProfile;

    fn handle(&self) -> &CollectionHandle;

    /// Storage filter for this adapter. Returns [`Filter::Never`] when the
    /// request asks for something this collection cannot hold.
    fn build_query(&self, filters: &ListFilters) -> Filter;

    /// Total: a document that cannot be read yields a degraded product.
    fn normalize(&self, doc: &RawDocument) -> CanonicalProduct;

    fn collection(&self) -> Collection {
        self.handle().collection()
    }

    fn category(&self) -> Category {
        self.profile().category
    }
}

/// How stored classification strings compare against folded filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatching {
    /// Legacy uploads kept whatever casing the operator typed.
    CaseInsensitive,
    /// Newer uploads store classification fields lowercase.
    Folded,
}

/// Static description of one schema generation's field layout.
#[derive(Debug)]
pub struct SchemaProfile {
    pub name: &'static str,
    pub collection: Collection,
    pub category: Category,
    pub schema_type: SchemaType,
    pub matching: TextMatching,
    pub has_category_id: bool,
    pub title_keys: &'static [&'static str],
    pub search_fields: &'static [&'static str],
    /// Field the document's own sub-classification is read from, in order.
    pub sub_category_keys: &'static [&'static str],
}

/// Equality clause on a classification field, honoring the profile's casing.
pub(crate) fn text_clause(profile: &SchemaProfile, field: &str, folded: &str) -> Filter {
    match profile.matching {
        TextMatching::CaseInsensitive => Filter::eq_ignore_case(field, folded),
        TextMatching::Folded => Filter::eq(field, folded),
    }
}

/// Clauses every adapter derives the same way: brand, `categoryId`, flags
/// and search.
pub(crate) fn common_clauses(profile: &SchemaProfile, filters: &ListFilters) -> Vec<Filter> {
    let mut clauses = Vec::new();

    if let Some(brand) = filters.brand() {
        clauses.push(text_clause(profile, "brand", &brand));
    }

    if let Some(category_id) = filters.category_id() {
        if profile.has_category_id {
            clauses.push(Filter::eq("categoryId", category_id));
        } else {
            clauses.push(Filter::Never);
        }
    }

    for (field, requested) in filters.flags() {
        if !requested {
            continue;
        }
        clauses.push(match profile.matching {
            // Legacy flags were stored as booleans or as "true" strings.
            TextMatching::CaseInsensitive => Filter::eq_ignore_case(field, "true"),
            TextMatching::Folded => Filter::eq(field, true),
        });
    }

    if let Some(term) = filters.search() {
        clauses.push(Filter::Or(
            profile
                .search_fields
                .iter()
                .map(|field| Filter::contains(field, term))
                .collect(),
        ));
    }

    clauses
}

/// Reads a document through a profile's layout.
pub(crate) fn normalize_document(profile: &SchemaProfile, doc: &RawDocument) -> CanonicalProduct {
    let Some(fields) = doc.fields() else {
        tracing::warn!(
            collection = %profile.collection,
            id = %doc.id,
            "document body is not an object; returning degraded product"
        );
        return CanonicalProduct::degraded(
            doc.id,
            profile.category,
            profile.schema_type,
            doc.created_at,
        );
    };

    let mut product = CanonicalProduct::new(doc.id, profile.category, profile.schema_type);
    if let Some(title) = first_text(fields, profile.title_keys) {
        product.title = title;
    }
    product.set_prices(derive_prices(RawPrices {
        mrp: first_decimal(fields, &["mrp"]),
        price: first_decimal(fields, &["price", "sellingPrice"]),
        final_price: first_decimal(fields, &["finalPrice", "salePrice"]),
        discount_percent: first_decimal(fields, &["discountPercent", "discount"]),
        original_price: first_decimal(fields, &["originalPrice"]),
    }));
    product.images = collect_images(fields);
    product.brand = first_text(fields, &["brand", "brandName"]);
    product.sub_category = first_text(fields, profile.sub_category_keys).map(|s| fold(&s));
    product.gender = first_text(fields, &["gender"]).map(|g| fold(&g));
    product.description = first_text(fields, &["description", "details"]);
    product.is_new_arrival = truthy(fields.get("isNewArrival"));
    product.on_sale = truthy(fields.get("onSale"));
    product.is_featured = truthy(fields.get("isFeatured"));
    product.stock = stock_count(
        ["stock", "quantity", "countInStock"]
            .iter()
            .find_map(|key| fields.get(*key).filter(|v| !v.is_null())),
    );
    product.created_at = fields
        .get("createdAt")
        .and_then(parse_timestamp)
        .or(doc.created_at);
    product
}

/// Whether `value` is a string equal to one of `tokens`.
pub(crate) fn is_token(value: &str, tokens: &[&str]) -> bool {
    tokens.contains(&value)
}
