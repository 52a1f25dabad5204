use std::sync::Arc;

use vitrine_core::{CanonicalProduct, Category, SchemaType};
use vitrine_db::{Collection, CollectionHandle, DocumentStore, Filter, RawDocument};

use super::{
    common_clauses, is_token, normalize_document, text_clause, SchemaAdapter, SchemaProfile,
    TextMatching,
};
use crate::query::ListFilters;

static SHOE: SchemaProfile = SchemaProfile {
    name: "shoe",
    collection: Collection::Shoes,
    category: Category::Accessories,
    schema_type: SchemaType::Shoe,
    matching: TextMatching::Folded,
    has_category_id: true,
    title_keys: &["title", "name"],
    search_fields: &["title", "name", "brand", "description"],
    sub_category_keys: &[],
};

/// Values that name the shoe path as a whole rather than a style.
const SHOE_TOKENS: &[&str] = &["shoe", "shoes", "footwear"];

/// Accessory categories the shoe collection never holds.
const NON_SHOE_ACCESSORIES: &[&str] = &[
    "belt",
    "belts",
    "wallet",
    "wallets",
    "bag",
    "bags",
    "handbag",
    "handbags",
    "sunglasses",
    "eyewear",
    "cap",
    "caps",
    "hat",
    "hats",
    "jewellery",
    "jewelry",
    "perfume",
    "perfumes",
    "tie",
    "ties",
    "socks",
];

/// Adapter for the `shoes` collection, served under accessories.
///
/// The shoe schema stores its style (`sneakers`, `loafers`, ...) in
/// `category`, so a `category` filter is a prefix match on the style unless
/// it names another accessory type, in which case nothing can match.
#[derive(Debug)]
pub struct ShoeAdapter {
    handle: CollectionHandle,
}

impl ShoeAdapter {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            handle: CollectionHandle::new(store, SHOE.collection),
        }
    }
}

impl SchemaAdapter for ShoeAdapter {
    fn profile(&self) -> &SchemaProfile {
        &SHOE
    }

    fn handle(&self) -> &CollectionHandle {
        &self.handle
    }

    fn build_query(&self, filters: &ListFilters) -> Filter {
        let mut clauses = Vec::new();

        if let Some(sub_category) = filters.sub_category() {
            if !is_token(&sub_category, SHOE_TOKENS) {
                return Filter::Never;
            }
        }

        if let Some(category) = filters.category() {
            if is_token(&category, NON_SHOE_ACCESSORIES) {
                return Filter::Never;
            }
            if !is_token(&category, SHOE_TOKENS) {
                clauses.push(Filter::prefix("category", &category));
            }
        }

        if let Some(gender) = filters.gender() {
            clauses.push(text_clause(&SHOE, "gender", &gender));
        }

        clauses.extend(common_clauses(&SHOE, filters));
        Filter::and(clauses)
    }

    fn normalize(&self, doc: &RawDocument) -> CanonicalProduct {
        let mut product = normalize_document(&SHOE, doc);
        product.sub_category = Some("shoes".to_string());
        product
    }
}
