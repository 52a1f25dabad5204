use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::normalize::PriceFields;
use crate::{Category, DocumentId, SchemaType};

/// A product in the one shape every schema generation is normalized into.
///
/// `title` is exposed to clients under both `title` and `name`. Prices obey
/// `mrp >= 0`, `final_price >= 0` and `0 <= discount_percent <= 100`; the
/// constructors in [`crate::normalize`] enforce this.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalProduct {
    pub id: DocumentId,
    pub title: String,
    pub mrp: Decimal,
    pub final_price: Decimal,
    pub discount_percent: Decimal,
    pub original_price: Decimal,
    pub images: Vec<String>,
    pub brand: Option<String>,
    pub category: Category,
    pub sub_category: Option<String>,
    pub gender: Option<String>,
    pub description: Option<String>,
    pub is_new_arrival: bool,
    pub on_sale: bool,
    pub is_featured: bool,
    pub stock: i64,
    pub schema_type: SchemaType,
    pub created_at: Option<DateTime<Utc>>,
}

impl CanonicalProduct {
    /// Empty product carrying only identity and provenance; adapters fill in
    /// the rest.
    #[must_use]
    pub fn new(id: DocumentId, category: Category, schema_type: SchemaType) -> Self {
        let prices = PriceFields::zero();
        Self {
            id,
            title: placeholder_title(category),
            mrp: prices.mrp,
            final_price: prices.final_price,
            discount_percent: prices.discount_percent,
            original_price: prices.original_price,
            images: Vec::new(),
            brand: None,
            category,
            sub_category: None,
            gender: None,
            description: None,
            is_new_arrival: false,
            on_sale: false,
            is_featured: false,
            stock: 0,
            schema_type,
            created_at: None,
        }
    }

    /// Best-effort stand-in for a record that could not be normalized.
    #[must_use]
    pub fn degraded(
        id: DocumentId,
        category: Category,
        schema_type: SchemaType,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            created_at,
            ..Self::new(id, category, schema_type)
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.title
    }

    pub fn set_prices(&mut self, prices: PriceFields) {
        self.mrp = prices.mrp;
        self.final_price = prices.final_price;
        self.discount_percent = prices.discount_percent;
        self.original_price = prices.original_price;
    }

    /// Milliseconds since the epoch, with a missing timestamp sorting as 0.
    #[must_use]
    pub fn created_at_millis(&self) -> i64 {
        self.created_at.map_or(0, |ts| ts.timestamp_millis())
    }
}

/// Fallback display name for records with neither `name` nor `title`.
#[must_use]
pub fn placeholder_title(category: Category) -> String {
    format!("Untitled {} product", category.singular_label())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductWire<'a> {
    id: DocumentId,
    title: &'a str,
    name: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    mrp: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    final_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    discount_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    original_price: Decimal,
    images: &'a [String],
    brand: Option<&'a str>,
    category: Category,
    sub_category: Option<&'a str>,
    gender: Option<&'a str>,
    description: Option<&'a str>,
    is_new_arrival: bool,
    on_sale: bool,
    is_featured: bool,
    stock: i64,
    schema_type: SchemaType,
    created_at: Option<DateTime<Utc>>,
}

impl Serialize for CanonicalProduct {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ProductWire {
            id: self.id,
            title: &self.title,
            name: &self.title,
            mrp: self.mrp,
            final_price: self.final_price,
            discount_percent: self.discount_percent,
            original_price: self.original_price,
            images: &self.images,
            brand: self.brand.as_deref(),
            category: self.category,
            sub_category: self.sub_category.as_deref(),
            gender: self.gender.as_deref(),
            description: self.description.as_deref(),
            is_new_arrival: self.is_new_arrival,
            on_sale: self.on_sale,
            is_featured: self.is_featured,
            stock: self.stock,
            schema_type: self.schema_type,
            created_at: self.created_at,
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

/// One page of a merged, sorted product listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductPage {
    pub products: Vec<CanonicalProduct>,
    pub pagination: Pagination,
}

impl ProductPage {
    /// The degrade-to-empty result: no products and all-zero pagination.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_has_placeholder_title_and_zero_prices() {
        let product = CanonicalProduct::new(DocumentId::new(), Category::Watches, SchemaType::Old);
        assert_eq!(product.title, "Untitled watch product");
        assert_eq!(product.name(), product.title);
        assert_eq!(product.mrp, Decimal::ZERO);
        assert_eq!(product.final_price, Decimal::ZERO);
        assert!(product.images.is_empty());
    }

    #[test]
    fn missing_created_at_sorts_as_epoch() {
        let product = CanonicalProduct::new(DocumentId::new(), Category::Women, SchemaType::Saree);
        assert_eq!(product.created_at_millis(), 0);
    }

    #[test]
    fn serializes_title_under_both_names_and_prices_as_numbers() {
        let mut product =
            CanonicalProduct::new(DocumentId::new(), Category::Accessories, SchemaType::Shoe);
        product.title = "Runner".to_string();
        product.mrp = Decimal::new(129_950, 2);
        product.sub_category = Some("shoes".to_string());

        let json = serde_json::to_value(&product).expect("serialize");
        assert_eq!(json["title"], "Runner");
        assert_eq!(json["name"], "Runner");
        assert_eq!(json["mrp"].as_f64(), Some(1299.5));
        assert_eq!(json["subCategory"], "shoes");
        assert_eq!(json["schemaType"], "shoe");
        assert_eq!(json["category"], "accessories");
        assert!(json["createdAt"].is_null());
    }

    #[test]
    fn empty_page_has_zeroed_pagination() {
        let page = ProductPage::empty();
        assert!(page.products.is_empty());
        assert_eq!(page.pagination, Pagination::default());
        assert_eq!(page.pagination.pages, 0);
    }
}
