//! Listing request parameters.
//!
//! Paging and sorting inputs are clamped or defaulted, never rejected: a
//! malformed `page` or `limit` simply falls back.

use serde::Deserialize;
use vitrine_core::normalize::fold;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;

/// Filters shared by every adapter of a category. Each adapter translates
/// them into its own storage filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilters {
    pub gender: Option<String>,
    pub sub_category: Option<String>,
    pub category: Option<String>,
    pub category_id: Option<String>,
    pub brand: Option<String>,
    pub is_new_arrival: Option<String>,
    pub on_sale: Option<String>,
    pub is_featured: Option<String>,
    pub search: Option<String>,
}

impl ListFilters {
    #[must_use]
    pub fn gender(&self) -> Option<String> {
        folded(self.gender.as_deref())
    }

    #[must_use]
    pub fn sub_category(&self) -> Option<String> {
        folded(self.sub_category.as_deref())
    }

    #[must_use]
    pub fn category(&self) -> Option<String> {
        folded(self.category.as_deref())
    }

    #[must_use]
    pub fn brand(&self) -> Option<String> {
        folded(self.brand.as_deref())
    }

    /// `categoryId` is an identifier, so it is trimmed but not case-folded.
    #[must_use]
    pub fn category_id(&self) -> Option<&str> {
        self.category_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Flags that were requested with the literal value `"true"`, as
    /// `(field, requested)` pairs.
    #[must_use]
    pub fn flags(&self) -> [(&'static str, bool); 3] {
        [
            ("isNewArrival", is_literal_true(self.is_new_arrival.as_deref())),
            ("onSale", is_literal_true(self.on_sale.as_deref())),
            ("isFeatured", is_literal_true(self.is_featured.as_deref())),
        ]
    }

    /// Search term, or `None` when blank.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

fn folded(raw: Option<&str>) -> Option<String> {
    raw.map(fold).filter(|value| !value.is_empty())
}

fn is_literal_true(raw: Option<&str>) -> bool {
    raw == Some("true")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    Price,
    Mrp,
    DiscountPercent,
    Title,
    Name,
    #[default]
    CreatedAt,
}

impl SortField {
    /// Validates against the allow-list; anything else sorts by `createdAt`.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("price") => SortField::Price,
            Some("mrp") => SortField::Mrp,
            Some("discountPercent") => SortField::DiscountPercent,
            Some("title") => SortField::Title,
            Some("name") => SortField::Name,
            _ => SortField::CreatedAt,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::Mrp => "mrp",
            SortField::DiscountPercent => "discountPercent",
            SortField::Title => "title",
            SortField::Name => "name",
            SortField::CreatedAt => "createdAt",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `asc` (any case) sorts ascending; everything else descending.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Raw query-string parameters for a listing, as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub gender: Option<String>,
    pub sub_category: Option<String>,
    pub category: Option<String>,
    pub category_id: Option<String>,
    pub brand: Option<String>,
    pub is_new_arrival: Option<String>,
    pub on_sale: Option<String>,
    pub is_featured: Option<String>,
    pub search: Option<String>,
}

/// A validated listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub sort: SortField,
    pub order: SortOrder,
    pub filters: ListFilters,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: SortField::default(),
            order: SortOrder::default(),
            filters: ListFilters::default(),
        }
    }
}

impl From<ListParams> for ListQuery {
    fn from(params: ListParams) -> Self {
        Self {
            page: parse_page(params.page.as_deref()),
            limit: parse_limit(params.limit.as_deref()),
            sort: SortField::parse(params.sort.as_deref()),
            order: SortOrder::parse(params.order.as_deref()),
            filters: ListFilters {
                gender: params.gender,
                sub_category: params.sub_category,
                category: params.category,
                category_id: params.category_id,
                brand: params.brand,
                is_new_arrival: params.is_new_arrival,
                on_sale: params.on_sale,
                is_featured: params.is_featured,
                search: params.search,
            },
        }
    }
}

/// Page number, at least 1. Malformed input yields the default.
#[must_use]
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(DEFAULT_PAGE)
}

/// Page size clamped to `[1, MAX_LIMIT]`. Malformed input yields the default.
#[must_use]
pub fn parse_limit(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .map_or(DEFAULT_LIMIT, |limit| {
            let clamped = limit.clamp(1, i64::from(MAX_LIMIT));
            u32::try_from(clamped).unwrap_or(DEFAULT_LIMIT)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_and_rejects_non_positive() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("3")), 3);
        assert_eq!(parse_page(Some(" 2 ")), 2);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-4")), 1);
        assert_eq!(parse_page(Some("two")), 1);
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(parse_limit(None), 20);
        assert_eq!(parse_limit(Some("10")), 10);
        assert_eq!(parse_limit(Some("0")), 1);
        assert_eq!(parse_limit(Some("-3")), 1);
        assert_eq!(parse_limit(Some("500")), 100);
        assert_eq!(parse_limit(Some("lots")), 20);
    }

    #[test]
    fn sort_field_falls_back_to_created_at() {
        assert_eq!(SortField::parse(Some("price")), SortField::Price);
        assert_eq!(SortField::parse(Some("discountPercent")), SortField::DiscountPercent);
        assert_eq!(SortField::parse(Some("popularity")), SortField::CreatedAt);
        assert_eq!(SortField::parse(Some("PRICE")), SortField::CreatedAt);
        assert_eq!(SortField::parse(None), SortField::CreatedAt);
    }

    #[test]
    fn order_is_desc_unless_asc() {
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("ASC")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("up")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(None), SortOrder::Desc);
    }

    #[test]
    fn filters_fold_text_and_only_accept_literal_true_flags() {
        let filters = ListFilters {
            gender: Some("  Men ".to_string()),
            brand: Some("   ".to_string()),
            category_id: Some(" CAT-7 ".to_string()),
            is_new_arrival: Some("true".to_string()),
            on_sale: Some("TRUE".to_string()),
            is_featured: Some("1".to_string()),
            search: Some("  ".to_string()),
            ..ListFilters::default()
        };

        assert_eq!(filters.gender().as_deref(), Some("men"));
        assert_eq!(filters.brand(), None);
        assert_eq!(filters.category_id(), Some("CAT-7"));
        assert_eq!(
            filters.flags(),
            [("isNewArrival", true), ("onSale", false), ("isFeatured", false)]
        );
        assert_eq!(filters.search(), None);
    }

    #[test]
    fn params_convert_into_validated_query() {
        let query = ListQuery::from(ListParams {
            page: Some("2".to_string()),
            limit: Some("1000".to_string()),
            sort: Some("title".to_string()),
            order: Some("asc".to_string()),
            gender: Some("Women".to_string()),
            ..ListParams::default()
        });

        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 100);
        assert_eq!(query.sort, SortField::Title);
        assert_eq!(query.order, SortOrder::Asc);
        assert_eq!(query.filters.gender(), Some("women".to_string()));
    }
}
