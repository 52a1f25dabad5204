//! Admin dashboard aggregates.
//!
//! Every count is issued concurrently and absorbs its own failure as zero.
//! Category figures fold sub-path collections into their parent category
//! (sarees into women, shoes into accessories); `total_products` is the
//! unfolded sum over physical collections.

use std::collections::BTreeMap;
use std::time::Duration;

use futures::future::join_all;
use rust_decimal::Decimal;
use serde::Serialize;
use vitrine_core::Category;
use vitrine_db::{Collection, DocumentStore, Filter};

use crate::source::{absorb_source_error, fetch_with_timeout};

/// Which category each product collection's counts fold into.
const FOLDING: [(Collection, Category); 7] = [
    (Collection::Watches, Category::Watches),
    (Collection::NewWatches, Category::Watches),
    (Collection::Accessories, Category::Accessories),
    (Collection::Shoes, Category::Accessories),
    (Collection::Women, Category::Women),
    (Collection::Sarees, Category::Women),
    (Collection::Skincare, Category::Skincare),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub watches: u64,
    pub accessories: u64,
    pub women: u64,
    pub skincare: u64,
}

impl CategoryTotals {
    pub fn add(&mut self, category: Category, n: u64) {
        let slot = match category {
            Category::Watches => &mut self.watches,
            Category::Accessories => &mut self.accessories,
            Category::Women => &mut self.women,
            Category::Skincare => &mut self.skincare,
        };
        *slot = slot.saturating_add(n);
    }

    #[must_use]
    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::Watches => self.watches,
            Category::Accessories => self.accessories,
            Category::Women => self.women,
            Category::Skincare => self.skincare,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_users: u64,
    pub total_orders: u64,
    pub pending_orders: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub total_products: u64,
    /// In-stock products per category.
    pub inventory: CategoryTotals,
    pub category_counts: CategoryTotals,
    /// Unfolded per-collection product counts.
    pub collections: BTreeMap<String, u64>,
}

/// Builds the dashboard figures against `store`.
pub async fn summarize(store: &dyn DocumentStore, timeout: Duration) -> DashboardSummary {
    let count = |collection: Collection, filter: Filter| async move {
        let result = fetch_with_timeout(timeout, store.count(collection, &filter)).await;
        absorb_source_error(collection, result)
    };

    let product_counts = join_all(FOLDING.iter().map(|(c, _)| count(*c, Filter::All)));
    let in_stock_counts = join_all(
        FOLDING
            .iter()
            .map(|(c, _)| count(*c, Filter::greater_than("stock", Decimal::ZERO))),
    );
    let revenue = async {
        let not_cancelled = Filter::not(Filter::eq("status", "cancelled"));
        let result = fetch_with_timeout(
            timeout,
            store.sum(Collection::Orders, &not_cancelled, "totalAmount"),
        )
        .await;
        absorb_source_error(Collection::Orders, result)
    };

    let (product_counts, in_stock_counts, total_users, total_orders, pending_orders, total_revenue) =
        tokio::join!(
            product_counts,
            in_stock_counts,
            count(Collection::Users, Filter::All),
            count(Collection::Orders, Filter::All),
            count(Collection::Orders, Filter::eq("status", "pending")),
            revenue,
        );

    let mut summary = DashboardSummary {
        total_users,
        total_orders,
        pending_orders,
        total_revenue,
        ..DashboardSummary::default()
    };
    for (((collection, category), total), in_stock) in
        FOLDING.iter().zip(product_counts).zip(in_stock_counts)
    {
        summary.total_products = summary.total_products.saturating_add(total);
        summary.category_counts.add(*category, total);
        summary.inventory.add(*category, in_stock);
        summary.collections.insert(collection.to_string(), total);
    }
    summary
}
