use std::str::FromStr;

use crate::DbError;

/// Physical collections the catalog reads from.
///
/// Several collections can hold the same storefront category in different
/// schema generations (`watches` and `new_watches`, for instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Watches,
    NewWatches,
    Accessories,
    Shoes,
    Women,
    Sarees,
    Skincare,
    Users,
    Orders,
}

impl Collection {
    pub const ALL: [Collection; 9] = [
        Collection::Watches,
        Collection::NewWatches,
        Collection::Accessories,
        Collection::Shoes,
        Collection::Women,
        Collection::Sarees,
        Collection::Skincare,
        Collection::Users,
        Collection::Orders,
    ];

    /// Every collection that stores sellable products.
    pub const PRODUCTS: [Collection; 7] = [
        Collection::Watches,
        Collection::NewWatches,
        Collection::Accessories,
        Collection::Shoes,
        Collection::Women,
        Collection::Sarees,
        Collection::Skincare,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Watches => "watches",
            Collection::NewWatches => "new_watches",
            Collection::Accessories => "accessories",
            Collection::Shoes => "shoes",
            Collection::Women => "women",
            Collection::Sarees => "sarees",
            Collection::Skincare => "skincare",
            Collection::Users => "users",
            Collection::Orders => "orders",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| DbError::UnknownCollection(s.to_string()))
    }
}
