use serde::{Deserialize, Serialize};

/// Storefront category a product is presented under.
///
/// This is the routing key: every physical collection belongs to exactly one
/// category, even when a sub-path (sarees, shoes) has its own alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Watches,
    Accessories,
    Women,
    Skincare,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Watches,
        Category::Accessories,
        Category::Women,
        Category::Skincare,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Watches => "watches",
            Category::Accessories => "accessories",
            Category::Women => "women",
            Category::Skincare => "skincare",
        }
    }

    /// Singular noun used when a product has no usable name.
    #[must_use]
    pub fn singular_label(self) -> &'static str {
        match self {
            Category::Watches => "watch",
            Category::Accessories => "accessory",
            Category::Women => "women's apparel",
            Category::Skincare => "skincare",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance tag recording which schema generation a product came from.
///
/// Informational only; nothing downstream of normalization branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Old,
    New,
    Shoe,
    Saree,
    Skincare,
}

impl SchemaType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaType::Old => "old",
            SchemaType::New => "new",
            SchemaType::Shoe => "shoe",
            SchemaType::Saree => "saree",
            SchemaType::Skincare => "skincare",
        }
    }
}

impl std::fmt::Display for SchemaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
