//! Category alias resolution.
//!
//! Tokens are resolved in two explicit passes: an exact-string table holding
//! the historical cased aliases, then a lowercase table. The exact pass runs
//! first so a cased alias can never be shadowed by case folding.

use std::collections::HashMap;
use std::sync::Arc;

use vitrine_core::{CatalogError, Category};
use vitrine_db::{Collection, DocumentStore};

use crate::adapters::{SareeAdapter, SchemaAdapter, ShoeAdapter, StandardAdapter};

/// The adapters serving one alias, in registry order, plus the collection
/// admin writes land in.
pub struct AdapterSet {
    pub name: &'static str,
    pub category: Category,
    pub adapters: Vec<Arc<dyn SchemaAdapter>>,
    pub write_target: Collection,
}

impl AdapterSet {
    /// The adapter reading `collection`, if this set has one.
    #[must_use]
    pub fn adapter_for(&self, collection: Collection) -> Option<&Arc<dyn SchemaAdapter>> {
        self.adapters.iter().find(|a| a.collection() == collection)
    }

    #[must_use]
    pub fn collections(&self) -> Vec<Collection> {
        self.adapters.iter().map(|a| a.collection()).collect()
    }
}

impl std::fmt::Debug for AdapterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterSet")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("collections", &self.collections())
            .field("write_target", &self.write_target)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SetKey {
    Watches,
    Accessories,
    Shoes,
    Women,
    Sarees,
    Skincare,
}

/// Historical aliases that are matched only as written.
const EXACT_ALIASES: &[(&str, SetKey)] = &[
    ("WATCH", SetKey::Watches),
    ("WATCHES", SetKey::Watches),
    ("Watch", SetKey::Watches),
    ("Watches", SetKey::Watches),
    ("Accessories", SetKey::Accessories),
    ("Shoe", SetKey::Shoes),
    ("Shoes", SetKey::Shoes),
    ("Women", SetKey::Women),
    ("Saree", SetKey::Sarees),
    ("Sari", SetKey::Sarees),
    ("SARI", SetKey::Sarees),
    ("Skincare", SetKey::Skincare),
];

/// Canonical lowercase tokens, matched after folding the input.
const FOLDED_ALIASES: &[(&str, SetKey)] = &[
    ("watch", SetKey::Watches),
    ("watches", SetKey::Watches),
    ("accessories", SetKey::Accessories),
    ("accessory", SetKey::Accessories),
    ("shoe", SetKey::Shoes),
    ("shoes", SetKey::Shoes),
    ("footwear", SetKey::Shoes),
    ("women", SetKey::Women),
    ("womens", SetKey::Women),
    ("women-apparel", SetKey::Women),
    ("saree", SetKey::Sarees),
    ("sarees", SetKey::Sarees),
    ("sari", SetKey::Sarees),
    ("skincare", SetKey::Skincare),
    ("skin-care", SetKey::Skincare),
];

/// Immutable token-to-adapter-set table, built once at startup.
#[derive(Debug)]
pub struct CategoryRegistry {
    sets: HashMap<SetKey, AdapterSet>,
    exact: HashMap<&'static str, SetKey>,
    folded: HashMap<&'static str, SetKey>,
}

impl CategoryRegistry {
    /// Builds every adapter once against `store`. Adapters shared between
    /// aliases (the shoe adapter serves both `accessories` and `shoes`) are
    /// the same instance.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let legacy_watch: Arc<dyn SchemaAdapter> =
            Arc::new(StandardAdapter::legacy_watch(store.clone()));
        let new_watch: Arc<dyn SchemaAdapter> = Arc::new(StandardAdapter::new_watch(store.clone()));
        let legacy_accessory: Arc<dyn SchemaAdapter> =
            Arc::new(StandardAdapter::legacy_accessory(store.clone()));
        let shoe: Arc<dyn SchemaAdapter> = Arc::new(ShoeAdapter::new(store.clone()));
        let legacy_women: Arc<dyn SchemaAdapter> =
            Arc::new(StandardAdapter::legacy_women(store.clone()));
        let saree: Arc<dyn SchemaAdapter> = Arc::new(SareeAdapter::new(store.clone()));
        let skincare: Arc<dyn SchemaAdapter> = Arc::new(StandardAdapter::skincare(store));

        let sets = [
            (
                SetKey::Watches,
                AdapterSet {
                    name: "watches",
                    category: Category::Watches,
                    adapters: vec![legacy_watch, new_watch],
                    write_target: Collection::NewWatches,
                },
            ),
            (
                SetKey::Accessories,
                AdapterSet {
                    name: "accessories",
                    category: Category::Accessories,
                    adapters: vec![legacy_accessory, shoe.clone()],
                    write_target: Collection::Accessories,
                },
            ),
            (
                SetKey::Shoes,
                AdapterSet {
                    name: "shoes",
                    category: Category::Accessories,
                    adapters: vec![shoe],
                    write_target: Collection::Shoes,
                },
            ),
            (
                SetKey::Women,
                AdapterSet {
                    name: "women",
                    category: Category::Women,
                    adapters: vec![legacy_women, saree.clone()],
                    write_target: Collection::Women,
                },
            ),
            (
                SetKey::Sarees,
                AdapterSet {
                    name: "sarees",
                    category: Category::Women,
                    adapters: vec![saree],
                    write_target: Collection::Sarees,
                },
            ),
            (
                SetKey::Skincare,
                AdapterSet {
                    name: "skincare",
                    category: Category::Skincare,
                    adapters: vec![skincare],
                    write_target: Collection::Skincare,
                },
            ),
        ];

        Self {
            sets: sets.into_iter().collect(),
            exact: EXACT_ALIASES.iter().copied().collect(),
            folded: FOLDED_ALIASES.iter().copied().collect(),
        }
    }

    /// Resolves a user-supplied category token.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingCategory`] for a blank token and
    /// [`CatalogError::UnsupportedCategory`] for one with no mapping.
    pub fn resolve(&self, token: &str) -> Result<&AdapterSet, CatalogError> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::MissingCategory);
        }

        let key = self
            .exact
            .get(trimmed)
            .or_else(|| self.folded.get(trimmed.to_lowercase().as_str()))
            .ok_or_else(|| CatalogError::UnsupportedCategory(trimmed.to_string()))?;

        self.sets
            .get(key)
            .ok_or_else(|| CatalogError::UnsupportedCategory(trimmed.to_string()))
    }
}
