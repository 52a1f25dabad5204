//! Multi-schema catalog engine.
//!
//! Each storefront category is served by one or more schema adapters, one
//! per storage generation. [`Catalog`] resolves a category token through the
//! [`CategoryRegistry`], fans out to the adapters concurrently, normalizes
//! every document into a [`vitrine_core::CanonicalProduct`], then merges,
//! sorts and paginates.

pub mod adapters;
pub mod engine;
pub mod query;
pub mod registry;
pub mod source;
pub mod summary;

pub use adapters::{SareeAdapter, SchemaAdapter, SchemaProfile, ShoeAdapter, StandardAdapter};
pub use engine::{paginate, sort_products, Catalog, DEFAULT_STORE_TIMEOUT};
pub use query::{ListFilters, ListParams, ListQuery, SortField, SortOrder};
pub use registry::{AdapterSet, CategoryRegistry};
pub use source::{absorb_source_error, SourceError};
pub use summary::{CategoryTotals, DashboardSummary};
