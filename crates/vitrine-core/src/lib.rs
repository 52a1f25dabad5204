//! Shared domain types for the vitrine catalog: the canonical product shape,
//! category and schema tags, value normalization helpers, configuration, and
//! the error taxonomy surfaced to callers.

pub mod app_config;
pub mod categories;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod ids;
pub mod normalize;
pub mod products;

pub use app_config::{AppConfig, Environment};
pub use categories::{Category, SchemaType};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{CatalogError, ConfigError};
pub use fixtures::{load_fixtures, CatalogFixtures};
pub use ids::DocumentId;
pub use products::{CanonicalProduct, Pagination, ProductPage};
