use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("fixture validation error: {0}")]
    Validation(String),
}

/// Errors the catalog surfaces to its callers.
///
/// Per-source fetch failures never appear here; they are absorbed inside the
/// engine and show up only as fewer products.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("category is required")]
    MissingCategory,

    #[error("unsupported category: {0}")]
    UnsupportedCategory(String),

    #[error("invalid product id: {0}")]
    InvalidId(String),

    #[error("product {id} not found in {category}")]
    NotFound { category: String, id: String },

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl CatalogError {
    /// Stable machine-readable code used in API error bodies.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCategory | Self::InvalidId(_) | Self::InvalidDocument(_) => "bad_request",
            Self::UnsupportedCategory(_) | Self::NotFound { .. } => "not_found",
            Self::Storage(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_classify_client_and_server_errors() {
        assert_eq!(CatalogError::MissingCategory.code(), "bad_request");
        assert_eq!(CatalogError::InvalidId("x".into()).code(), "bad_request");
        assert_eq!(
            CatalogError::UnsupportedCategory("toys".into()).code(),
            "not_found"
        );
        assert_eq!(
            CatalogError::NotFound {
                category: "watches".into(),
                id: "abc".into()
            }
            .code(),
            "not_found"
        );
        assert_eq!(CatalogError::Storage("down".into()).code(), "internal_error");
    }
}
