use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CatalogError;

/// Identifier of a stored document.
///
/// Unique within its physical collection only; two collections may hold the
/// same value without referring to the same product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a client-supplied identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidId`] when `raw` is not a UUID.
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| CatalogError::InvalidId(raw.to_string()))
    }

    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DocumentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
