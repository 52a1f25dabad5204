use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::ConfigError;

/// Seed documents keyed by physical collection name.
///
/// ```yaml
/// collections:
///   watches:
///     - name: Heritage Chrono
///       price: 1000
///   new_watches:
///     - title: Aero Diver
///       mrp: 2000
///       discountPercent: 10
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFixtures {
    pub collections: BTreeMap<String, Vec<Value>>,
}

impl CatalogFixtures {
    /// Total number of documents across every collection.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }
}

/// Load fixture documents from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, or if any
/// document is not a mapping.
pub fn load_fixtures(path: &Path) -> Result<CatalogFixtures, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let fixtures = parse_fixtures(&content).map_err(|e| match e {
        FixtureParseError::Yaml(source) => ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        },
        FixtureParseError::Invalid(reason) => ConfigError::Validation(reason),
    })?;
    Ok(fixtures)
}

enum FixtureParseError {
    Yaml(serde_yaml::Error),
    Invalid(String),
}

fn parse_fixtures(content: &str) -> Result<CatalogFixtures, FixtureParseError> {
    let fixtures: CatalogFixtures =
        serde_yaml::from_str(content).map_err(FixtureParseError::Yaml)?;

    for (collection, docs) in &fixtures.collections {
        if collection.trim().is_empty() {
            return Err(FixtureParseError::Invalid(
                "collection name must be non-empty".to_string(),
            ));
        }
        if let Some(position) = docs.iter().position(|doc| !doc.is_object()) {
            return Err(FixtureParseError::Invalid(format!(
                "document {position} in '{collection}' is not a mapping"
            )));
        }
    }

    Ok(fixtures)
}
