//! Built-in and External Catalogs
//!
//! The sample catalog is compiled into the binary from
//! `catalog/components.json`. Callers with their own inventory load a JSON
//! document of the same shape from disk instead.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::schema::Item;
use crate::catalog::Catalog;
use crate::core::PcForgeError;

const EMBEDDED_COMPONENTS: &str = include_str!("../../catalog/components.json");

/// On-disk catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub items: Vec<Item>,
}

/// Parse the embedded sample catalog.
pub fn builtin_catalog() -> Result<Catalog, PcForgeError> {
    Catalog::from_json_str(EMBEDDED_COMPONENTS)
        .map_err(|e| PcForgeError::Catalog(format!("embedded catalog is invalid: {}", e)))
}

/// Load a catalog from a JSON file.
pub fn load_catalog_from_file(path: &Path) -> Result<Catalog, PcForgeError> {
    let content = std::fs::read_to_string(path)?;
    let catalog = Catalog::from_json_str(&content)?;
    tracing::debug!(
        "Loaded {} catalog items from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}
