//! Component Catalog
//!
//! In-memory snapshot of purchasable components grouped by category. The
//! compatibility engine never reads the catalog itself; callers pull items
//! out of it to populate builds and to enumerate picker candidates.
//!
//! ```rust,ignore
//! use pcforge::catalog::{Catalog, Category, SortOrder};
//!
//! let catalog = Catalog::builtin()?;
//! for item in catalog.search(Category::Cpu, "ryzen", SortOrder::PriceAsc) {
//!     println!("{} - ${}", item.display_name(), item.price);
//! }
//! ```

pub mod builtin;
pub mod schema;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::build::{Build, BuildIds};
use crate::core::PcForgeError;

pub use builtin::{builtin_catalog, load_catalog_from_file, CatalogFile};
pub use schema::*;

/// Ordering applied by [`Catalog::search`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    PriceAsc,
    PriceDesc,
    NameAsc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::PriceAsc => "price-asc",
            SortOrder::PriceDesc => "price-desc",
            SortOrder::NameAsc => "name-asc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = PcForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-asc" => Ok(SortOrder::PriceAsc),
            "price-desc" => Ok(SortOrder::PriceDesc),
            "name-asc" => Ok(SortOrder::NameAsc),
            other => Err(PcForgeError::UnknownSortOrder(other.to_string())),
        }
    }
}

/// Items grouped by category, in catalog file order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: BTreeMap<Category, Vec<Arc<Item>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sample catalog shipped with the crate.
    pub fn builtin() -> Result<Self, PcForgeError> {
        builtin_catalog()
    }

    pub fn load_file(path: &Path) -> Result<Self, PcForgeError> {
        load_catalog_from_file(path)
    }

    pub fn from_json_str(json: &str) -> Result<Self, PcForgeError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_items(file.items)
    }

    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Result<Self, PcForgeError> {
        let mut catalog = Self::new();
        for item in items {
            catalog.insert(item)?;
        }
        Ok(catalog)
    }

    /// Add an item. Ids must be unique within a category.
    pub fn insert(&mut self, item: Item) -> Result<(), PcForgeError> {
        let category = item.category();
        let slot = self.items.entry(category).or_default();
        if slot.iter().any(|existing| existing.id == item.id) {
            return Err(PcForgeError::Catalog(format!(
                "duplicate {} id '{}'",
                category, item.id
            )));
        }
        slot.push(Arc::new(item));
        Ok(())
    }

    pub fn items(&self, category: Category) -> &[Arc<Item>] {
        self.items.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, category: Category, id: &str) -> Option<&Arc<Item>> {
        self.items(category).iter().find(|item| item.id == id)
    }

    /// Look up a `category:id` reference such as `cpu:r5-7600`.
    pub fn resolve_ref(&self, reference: &str) -> Result<Arc<Item>, PcForgeError> {
        let (category, id) = reference
            .split_once(':')
            .ok_or_else(|| PcForgeError::InvalidItemRef(reference.to_string()))?;
        let category: Category = category.parse()?;
        self.get(category, id)
            .cloned()
            .ok_or_else(|| PcForgeError::UnknownItem {
                category,
                id: id.to_string(),
            })
    }

    /// Rebuild a build from share ids. Ids missing from this catalog are
    /// skipped.
    pub fn restore(&self, ids: &BuildIds) -> Build {
        let mut build = Build::new();
        for (category, id) in ids.iter() {
            match self.get(category, id) {
                Some(item) => {
                    build.select(Arc::clone(item));
                }
                None => {
                    tracing::warn!("Skipping unknown {} id '{}' in shared build", category, id);
                }
            }
        }
        build
    }

    /// Case-insensitive substring match on name or brand, then sorted.
    /// An empty query matches everything.
    pub fn search(&self, category: Category, query: &str, sort: SortOrder) -> Vec<Arc<Item>> {
        let query = query.trim().to_lowercase();
        let mut results: Vec<Arc<Item>> = self
            .items(category)
            .iter()
            .filter(|item| {
                query.is_empty()
                    || item.name.to_lowercase().contains(&query)
                    || item.brand.to_lowercase().contains(&query)
            })
            .cloned()
            .collect();

        match sort {
            SortOrder::PriceAsc => results.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOrder::PriceDesc => results.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortOrder::NameAsc => {
                results.sort_by_key(|item| item.name.to_lowercase());
            }
        }
        results
    }

    pub fn len(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn psu(id: &str, name: &str, brand: &str, price: f64, wattage: f64) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
            brand: brand.to_string(),
            price,
            specs: Specs::Psu(PsuSpecs {
                wattage,
                efficiency: None,
                modular: None,
            }),
        }
    }

    fn sample() -> Catalog {
        Catalog::from_items(vec![
            psu("rm850x", "RM850x", "Corsair", 139.0, 850.0),
            psu("cx450", "CX450", "Corsair", 54.0, 450.0),
            psu("gx650", "Focus GX-650", "Seasonic", 99.0, 650.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::from_items(vec![
            psu("cx450", "CX450", "Corsair", 54.0, 450.0),
            psu("cx450", "CX450 v2", "Corsair", 59.0, 450.0),
        ]);
        assert!(matches!(result, Err(PcForgeError::Catalog(_))));
    }

    #[test]
    fn test_search_sorting() {
        let catalog = sample();
        let ids = |items: Vec<Arc<Item>>| items.iter().map(|i| i.id.clone()).collect::<Vec<_>>();

        assert_eq!(
            ids(catalog.search(Category::Psu, "", SortOrder::PriceAsc)),
            vec!["cx450", "gx650", "rm850x"]
        );
        assert_eq!(
            ids(catalog.search(Category::Psu, "", SortOrder::PriceDesc)),
            vec!["rm850x", "gx650", "cx450"]
        );
        assert_eq!(
            ids(catalog.search(Category::Psu, "", SortOrder::NameAsc)),
            vec!["cx450", "gx650", "rm850x"]
        );
    }

    #[test]
    fn test_search_matches_name_or_brand() {
        let catalog = sample();
        assert_eq!(catalog.search(Category::Psu, "CORSAIR", SortOrder::PriceAsc).len(), 2);
        assert_eq!(catalog.search(Category::Psu, "gx-650", SortOrder::PriceAsc).len(), 1);
        assert!(catalog.search(Category::Psu, "evga", SortOrder::PriceAsc).is_empty());
        assert!(catalog.search(Category::Gpu, "", SortOrder::PriceAsc).is_empty());
    }

    #[test]
    fn test_resolve_ref() {
        let catalog = sample();
        assert_eq!(catalog.resolve_ref("psu:cx450").unwrap().name, "CX450");
        assert!(matches!(
            catalog.resolve_ref("psu:nope"),
            Err(PcForgeError::UnknownItem { .. })
        ));
        assert!(matches!(
            catalog.resolve_ref("cx450"),
            Err(PcForgeError::InvalidItemRef(_))
        ));
        assert!(matches!(
            catalog.resolve_ref("fan:cx450"),
            Err(PcForgeError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("name-asc".parse::<SortOrder>().unwrap(), SortOrder::NameAsc);
        assert!(matches!(
            "cheapest".parse::<SortOrder>(),
            Err(PcForgeError::UnknownSortOrder(token)) if token == "cheapest"
        ));
        assert_eq!(SortOrder::default(), SortOrder::PriceAsc);
    }
}
