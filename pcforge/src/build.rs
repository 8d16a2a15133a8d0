//! Build snapshots.
//!
//! A [`Build`] maps each category to at most one selected item. Slots are
//! keyed by the item's own category, so an item can never sit in a foreign
//! slot. Items are shared behind `Arc`, which keeps what-if overlays cheap:
//! an overlay copies eight pointers and swaps one.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::schema::{
    CaseSpecs, Category, CoolerSpecs, CpuSpecs, GpuSpecs, Item, MotherboardSpecs, PsuSpecs,
    RamSpecs, Specs,
};
use crate::core::PcForgeError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Build {
    slots: BTreeMap<Category, Arc<Item>>,
}

impl Build {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an item in its category's slot, returning whatever it replaced.
    pub fn select(&mut self, item: impl Into<Arc<Item>>) -> Option<Arc<Item>> {
        let item = item.into();
        self.slots.insert(item.category(), item)
    }

    pub fn remove(&mut self, category: Category) -> Option<Arc<Item>> {
        self.slots.remove(&category)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn get(&self, category: Category) -> Option<&Item> {
        self.slots.get(&category).map(Arc::as_ref)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.slots.contains_key(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Selected items in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &Item)> + '_ {
        self.slots.iter().map(|(category, item)| (*category, item.as_ref()))
    }

    /// A copy of this build with `category` replaced by `item`.
    ///
    /// `self` is left untouched. Fails when the item belongs to another
    /// category.
    pub fn with_item(
        &self,
        category: Category,
        item: impl Into<Arc<Item>>,
    ) -> Result<Build, PcForgeError> {
        let item = item.into();
        if item.category() != category {
            return Err(PcForgeError::CategoryMismatch {
                slot: category,
                item: item.category(),
            });
        }
        let mut overlay = self.clone();
        overlay.slots.insert(category, item);
        Ok(overlay)
    }

    pub fn total_price(&self) -> f64 {
        self.slots.values().map(|item| item.price).sum()
    }

    /// Category to item-id map for share links.
    pub fn to_ids(&self) -> BuildIds {
        BuildIds(
            self.slots
                .iter()
                .map(|(category, item)| (*category, item.id.clone()))
                .collect(),
        )
    }

    pub fn cpu(&self) -> Option<&CpuSpecs> {
        match self.get(Category::Cpu).map(|i| &i.specs) {
            Some(Specs::Cpu(specs)) => Some(specs),
            _ => None,
        }
    }

    pub fn motherboard(&self) -> Option<&MotherboardSpecs> {
        match self.get(Category::Motherboard).map(|i| &i.specs) {
            Some(Specs::Motherboard(specs)) => Some(specs),
            _ => None,
        }
    }

    pub fn ram(&self) -> Option<&RamSpecs> {
        match self.get(Category::Ram).map(|i| &i.specs) {
            Some(Specs::Ram(specs)) => Some(specs),
            _ => None,
        }
    }

    pub fn gpu(&self) -> Option<&GpuSpecs> {
        match self.get(Category::Gpu).map(|i| &i.specs) {
            Some(Specs::Gpu(specs)) => Some(specs),
            _ => None,
        }
    }

    pub fn psu(&self) -> Option<&PsuSpecs> {
        match self.get(Category::Psu).map(|i| &i.specs) {
            Some(Specs::Psu(specs)) => Some(specs),
            _ => None,
        }
    }

    pub fn case(&self) -> Option<&CaseSpecs> {
        match self.get(Category::Case).map(|i| &i.specs) {
            Some(Specs::Case(specs)) => Some(specs),
            _ => None,
        }
    }

    pub fn cooler(&self) -> Option<&CoolerSpecs> {
        match self.get(Category::Cooler).map(|i| &i.specs) {
            Some(Specs::Cooler(specs)) => Some(specs),
            _ => None,
        }
    }
}

impl FromIterator<Item> for Build {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        let mut build = Build::new();
        for item in iter {
            build.select(item);
        }
        build
    }
}

impl FromIterator<Arc<Item>> for Build {
    fn from_iter<T: IntoIterator<Item = Arc<Item>>>(iter: T) -> Self {
        let mut build = Build::new();
        for item in iter {
            build.select(item);
        }
        build
    }
}

/// Serializable `category -> item id` map, e.g. `{"cpu":"r5-7600"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildIds(pub BTreeMap<Category, String>);

impl BuildIds {
    pub fn from_json(json: &str) -> Result<Self, PcForgeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> String {
        // Category keys and string values always serialize.
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> + '_ {
        self.0.iter().map(|(category, id)| (*category, id.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
