//! PCForge - PC build compatibility and power-budget engine
//!
//! This library checks a partial PC build against cross-component
//! compatibility rules (CPU socket, memory type, cooler capacity, PSU
//! wattage, case form factor) and estimates the build's power draw.
//!
//! # Quick Start
//!
//! ```no_run
//! use pcforge::{Build, Catalog, CheckOptions, PcForgeCore};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let mut build = Build::new();
//! build.select(catalog.resolve_ref("cpu:r5-7600").unwrap());
//! build.select(catalog.resolve_ref("motherboard:b650-tomahawk").unwrap());
//!
//! let result = PcForgeCore::check(&build, &CheckOptions::default());
//! for issue in &result.issues {
//!     println!("{:?}: {}", issue.severity, issue.message);
//! }
//! println!("Estimated draw: {}W", result.power.total);
//! ```
//!
//! # Features
//!
//! - **Rule engine**: ordered, independent rules over a read-only build
//! - **Power estimate**: CPU + GPU TDP plus a fixed system allowance
//! - **What-if classification**: rate picker candidates without touching the build
//! - **Catalog**: embedded sample inventory, JSON loading, search and sort

pub mod analyzer;
pub mod build;
pub mod catalog;
pub mod core;
pub mod export;

// Re-export main types
pub use analyzer::classify::{classify, classify_with, CompatStatus};
pub use analyzer::power::{estimate, PowerBudget};
pub use analyzer::rules::{evaluate, Issue, Rule, RulesEngine, Severity};
pub use build::{Build, BuildIds};
pub use catalog::{Catalog, Category, FormFactor, Item, SortOrder, Specs};
pub use crate::core::{
    Candidate, CheckOptions, CheckResult, IssueStats, PcForgeCore, PcForgeError, SlotStatus,
};
pub use export::export_text;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Build, Catalog, Category, CheckOptions, CheckResult, CompatStatus, Issue, Item,
        PcForgeCore, PcForgeError, PowerBudget, Severity,
    };
}
