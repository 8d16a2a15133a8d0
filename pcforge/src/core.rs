//! Core check logic shared by the CLI and any embedding UI.
//! Pure, no I/O.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analyzer::classify::{classify_with, CompatStatus};
use crate::analyzer::power::PowerBudget;
use crate::analyzer::rules::{Issue, RulesEngine, Severity};
use crate::build::Build;
use crate::catalog::schema::{Category, Item};
use crate::catalog::{Catalog, SortOrder};

#[derive(Debug, thiserror::Error)]
pub enum PcForgeError {
    #[error("Catalog error: {0}")]
    Catalog(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
    #[error("Unknown {category} item '{id}'")]
    UnknownItem { category: Category, id: String },
    #[error("Cannot place a {item} item in the {slot} slot")]
    CategoryMismatch { slot: Category, item: Category },
    #[error("Invalid item reference '{0}', expected <category>:<id>")]
    InvalidItemRef(String),
    #[error("Unknown sort order '{0}', expected price-asc, price-desc or name-asc")]
    UnknownSortOrder(String),
}

/// Options for check runs (CLI or UI).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOptions {
    /// Disable compatibility filtering in the picker. Checks still run.
    #[serde(default)]
    pub free_mode: bool,
    /// Rule ids to run. Empty means all.
    #[serde(default)]
    pub rules: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStats {
    pub errors: usize,
    pub warnings: usize,
    pub ok: usize,
}

impl IssueStats {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut stats = Self::default();
        for issue in issues {
            match issue.severity {
                Severity::Error => stats.errors += 1,
                Severity::Warning => stats.warnings += 1,
                Severity::Ok => stats.ok += 1,
            }
        }
        stats
    }
}

/// Issues and power estimate for one build snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub issues: Vec<Issue>,
    pub power: PowerBudget,
    pub psu_load_percent: Option<u8>,
    pub stats: IssueStats,
}

/// Per-slot summary for a build row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Empty,
    Selected,
    Warning,
    Error,
}

impl CheckResult {
    pub fn has_errors(&self) -> bool {
        self.stats.errors > 0
    }

    pub fn has_warnings_or_errors(&self) -> bool {
        self.stats.errors > 0 || self.stats.warnings > 0
    }

    /// Worst severity among issues that implicate `category`.
    pub fn slot_status(&self, build: &Build, category: Category) -> SlotStatus {
        if !build.contains(category) {
            return SlotStatus::Empty;
        }
        let involved = || self.issues.iter().filter(|i| i.involves(category));
        if involved().any(|i| i.severity == Severity::Error) {
            SlotStatus::Error
        } else if involved().any(|i| i.severity == Severity::Warning) {
            SlotStatus::Warning
        } else {
            SlotStatus::Selected
        }
    }
}

/// A picker row: catalog item plus its what-if status.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub item: Arc<Item>,
    pub status: CompatStatus,
}

/// Core check API used by the CLI.
pub struct PcForgeCore;

impl PcForgeCore {
    /// Evaluate a build and estimate its power draw.
    pub fn check(build: &Build, options: &CheckOptions) -> CheckResult {
        let issues = with_engine(options, |engine| engine.evaluate(build));
        let power = PowerBudget::estimate(build);
        let psu_load_percent = build
            .psu()
            .and_then(|psu| power.psu_load_percent(psu.wattage));
        let stats = IssueStats::from_issues(&issues);

        CheckResult {
            issues,
            power,
            psu_load_percent,
            stats,
        }
    }

    /// Search `category` and classify every match against `build`.
    pub fn pick(
        catalog: &Catalog,
        build: &Build,
        category: Category,
        query: &str,
        sort: SortOrder,
        options: &CheckOptions,
    ) -> Vec<Candidate> {
        with_engine(options, |engine| {
            catalog
                .search(category, query, sort)
                .into_iter()
                .map(|item| {
                    let status = classify_with(
                        engine,
                        build,
                        category,
                        Arc::clone(&item),
                        options.free_mode,
                    );
                    Candidate { item, status }
                })
                .collect()
        })
    }
}

/// Run `f` with the shared engine, or a filtered one when `options.rules`
/// names a subset.
fn with_engine<R>(options: &CheckOptions, f: impl FnOnce(&RulesEngine) -> R) -> R {
    if options.rules.is_empty() {
        f(RulesEngine::shared())
    } else {
        f(&RulesEngine::with_rules(options.rules.as_slice()))
    }
}
