//! What-if classification of picker candidates.
//!
//! Each call overlays one candidate onto a copy of the caller's build and
//! evaluates the copy. Nothing is shared between calls, so a whole catalog
//! can be classified per keystroke, from any number of threads.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analyzer::rules::{Issue, RulesEngine, Severity};
use crate::build::Build;
use crate::catalog::schema::{Category, Item};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatStatus {
    /// Compatibility filtering is off.
    Free,
    Ok,
    Warn,
    Incompat,
}

impl CompatStatus {
    /// Worst severity wins: any error, then any warning, else ok.
    pub fn from_issues(issues: &[Issue]) -> Self {
        if issues.iter().any(|i| i.severity == Severity::Error) {
            CompatStatus::Incompat
        } else if issues.iter().any(|i| i.severity == Severity::Warning) {
            CompatStatus::Warn
        } else {
            CompatStatus::Ok
        }
    }

    /// Whether a picker should refuse the candidate.
    pub fn blocks_selection(&self) -> bool {
        matches!(self, CompatStatus::Incompat)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompatStatus::Free => "free",
            CompatStatus::Ok => "ok",
            CompatStatus::Warn => "warn",
            CompatStatus::Incompat => "incompat",
        }
    }
}

/// Classify `candidate` for `category` against `build` with the default
/// rules.
pub fn classify(
    build: &Build,
    category: Category,
    candidate: impl Into<Arc<Item>>,
    free_mode: bool,
) -> CompatStatus {
    classify_with(RulesEngine::shared(), build, category, candidate, free_mode)
}

pub fn classify_with(
    engine: &RulesEngine,
    build: &Build,
    category: Category,
    candidate: impl Into<Arc<Item>>,
    free_mode: bool,
) -> CompatStatus {
    if free_mode {
        return CompatStatus::Free;
    }
    match build.with_item(category, candidate) {
        Ok(overlay) => CompatStatus::from_issues(&engine.evaluate(&overlay)),
        Err(e) => {
            tracing::debug!("Candidate cannot be placed: {}", e);
            CompatStatus::Incompat
        }
    }
}
