//! Example: plugging an extra rule into RulesEngine (without PcForgeCore).
//! Run with: cargo run --example custom_rules

use std::sync::Arc;

use pcforge::{Build, Catalog, Category, Issue, Rule, RulesEngine, Severity};

/// Flags builds whose total price exceeds a budget.
struct BudgetRule {
    limit: f64,
}

impl Rule for BudgetRule {
    fn id(&self) -> &str {
        "budget"
    }

    fn name(&self) -> &str {
        "Budget Check"
    }

    fn description(&self) -> &str {
        "Total build price must stay under the budget"
    }

    fn categories(&self) -> &[Category] {
        &Category::ALL
    }

    fn check(&self, build: &Build) -> Vec<Issue> {
        let total = build.total_price();
        if total <= self.limit {
            return Vec::new();
        }
        vec![Issue::new(
            self.id(),
            Severity::Warning,
            self.categories(),
            format!("Build costs ${} which is over the ${} budget", total, self.limit),
        )]
    }
}

fn main() -> Result<(), pcforge::PcForgeError> {
    let catalog = Catalog::builtin()?;
    let mut build = Build::new();
    for reference in ["cpu:r9-7950x", "motherboard:x670e-hero", "gpu:rtx-4090", "psu:hx1200"] {
        build.select(catalog.resolve_ref(reference)?);
    }

    let mut engine = RulesEngine::with_default_rules();
    engine.add_rule(Arc::new(BudgetRule { limit: 2000.0 }));

    let issues = engine.evaluate(&build);
    println!("Custom check found {} issues", issues.len());
    for issue in &issues {
        println!("  [{:?}] {} ({})", issue.severity, issue.message, issue.rule_id);
    }

    let errors = issues
        .iter()
        .filter(|i| matches!(i.severity, Severity::Error))
        .count();
    if errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}
