use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analyzer::power::{PowerBudget, PSU_SAFETY_MARGIN_W, THERMAL_HEADROOM_RATIO};
use crate::build::Build;
use crate::catalog::schema::Category;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Ok,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub id: String,
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    /// Slots the rule looked at when it fired.
    pub categories: Vec<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Issue {
    /// The id is derived from rule id and message, so equal inputs give
    /// equal issues.
    pub fn new(
        rule_id: &str,
        severity: Severity,
        categories: &[Category],
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let id = Uuid::new_v5(
            &Uuid::NAMESPACE_OID,
            format!("{}:{}", rule_id, message).as_bytes(),
        );
        Self {
            id: id.to_string(),
            rule_id: rule_id.to_string(),
            severity,
            message,
            categories: categories.to_vec(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn involves(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

pub trait Rule: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// Slots this rule compares.
    fn categories(&self) -> &[Category];
    fn check(&self, build: &Build) -> Vec<Issue>;
}

/// Rule id of the all-clear issue.
pub const COMPLETION_RULE_ID: &str = "compatibility";

pub struct RulesEngine {
    rules: Vec<Arc<dyn Rule>>,
}

impl RulesEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The five compatibility checks in evaluation order.
    pub fn default_rules() -> Vec<Arc<dyn Rule>> {
        vec![
            Arc::new(CpuSocketRule),
            Arc::new(MemoryTypeRule),
            Arc::new(CoolerCapacityRule),
            Arc::new(PsuWattageRule),
            Arc::new(FormFactorRule),
        ]
    }

    pub fn with_default_rules() -> Self {
        let mut engine = Self::new();
        for rule in Self::default_rules() {
            engine.add_rule(rule);
        }
        engine
    }

    /// Default rules restricted to `ids`, keeping default order. Unknown
    /// ids are ignored.
    pub fn with_rules<S: AsRef<str>>(ids: &[S]) -> Self {
        let defaults = Self::default_rules();
        for id in ids {
            if !defaults.iter().any(|rule| rule.id() == id.as_ref()) {
                tracing::warn!("Ignoring unknown rule id '{}'", id.as_ref());
            }
        }
        let mut engine = Self::new();
        for rule in defaults {
            if ids.iter().any(|id| id.as_ref() == rule.id()) {
                engine.add_rule(rule);
            }
        }
        engine
    }

    /// Process-wide engine with the default rules.
    pub fn shared() -> &'static RulesEngine {
        static ENGINE: OnceLock<RulesEngine> = OnceLock::new();
        ENGINE.get_or_init(RulesEngine::with_default_rules)
    }

    pub fn add_rule(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> + '_ {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Run every rule in order. When nothing fired and at least one slot is
    /// filled, a single `ok` issue is appended.
    pub fn evaluate(&self, build: &Build) -> Vec<Issue> {
        let mut issues = Vec::new();
        for rule in &self.rules {
            issues.extend(rule.check(build));
        }

        if issues.is_empty() && !build.is_empty() {
            let filled: Vec<Category> = build.iter().map(|(category, _)| category).collect();
            issues.push(Issue::new(
                COMPLETION_RULE_ID,
                Severity::Ok,
                &filled,
                "No compatibility issues detected ✓",
            ));
        }

        tracing::debug!(
            "Evaluated {} rules over {} slots: {} issues",
            self.rules.len(),
            build.len(),
            issues.len()
        );
        issues
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Evaluate `build` with the default rules.
pub fn evaluate(build: &Build) -> Vec<Issue> {
    RulesEngine::shared().evaluate(build)
}

// Rule implementations

pub struct CpuSocketRule;

impl Rule for CpuSocketRule {
    fn id(&self) -> &str {
        "cpu_socket"
    }

    fn name(&self) -> &str {
        "CPU Socket Check"
    }

    fn description(&self) -> &str {
        "CPU socket must match the motherboard socket exactly"
    }

    fn categories(&self) -> &[Category] {
        &[Category::Cpu, Category::Motherboard]
    }

    fn check(&self, build: &Build) -> Vec<Issue> {
        let (Some(cpu), Some(board)) = (build.cpu(), build.motherboard()) else {
            return Vec::new();
        };
        if cpu.socket == board.socket {
            return Vec::new();
        }
        vec![Issue::new(
            self.id(),
            Severity::Error,
            self.categories(),
            format!(
                "CPU socket ({}) doesn't match motherboard socket ({})",
                cpu.socket, board.socket
            ),
        )
        .with_suggestion(format!("Choose a {} motherboard or a {} CPU", cpu.socket, board.socket))]
    }
}

pub struct MemoryTypeRule;

impl Rule for MemoryTypeRule {
    fn id(&self) -> &str {
        "memory_type"
    }

    fn name(&self) -> &str {
        "Memory Type Check"
    }

    fn description(&self) -> &str {
        "RAM generation must be supported by the motherboard"
    }

    fn categories(&self) -> &[Category] {
        &[Category::Ram, Category::Motherboard]
    }

    fn check(&self, build: &Build) -> Vec<Issue> {
        let (Some(ram), Some(board)) = (build.ram(), build.motherboard()) else {
            return Vec::new();
        };
        if ram.kind == board.ram_type {
            return Vec::new();
        }
        vec![Issue::new(
            self.id(),
            Severity::Error,
            self.categories(),
            format!(
                "RAM type ({}) is incompatible with motherboard (supports {})",
                ram.kind, board.ram_type
            ),
        )
        .with_suggestion(format!("Choose {} memory", board.ram_type))]
    }
}

pub struct CoolerCapacityRule;

impl Rule for CoolerCapacityRule {
    fn id(&self) -> &str {
        "cooler_capacity"
    }

    fn name(&self) -> &str {
        "Cooler Capacity Check"
    }

    fn description(&self) -> &str {
        "Cooler must handle CPU TDP, warns above 85% of its rated capacity"
    }

    fn categories(&self) -> &[Category] {
        &[Category::Cpu, Category::Cooler]
    }

    fn check(&self, build: &Build) -> Vec<Issue> {
        let (Some(cpu), Some(cooler)) = (build.cpu(), build.cooler()) else {
            return Vec::new();
        };

        if cpu.tdp > cooler.tdp_capacity {
            vec![Issue::new(
                self.id(),
                Severity::Error,
                self.categories(),
                format!(
                    "CPU TDP ({}W) exceeds cooler capacity ({}W)",
                    cpu.tdp, cooler.tdp_capacity
                ),
            )
            .with_suggestion(format!("Choose a cooler rated for at least {}W", cpu.tdp))]
        } else if cpu.tdp > cooler.tdp_capacity * THERMAL_HEADROOM_RATIO {
            vec![Issue::new(
                self.id(),
                Severity::Warning,
                self.categories(),
                format!(
                    "CPU TDP ({}W) is close to cooler limit ({}W) — consider headroom",
                    cpu.tdp, cooler.tdp_capacity
                ),
            )]
        } else {
            Vec::new()
        }
    }
}

pub struct PsuWattageRule;

impl Rule for PsuWattageRule {
    fn id(&self) -> &str {
        "psu_wattage"
    }

    fn name(&self) -> &str {
        "PSU Wattage Check"
    }

    fn description(&self) -> &str {
        "PSU must cover CPU + GPU + 75W system draw, warns under 100W of headroom"
    }

    fn categories(&self) -> &[Category] {
        &[Category::Psu, Category::Cpu, Category::Gpu]
    }

    fn check(&self, build: &Build) -> Vec<Issue> {
        let Some(psu) = build.psu() else {
            return Vec::new();
        };
        if build.cpu().is_none() && build.gpu().is_none() {
            return Vec::new();
        }

        let estimated = PowerBudget::estimate(build).total;
        if psu.wattage < estimated {
            vec![Issue::new(
                self.id(),
                Severity::Error,
                self.categories(),
                format!(
                    "PSU ({}W) insufficient — estimated system draw ~{}W",
                    psu.wattage, estimated
                ),
            )
            .with_suggestion(format!(
                "Choose a PSU of at least {}W",
                estimated + PSU_SAFETY_MARGIN_W
            ))]
        } else if psu.wattage < estimated + PSU_SAFETY_MARGIN_W {
            vec![Issue::new(
                self.id(),
                Severity::Warning,
                self.categories(),
                format!(
                    "PSU headroom is tight ({}W vs ~{}W needed) — consider a higher wattage",
                    psu.wattage, estimated
                ),
            )]
        } else {
            Vec::new()
        }
    }
}

pub struct FormFactorRule;

impl Rule for FormFactorRule {
    fn id(&self) -> &str {
        "form_factor"
    }

    fn name(&self) -> &str {
        "Case Form Factor Check"
    }

    fn description(&self) -> &str {
        "Case must be at least as large as the motherboard (mATX < ATX < E-ATX)"
    }

    fn categories(&self) -> &[Category] {
        &[Category::Case, Category::Motherboard]
    }

    fn check(&self, build: &Build) -> Vec<Issue> {
        let (Some(case), Some(board)) = (build.case(), build.motherboard()) else {
            return Vec::new();
        };
        if case.form_factor.rank() >= board.form_factor.rank() {
            return Vec::new();
        }
        vec![Issue::new(
            self.id(),
            Severity::Error,
            self.categories(),
            format!(
                "Case ({}) is too small for motherboard ({})",
                case.form_factor, board.form_factor
            ),
        )
        .with_suggestion(format!(
            "Choose a {} or larger case",
            board.form_factor
        ))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::schema::*;

    fn item(id: &str, specs: Specs) -> Item {
        Item {
            id: id.to_string(),
            name: id.to_string(),
            brand: "Test".to_string(),
            price: 100.0,
            specs,
        }
    }

    fn cpu(socket: &str, tdp: f64) -> Item {
        item(
            "cpu",
            Specs::Cpu(CpuSpecs {
                socket: socket.to_string(),
                tdp,
                cores: None,
                threads: None,
                base: None,
                boost: None,
            }),
        )
    }

    fn board(socket: &str, ram_type: &str, form_factor: &str) -> Item {
        item(
            "board",
            Specs::Motherboard(MotherboardSpecs {
                socket: socket.to_string(),
                ram_type: ram_type.to_string(),
                form_factor: FormFactor::from(form_factor),
            }),
        )
    }

    fn ram(kind: &str) -> Item {
        item(
            "ram",
            Specs::Ram(RamSpecs {
                kind: kind.to_string(),
                speed: None,
                capacity: None,
            }),
        )
    }

    fn cooler(capacity: f64) -> Item {
        item(
            "cooler",
            Specs::Cooler(CoolerSpecs {
                kind: None,
                tdp_capacity: capacity,
            }),
        )
    }

    fn psu(wattage: f64) -> Item {
        item(
            "psu",
            Specs::Psu(PsuSpecs {
                wattage,
                efficiency: None,
                modular: None,
            }),
        )
    }

    fn gpu(tdp: f64) -> Item {
        item(
            "gpu",
            Specs::Gpu(GpuSpecs {
                tdp,
                vram: None,
                base_clock: None,
                boost_clock: None,
            }),
        )
    }

    fn case(form_factor: &str) -> Item {
        item(
            "case",
            Specs::Case(CaseSpecs {
                form_factor: FormFactor::from(form_factor),
                color: None,
            }),
        )
    }

    fn build(items: Vec<Item>) -> Build {
        items.into_iter().collect()
    }

    #[test]
    fn test_issue_ids_are_stable() {
        let a = Issue::new("cpu_socket", Severity::Error, &[Category::Cpu], "msg");
        let b = Issue::new("cpu_socket", Severity::Error, &[Category::Cpu], "msg");
        let c = Issue::new("cpu_socket", Severity::Error, &[Category::Cpu], "other");
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_cpu_socket_rule() {
        let issues = CpuSocketRule.check(&build(vec![cpu("LGA1700", 125.0), board("AM5", "DDR5", "ATX")]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(
            issues[0].message,
            "CPU socket (LGA1700) doesn't match motherboard socket (AM5)"
        );
        assert!(issues[0].involves(Category::Motherboard));

        assert!(CpuSocketRule
            .check(&build(vec![cpu("AM5", 65.0), board("AM5", "DDR5", "ATX")]))
            .is_empty());
    }

    #[test]
    fn test_cpu_socket_rule_is_case_sensitive() {
        let issues = CpuSocketRule.check(&build(vec![cpu("am5", 65.0), board("AM5", "DDR5", "ATX")]));
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_cpu_socket_rule_needs_both_sides() {
        assert!(CpuSocketRule.check(&build(vec![cpu("AM5", 65.0)])).is_empty());
        assert!(CpuSocketRule
            .check(&build(vec![board("AM5", "DDR5", "ATX")]))
            .is_empty());
    }

    #[test]
    fn test_memory_type_rule() {
        let issues = MemoryTypeRule.check(&build(vec![ram("DDR4"), board("AM5", "DDR5", "ATX")]));
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message,
            "RAM type (DDR4) is incompatible with motherboard (supports DDR5)"
        );
        assert!(MemoryTypeRule
            .check(&build(vec![ram("DDR5"), board("AM5", "DDR5", "ATX")]))
            .is_empty());
    }

    #[test]
    fn test_cooler_capacity_error() {
        let issues = CoolerCapacityRule.check(&build(vec![cpu("AM5", 170.0), cooler(130.0)]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].message, "CPU TDP (170W) exceeds cooler capacity (130W)");
    }

    #[test]
    fn test_cooler_capacity_warning() {
        let issues = CoolerCapacityRule.check(&build(vec![cpu("AM5", 105.0), cooler(110.0)]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(
            issues[0].message,
            "CPU TDP (105W) is close to cooler limit (110W) — consider headroom"
        );
    }

    #[test]
    fn test_cooler_capacity_boundaries() {
        // Equal to capacity is not an error, but is above 85%.
        let at_limit = CoolerCapacityRule.check(&build(vec![cpu("AM5", 130.0), cooler(130.0)]));
        assert_eq!(at_limit.len(), 1);
        assert_eq!(at_limit[0].severity, Severity::Warning);

        // Exactly 85% is not a warning.
        let at_ratio = CoolerCapacityRule.check(&build(vec![cpu("AM5", 85.0), cooler(100.0)]));
        assert!(at_ratio.is_empty());
    }

    #[test]
    fn test_psu_rule_levels() {
        let base = vec![cpu("AM5", 200.0), gpu(250.0)];

        let mut items = base.clone();
        items.push(psu(400.0));
        let issues = PsuWattageRule.check(&build(items));
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(
            issues[0].message,
            "PSU (400W) insufficient — estimated system draw ~525W"
        );

        let mut items = base.clone();
        items.push(psu(560.0));
        let issues = PsuWattageRule.check(&build(items));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(
            issues[0].message,
            "PSU headroom is tight (560W vs ~525W needed) — consider a higher wattage"
        );

        let mut items = base;
        items.push(psu(650.0));
        assert!(PsuWattageRule.check(&build(items)).is_empty());
    }

    #[test]
    fn test_psu_rule_boundaries() {
        // wattage == estimated is enough; == estimated + margin clears the warning.
        let issues = PsuWattageRule.check(&build(vec![gpu(100.0), psu(175.0)]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);

        assert!(PsuWattageRule
            .check(&build(vec![gpu(100.0), psu(275.0)]))
            .is_empty());
    }

    #[test]
    fn test_psu_rule_needs_a_consumer() {
        assert!(PsuWattageRule.check(&build(vec![psu(100.0)])).is_empty());
        assert!(PsuWattageRule
            .check(&build(vec![psu(100.0), case("ATX")]))
            .is_empty());
    }

    #[test]
    fn test_form_factor_rule() {
        let issues = FormFactorRule.check(&build(vec![case("mATX"), board("AM5", "DDR5", "E-ATX")]));
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message,
            "Case (mATX) is too small for motherboard (E-ATX)"
        );

        // Larger case fits a smaller board.
        assert!(FormFactorRule
            .check(&build(vec![case("E-ATX"), board("AM5", "DDR5", "mATX")]))
            .is_empty());
    }

    #[test]
    fn test_form_factor_unknown_token_ranks_as_atx() {
        assert!(FormFactorRule
            .check(&build(vec![case("Mini-ITX"), board("AM5", "DDR5", "ATX")]))
            .is_empty());
        assert_eq!(
            FormFactorRule
                .check(&build(vec![case("Mini-ITX"), board("AM5", "DDR5", "E-ATX")]))
                .len(),
            1
        );
        assert_eq!(
            FormFactorRule
                .check(&build(vec![case("mATX"), board("AM5", "DDR5", "XL-ATX")]))
                .len(),
            1
        );
    }

    #[test]
    fn test_engine_order() {
        let engine = RulesEngine::with_default_rules();
        let issues = engine.evaluate(&build(vec![
            cpu("LGA1700", 300.0),
            board("AM5", "DDR5", "E-ATX"),
            ram("DDR4"),
            cooler(130.0),
            psu(300.0),
            case("mATX"),
        ]));
        let rule_ids: Vec<&str> = issues.iter().map(|i| i.rule_id.as_str()).collect();
        assert_eq!(
            rule_ids,
            vec!["cpu_socket", "memory_type", "cooler_capacity", "psu_wattage", "form_factor"]
        );
    }

    #[test]
    fn test_engine_completion_issue() {
        let engine = RulesEngine::with_default_rules();
        assert!(engine.evaluate(&Build::new()).is_empty());

        let issues = engine.evaluate(&build(vec![case("ATX")]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Ok);
        assert_eq!(issues[0].rule_id, COMPLETION_RULE_ID);
        assert_eq!(issues[0].message, "No compatibility issues detected ✓");
        assert_eq!(issues[0].categories, vec![Category::Case]);
    }

    #[test]
    fn test_with_rules_subset() {
        let engine = RulesEngine::with_rules(&["form_factor", "cpu_socket", "bogus"]);
        let ids: Vec<&str> = engine.rules().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["cpu_socket", "form_factor"]);

        // Memory mismatch is not checked, so the build reports ok.
        let issues = engine.evaluate(&build(vec![ram("DDR4"), board("AM5", "DDR5", "ATX")]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Ok);
    }

    #[test]
    fn test_shared_engine_matches_default() {
        let b = build(vec![cpu("AM5", 105.0), cooler(110.0)]);
        assert_eq!(evaluate(&b), RulesEngine::default().evaluate(&b));
    }
}
