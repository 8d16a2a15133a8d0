//! PCForge CLI - PC build compatibility checks and power estimates from the command line.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use pcforge::{
    export_text, Build, BuildIds, Catalog, Category, CheckOptions, CheckResult, Issue,
    PcForgeCore, RulesEngine, Severity, SortOrder,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pcforge")]
#[command(about = "PC build compatibility checker and power estimator", long_about = None)]
#[command(version)]
struct Cli {
    /// Load components from this JSON catalog instead of the builtin one
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a build for compatibility issues
    Check {
        #[command(flatten)]
        build: BuildArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if issues found at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,

        /// Only run these rules (repeatable)
        #[arg(long = "rule", value_name = "RULE_ID")]
        rules: Vec<String>,
    },

    /// List catalog candidates for a slot with compatibility badges
    Pick {
        /// Slot to fill (cpu, motherboard, ram, gpu, storage, psu, case, cooler)
        #[arg(value_name = "CATEGORY")]
        category: String,

        #[command(flatten)]
        build: BuildArgs,

        /// Case-insensitive match on name or brand
        #[arg(short, long, default_value = "")]
        search: String,

        /// Sort order (price-asc, price-desc, name-asc)
        #[arg(long, default_value = "price-asc")]
        sort: SortOrder,

        /// Skip compatibility filtering
        #[arg(long)]
        free: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List available compatibility rules
    Rules {
        /// Show detailed rule descriptions
        #[arg(long)]
        verbose: bool,
    },

    /// Print the build as a plain-text parts list
    Export {
        #[command(flatten)]
        build: BuildArgs,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the build's share ids as JSON
    Share {
        #[command(flatten)]
        build: BuildArgs,
    },
}

/// How a build is given on the command line.
#[derive(clap::Args)]
struct BuildArgs {
    /// Selected part as CATEGORY:ID, e.g. cpu:r5-7600 (repeatable)
    #[arg(short, long = "item", value_name = "CATEGORY:ID")]
    items: Vec<String>,

    /// Start from a shared build, e.g. '{"cpu":"r5-7600"}'
    #[arg(long, value_name = "JSON")]
    share: Option<String>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts
    Json,
}

#[derive(Clone, ValueEnum)]
enum FailOnSeverity {
    Error,
    Warning,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Check {
            build,
            format,
            fail_on,
            rules,
        } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            handle_check(&catalog, &build, format, fail_on, rules)
        }
        Commands::Pick {
            category,
            build,
            search,
            sort,
            free,
            format,
        } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            handle_pick(&catalog, &category, &build, &search, sort, free, format)?;
            Ok(0)
        }
        Commands::Rules { verbose } => {
            handle_rules(verbose);
            Ok(0)
        }
        Commands::Export { build, output } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            handle_export(&catalog, &build, output.as_deref())?;
            Ok(0)
        }
        Commands::Share { build } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            let build = assemble_build(&catalog, &build)?;
            println!("{}", build.to_ids().to_json());
            Ok(0)
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let catalog = match path {
        Some(path) => Catalog::load_file(path)
            .with_context(|| format!("failed to load catalog {}", path.display()))?,
        None => Catalog::builtin()?,
    };
    tracing::debug!(
        "Using {} catalog with {} items",
        path.map_or_else(|| "builtin".to_string(), |p| p.display().to_string()),
        catalog.len()
    );
    Ok(catalog)
}

/// Shared ids first, then `--item` selections on top.
fn assemble_build(catalog: &Catalog, args: &BuildArgs) -> Result<Build> {
    let mut build = match &args.share {
        Some(json) => {
            let ids = BuildIds::from_json(json).context("invalid --share value")?;
            let build = catalog.restore(&ids);
            tracing::debug!(
                "Restored {} of {} slots from shared build",
                build.len(),
                ids.0.len()
            );
            build
        }
        None => Build::new(),
    };
    for reference in &args.items {
        build.select(catalog.resolve_ref(reference)?);
    }
    Ok(build)
}

fn handle_check(
    catalog: &Catalog,
    args: &BuildArgs,
    format: OutputFormat,
    fail_on: Option<FailOnSeverity>,
    rules: Vec<String>,
) -> Result<i32> {
    let build = assemble_build(catalog, args)?;
    let options = CheckOptions {
        free_mode: false,
        rules,
    };
    let result = PcForgeCore::check(&build, &options);

    match format {
        OutputFormat::Human => output_human(&build, &result),
        OutputFormat::Json => output_json(&build, &result)?,
    }

    if let Some(severity) = fail_on {
        if should_fail(&result, &severity) {
            return Ok(1);
        }
    }
    Ok(0)
}

fn should_fail(result: &CheckResult, severity: &FailOnSeverity) -> bool {
    match severity {
        FailOnSeverity::Error => result.has_errors(),
        FailOnSeverity::Warning => result.has_warnings_or_errors(),
    }
}

fn output_human(build: &Build, result: &CheckResult) {
    if build.is_empty() {
        println!("Build is empty. Add parts with --item CATEGORY:ID");
        return;
    }

    println!("\nBuild");
    println!("{}", "─".repeat(60));
    for (category, item) in build.iter() {
        println!(
            "  {:<14} {:<36} ${}",
            category.label(),
            item.display_name(),
            pcforge::export::format_price(item.price)
        );
    }
    println!(
        "  {:<14} {:<36} ${}",
        "Total",
        "",
        pcforge::export::format_price(build.total_price())
    );

    print!("\n  Estimated draw: ~{}W", result.power.total);
    match result.psu_load_percent {
        Some(load) => println!(" ({}% of PSU)", load),
        None => println!(),
    }

    let errors: Vec<&Issue> = by_severity(result, Severity::Error);
    let warnings: Vec<&Issue> = by_severity(result, Severity::Warning);

    if !errors.is_empty() {
        println!("\n  ERRORS:");
        for issue in errors {
            println!("    - {}", issue.message);
            if let Some(ref suggestion) = issue.suggestion {
                println!("      Suggestion: {}", suggestion);
            }
        }
    }
    if !warnings.is_empty() {
        println!("\n  WARNINGS:");
        for issue in warnings {
            println!("    - {}", issue.message);
        }
    }
    for issue in by_severity(result, Severity::Ok) {
        println!("\n  OK: {}", issue.message);
    }

    println!("\n  Summary:");
    println!("    Errors:   {}", result.stats.errors);
    println!("    Warnings: {}", result.stats.warnings);
}

fn by_severity(result: &CheckResult, severity: Severity) -> Vec<&Issue> {
    result
        .issues
        .iter()
        .filter(|i| i.severity == severity)
        .collect()
}

fn output_json(build: &Build, result: &CheckResult) -> Result<()> {
    let slots: serde_json::Map<String, serde_json::Value> = Category::ALL
        .iter()
        .map(|&category| {
            (
                category.to_string(),
                serde_json::to_value(result.slot_status(build, category))
                    .unwrap_or(serde_json::Value::Null),
            )
        })
        .collect();

    let output = serde_json::json!({
        "generated_at": Utc::now().to_rfc3339(),
        "build": build.to_ids(),
        "total_price": build.total_price(),
        "issues": result.issues,
        "power": result.power,
        "psu_load_percent": result.psu_load_percent,
        "slots": slots,
        "stats": result.stats,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn handle_pick(
    catalog: &Catalog,
    category: &str,
    args: &BuildArgs,
    search: &str,
    sort: SortOrder,
    free: bool,
    format: OutputFormat,
) -> Result<()> {
    let category: Category = category.parse()?;
    let build = assemble_build(catalog, args)?;
    let options = CheckOptions {
        free_mode: free,
        rules: vec![],
    };
    let candidates = PcForgeCore::pick(catalog, &build, category, search, sort, &options);

    match format {
        OutputFormat::Human => {
            println!("{} candidates (sort: {})\n", category.label(), sort);
            if candidates.is_empty() {
                println!("  No matching parts");
            }
            for candidate in &candidates {
                let item = &candidate.item;
                println!(
                    "  [{:<8}] {:<20} {:<36} ${}",
                    candidate.status.as_str(),
                    item.id,
                    item.display_name(),
                    pcforge::export::format_price(item.price)
                );
                let chips = item.spec_chips();
                if !chips.is_empty() {
                    println!("             {}", chips.join(" · "));
                }
            }
        }
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = candidates
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "item": c.item.as_ref(),
                        "status": c.status,
                    })
                })
                .collect();
            let output = serde_json::json!({
                "category": category,
                "sort": sort,
                "candidates": rows,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn handle_rules(verbose: bool) {
    println!("Available compatibility rules:\n");

    let engine = RulesEngine::with_default_rules();
    for rule in engine.rules() {
        println!("  {}", rule.id());
        println!("    {}", rule.name());
        if verbose {
            println!("    {}", rule.description());
            let slots: Vec<&str> = rule.categories().iter().map(|c| c.as_str()).collect();
            println!("    Slots: {}", slots.join(", "));
        }
        println!();
    }
}

fn handle_export(catalog: &Catalog, args: &BuildArgs, output: Option<&Path>) -> Result<()> {
    let build = assemble_build(catalog, args)?;
    if build.is_empty() {
        bail!("nothing to export, the build is empty");
    }
    let text = export_text(&build, Utc::now());
    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", text))
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Exported build to {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}
