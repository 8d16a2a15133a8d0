//! Simple check example: assemble a build from `category:id` references and
//! print its compatibility report.
//! Run with: cargo run --example simple_check [cpu:r5-7600 motherboard:b650-tomahawk ...]

use pcforge::prelude::*;

fn main() -> Result<(), PcForgeError> {
    let mut refs: Vec<String> = std::env::args().skip(1).collect();
    if refs.is_empty() {
        refs = vec![
            "cpu:i5-13600k".to_string(),
            "motherboard:b650-tomahawk".to_string(),
            "cooler:ak400".to_string(),
            "psu:cx450".to_string(),
        ];
    }

    let catalog = Catalog::builtin()?;
    let mut build = Build::new();
    for reference in &refs {
        build.select(catalog.resolve_ref(reference)?);
    }

    let result = PcForgeCore::check(&build, &CheckOptions::default());

    println!("Build:");
    for (category, item) in build.iter() {
        println!("  {:<14} {} (${})", category.label(), item.display_name(), item.price);
    }
    println!();
    println!("Estimated draw: ~{}W", result.power.total);
    if let Some(load) = result.psu_load_percent {
        println!("PSU load: {}%", load);
    }
    println!();

    for issue in &result.issues {
        println!("  [{:?}] {}", issue.severity, issue.message);
        if let Some(ref suggestion) = issue.suggestion {
            println!("    Suggestion: {}", suggestion);
        }
    }

    if result.has_errors() {
        println!("\nBuild has compatibility errors.");
        std::process::exit(1);
    }

    println!("\nBuild is compatible.");
    Ok(())
}
