//! Plain-text build export.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::build::Build;

/// Render the build as a shopping list, one line per filled slot in slot
/// order, followed by the total.
pub fn export_text(build: &Build, generated_at: DateTime<Utc>) -> String {
    let mut lines = vec![
        "PCForge Build Export".to_string(),
        "=".repeat(40),
        format!(
            "Exported: {}",
            generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        String::new(),
    ];
    for (category, item) in build.iter() {
        lines.push(format!(
            "{}: {} - ${}",
            category.label(),
            item.display_name(),
            format_price(item.price)
        ));
    }
    lines.push(String::new());
    lines.push(format!("Total: ${}", format_price(build.total_price())));
    lines.join("\n")
}

/// `1299` -> `1,299`, `89.5` -> `89.50`.
pub fn format_price(price: f64) -> String {
    let cents = (price * 100.0).round() as i64;
    let negative = cents < 0;
    let cents = cents.abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    match cents % 100 {
        0 => format!("{}{}", sign, grouped),
        fraction => format!("{}{}.{:02}", sign, grouped, fraction),
    }
}
