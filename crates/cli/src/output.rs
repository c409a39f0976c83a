//! Terminal output utilities
//!
//! Provides consistent formatting for filter results.

use owo_colors::OwoColorize;
use petfood_search::{MatchResult, ProteinPurity, PurityTier, QueryLabels, RankedProduct};

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Format a match percentage, right-aligned to four columns
pub fn format_percent(percent: u32) -> String {
    format!("{:>3}%", percent)
}

/// Uncolored tier label, e.g. `pure 100%`
pub fn tier_label(purity: &ProteinPurity) -> String {
    if purity.tier == PurityTier::None {
        "none".to_string()
    } else {
        format!("{} {}%", purity.tier, purity.percent)
    }
}

/// Tier label colored by quality
pub fn tier_badge(purity: &ProteinPurity) -> String {
    color_tier(tier_label(purity), purity.tier)
}

/// Tier badge left-aligned to `width` columns.
///
/// Padding is applied before coloring so escape codes do not count
/// toward the width.
pub fn tier_badge_padded(purity: &ProteinPurity, width: usize) -> String {
    color_tier(format!("{:<width$}", tier_label(purity)), purity.tier)
}

fn color_tier(label: String, tier: PurityTier) -> String {
    match tier {
        PurityTier::Pure => label.green().to_string(),
        PurityTier::Meal => label.cyan().to_string(),
        PurityTier::Fat => label.yellow().to_string(),
        PurityTier::Mixed => label.magenta().to_string(),
        PurityTier::None => label.dimmed().to_string(),
    }
}

fn purity_of(result: &MatchResult) -> Option<ProteinPurity> {
    Some(ProteinPurity {
        percent: result.purity_percent?,
        tier: result.tier?,
    })
}

/// One result line without color: percent, name, brand and tier
pub fn plain_row(ranked: &RankedProduct<'_>) -> String {
    let mut row = format!(
        "{}  {}",
        format_percent(ranked.result.match_percent),
        ranked.product.name
    );
    if !ranked.product.brand.is_empty() {
        row.push_str(&format!(" ({})", ranked.product.brand));
    }
    if let Some(purity) = purity_of(&ranked.result) {
        row.push_str(&format!("  [{}]", tier_label(&purity)));
    }
    if !ranked.result.show {
        row.push_str("  hidden");
    }
    row
}

/// One result line for terminal display
pub fn match_row(ranked: &RankedProduct<'_>) -> String {
    let percent = format_percent(ranked.result.match_percent);
    let percent = match ranked.result.match_percent {
        100 => percent.green().bold().to_string(),
        50..=99 => percent.yellow().to_string(),
        _ => percent.dimmed().to_string(),
    };

    let mut row = format!("{}  {}", percent, ranked.product.name.bold());
    if !ranked.product.brand.is_empty() {
        row.push_str(&format!(" {}", format!("({})", ranked.product.brand).dimmed()));
    }
    if let Some(purity) = purity_of(&ranked.result) {
        row.push_str(&format!("  {}", tier_badge(&purity)));
    }
    if !ranked.result.show {
        row.push_str(&format!("  {}", "hidden".red()));
    }
    row
}

/// Query chips as `+include -exclude`
pub fn format_labels(labels: &QueryLabels) -> String {
    labels
        .includes
        .iter()
        .map(|l| format!("+{}", l))
        .chain(labels.excludes.iter().map(|l| format!("-{}", l)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use petfood_search::ProductRecord;

    fn ranked(product: &ProductRecord, percent: u32, show: bool) -> RankedProduct<'_> {
        RankedProduct {
            product,
            result: MatchResult {
                match_percent: percent,
                show,
                tier: Some(PurityTier::Meal),
                purity_percent: Some(93),
                ..MatchResult::default()
            },
        }
    }

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "product", "products"), "1 product");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(5, "product", "products"), "5 products");
    }

    #[test]
    fn test_format_percent_pads() {
        assert_eq!(format_percent(7), "  7%");
        assert_eq!(format_percent(100), "100%");
    }

    #[test]
    fn test_tier_label() {
        assert_eq!(tier_label(&ProteinPurity::PURE), "pure 100%");
        assert_eq!(tier_label(&ProteinPurity::NONE), "none");
    }

    #[test]
    fn test_tier_badge_padding_ignores_escape_codes() {
        let badge = tier_badge_padded(&ProteinPurity::MEAL, 12);
        assert!(badge.contains("meal 93%    "));
        assert!(badge.len() >= 12);
        let plain = tier_badge_padded(&ProteinPurity::NONE, 6);
        assert!(plain.contains("none  "));
    }

    #[test]
    fn test_plain_row() {
        let mut product = ProductRecord::new("p1", "Salmon Feast");
        product.brand = "Acme".to_string();
        let row = plain_row(&ranked(&product, 50, true));
        assert_eq!(row, " 50%  Salmon Feast (Acme)  [meal 93%]");
    }

    #[test]
    fn test_plain_row_hidden_without_brand() {
        let product = ProductRecord::new("p2", "Lamb Stew");
        let row = plain_row(&ranked(&product, 0, false));
        assert!(row.starts_with("  0%  Lamb Stew  ["));
        assert!(row.ends_with("hidden"));
    }

    #[test]
    fn test_format_labels() {
        let mut labels = QueryLabels::default();
        labels.includes.insert("chicken".to_string());
        labels.excludes.insert("beef".to_string());
        assert_eq!(format_labels(&labels), "+chicken -beef");
    }
}
