//! Output formatting for CLI reports

use crate::{analysis::ScoreSummary, model::ContributionVector};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print mean, spread and range of a score sample
pub fn print_score_summary(summary: &ScoreSummary) {
    print_kv("Episodes", &summary.count.to_string());
    print_kv("Mean", &format!("{:.3}", summary.mean));
    print_kv("Std dev", &format!("{:.3}", summary.std_dev));
    print_kv("Min", &format!("{:.3}", summary.min));
    print_kv("Max", &format!("{:.3}", summary.max));
}

/// Print one line per accountability dimension
pub fn print_dimensions(scores: &ContributionVector) {
    for (dimension, value) in scores.iter() {
        print_kv(dimension.as_str(), &format!("{value:.1}"));
    }
}

/// Format a fraction as a percentage
pub fn format_percent(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 / whole as f64 * 100.0)
}
