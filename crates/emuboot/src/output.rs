//! Terminal output utilities

use console::style;
use emuboot_core::{EnsureOutcome, EnsureReport};

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Short label for an ensure outcome
pub fn outcome_label(outcome: EnsureOutcome) -> String {
    match outcome {
        EnsureOutcome::Created => style("created").green().to_string(),
        EnsureOutcome::Present => style("present").dim().to_string(),
        EnsureOutcome::Occupied => style("occupied").yellow().to_string(),
    }
}

/// Print one line per ensured path
pub fn reports(reports: &[EnsureReport]) {
    for report in reports {
        println!("  {:>8}  {}", outcome_label(report.outcome), report.path);
    }
}
