//! CLI command implementations.

pub mod plan;
pub mod show;

use crate::models::plan::{PlanStatus, PlanSummary, RenamePlanItem};
use colored::{ColoredString, Colorize};
use std::path::Path;

fn status_tag(status: PlanStatus) -> ColoredString {
    match status {
        PlanStatus::Auto => "[AUTO]".green(),
        PlanStatus::Manual => "[MANUAL]".yellow(),
        PlanStatus::Conflict => "[CONFLICT]".red(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Print one plan item on one or two lines.
pub(crate) fn print_item(item: &RenamePlanItem) {
    if item.is_resolved() {
        println!(
            "  {} {} -> {} ({}, {:.2})",
            status_tag(item.status),
            file_name(&item.source),
            file_name(&item.destination).cyan(),
            item.method,
            item.confidence
        );
    } else {
        println!("  {} {}", status_tag(item.status), file_name(&item.source));
    }
    if let Some(reason) = &item.reason {
        println!("      {} {}", "->".yellow(), reason);
    }
}

pub(crate) fn print_summary(summary: &PlanSummary) {
    println!("{}", "📋 Plan Summary".bold().green());
    println!("  {} {}", "Files:".bold(), summary.total);
    println!("  {} {}", "Auto:".bold(), summary.auto.to_string().green());
    println!("  {} {}", "Manual review:".bold(), summary.manual.to_string().yellow());
    println!("  {} {}", "Conflicts:".bold(), summary.conflict.to_string().red());
}
