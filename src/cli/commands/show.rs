//! Show command implementation.

use super::{print_item, print_summary};
use crate::cli::args::StatusFilter;
use crate::core::planner;
use crate::models::plan::PlanStatus;
use crate::Result;
use colored::Colorize;
use std::path::Path;

impl From<StatusFilter> for PlanStatus {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Auto => PlanStatus::Auto,
            StatusFilter::Manual => PlanStatus::Manual,
            StatusFilter::Conflict => PlanStatus::Conflict,
        }
    }
}

/// Print a saved plan grouped by status.
pub async fn show_plan(plan_file: &Path, filter: Option<StatusFilter>) -> Result<()> {
    let plan = planner::load_plan(plan_file)?;

    println!("{} {}", "📋 Plan:".bold().cyan(), plan_file.display());
    println!("  {} {}", "Version:".bold(), plan.version);
    println!("  {} {}", "Root:".bold(), plan.root.display());
    println!();

    let statuses = match filter {
        Some(f) => vec![PlanStatus::from(f)],
        None => vec![PlanStatus::Conflict, PlanStatus::Manual, PlanStatus::Auto],
    };

    for status in statuses {
        let items: Vec<_> = plan.items_with_status(status).collect();
        if items.is_empty() {
            continue;
        }
        println!("{} ({})", status.to_string().to_uppercase().bold(), items.len());
        for item in items {
            print_item(item);
        }
        println!();
    }

    if !plan.errors.is_empty() {
        println!("{}", "Errors:".bold().yellow());
        for error in &plan.errors {
            println!("  - {}", error);
        }
        println!();
    }

    print_summary(&plan.summary());
    Ok(())
}
