//! Episode Planner CLI
//!
//! Matches TV episode files against canonical episode catalogs and writes
//! a reviewable rename plan.

use clap::Parser;
use episode_planner::cli::{
    args::{Cli, Commands},
    commands::{plan, show},
};
use episode_planner::models::config::load_config;
use episode_planner::preflight::{self, PreflightOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match cli.command {
        Commands::Plan(args) => {
            let config = plan::apply_args(load_config(), &args);

            // Run preflight checks unless skipped
            if !cli.skip_preflight {
                run_preflight_checks(&plan::preflight_options(&args, &config)).await?;
            }

            plan::plan_episodes(&args, config).await?;
        }

        Commands::Show { plan_file, status } => {
            show::show_plan(&plan_file, status).await?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("episode_planner=debug")
    } else {
        EnvFilter::new("episode_planner=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
async fn run_preflight_checks(options: &PreflightOptions) -> anyhow::Result<()> {
    use colored::Colorize;

    let results = preflight::run_preflight_checks(options).await;
    if results.is_empty() {
        return Ok(());
    }

    println!("{}", "Running preflight checks...".bold());
    println!();
    preflight::print_results(&results);
    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
