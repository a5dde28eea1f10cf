//! Plan command implementation.
//!
//! Coordinates scanning, duration probing, catalog lookup, episode
//! resolution and plan output.

use super::{print_item, print_summary};
use crate::cli::args::PlanArgs;
use crate::core::planner::{self, Planner, PlannerConfig};
use crate::core::scanner::{scan_directory, ScanOptions};
use crate::models::config::Config;
use crate::preflight::PreflightOptions;
use crate::services::{
    ffprobe, CatalogProvider, CatalogResolver, FileCatalogProvider, OllamaAssistant, OllamaClient,
    OllamaConfig, TmdbClient, TmdbConfig,
};
use crate::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;

/// Apply command-line flags over the loaded configuration.
pub fn apply_args(mut config: Config, args: &PlanArgs) -> Config {
    config.modes.anthology |= args.anthology;
    config.modes.untrusted_titles |= args.untrusted_titles;
    if args.max_duration.is_some() {
        config.modes.max_duration = args.max_duration;
    }
    config.assistant.enabled |= args.assistant;
    config
}

/// Checks needed for this run.
pub fn preflight_options(args: &PlanArgs, config: &Config) -> PreflightOptions {
    PreflightOptions {
        probe: !args.no_probe,
        duration_pairing: config.modes.max_duration.is_some(),
        tmdb: args.tmdb,
        tmdb_language: config.tmdb.language.clone(),
        assistant: config
            .assistant
            .enabled
            .then(|| OllamaConfig::from_env().with_overrides(&config.ollama)),
    }
}

/// Build the provider chain: the catalog file first, then TMDB.
fn build_providers(args: &PlanArgs, config: &Config) -> Result<Vec<Box<dyn CatalogProvider>>> {
    let mut providers: Vec<Box<dyn CatalogProvider>> = Vec::new();

    if let Some(path) = &args.catalog {
        providers.push(Box::new(FileCatalogProvider::load(path)?));
    }
    if args.tmdb {
        let tmdb = TmdbConfig::from_env()?.with_language(config.tmdb.language.as_deref());
        providers.push(Box::new(TmdbClient::new(tmdb)));
    }

    if providers.is_empty() {
        return Err(crate::Error::other(
            "No catalog source: pass --catalog FILE or --tmdb",
        ));
    }
    Ok(providers)
}

/// Execute the plan command.
pub async fn plan_episodes(args: &PlanArgs, config: Config) -> Result<()> {
    println!("{}", "📺 Planning episode renames...".bold().cyan());
    println!();

    let root = args.target.clone().unwrap_or_else(|| args.source.clone());
    println!("  {} {}", "Source:".bold(), args.source.display());
    println!("  {} {}", "Target:".bold(), root.display());
    if config.modes.anthology {
        println!("  {} anthology", "Mode:".bold());
    }
    if config.modes.untrusted_titles {
        println!("  {} untrusted titles", "Mode:".bold());
    }
    println!();

    let providers = build_providers(args, &config)?;

    let options = ScanOptions {
        show: args.show.clone(),
        season: args.season,
    };
    let mut files = scan_directory(&args.source, &options)?.files;
    if files.is_empty() {
        println!("{}", "No episode files found.".yellow());
        return Ok(());
    }

    if !args.no_probe && ffprobe::is_installed() {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} probing durations")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        ffprobe::probe_durations(&mut files, config.concurrency.0, Some(&pb)).await;
        pb.finish_and_clear();
    }

    let mut resolver = CatalogResolver::new(providers);
    tracing::info!("Catalog sources: {}", resolver.provider_names().join(", "));
    let catalogs = resolver.resolve_all(&files).await;

    let mut planner = Planner::new(PlannerConfig::from(&config));
    if config.assistant.enabled {
        let ollama = OllamaClient::with_config(OllamaConfig::from_env().with_overrides(&config.ollama));
        planner = planner.with_assistant(Arc::new(OllamaAssistant::new(ollama)), config.assistant.timeout());
    }

    let plan = planner.build_plan(&files, &catalogs, &root).await;

    println!("{}", "Items:".bold());
    for item in &plan.items {
        print_item(item);
    }
    println!();

    if !plan.errors.is_empty() {
        println!("{}", "⚠️  Errors:".bold().yellow());
        for error in &plan.errors {
            println!("  - {}", error);
        }
        println!();
    }

    print_summary(&plan.summary());
    println!();

    let output_path = match &args.output {
        Some(o) => o.clone(),
        None => planner::default_plan_path(&args.source, args.target.as_deref()),
    };
    planner::save_plan(&plan, &output_path)?;
    println!(
        "{} {}",
        "✅ Plan saved to:".bold().green(),
        output_path.display()
    );

    Ok(())
}
