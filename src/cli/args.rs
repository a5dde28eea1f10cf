//! Command line argument definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Episode Planner - Match TV episode files to their canonical episodes
#[derive(Parser, Debug)]
#[command(name = "episode-planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip preflight checks
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a rename plan for a directory of episodes
    Plan(PlanArgs),

    /// Print a saved plan
    Show {
        /// Path to the plan JSON file
        #[arg(value_name = "PLAN_FILE")]
        plan_file: PathBuf,

        /// Only list items with this status
        #[arg(long, value_enum)]
        status: Option<StatusFilter>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Directory to scan
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Library root for destinations (default: SOURCE)
    #[arg(short, long, value_name = "DIR")]
    pub target: Option<PathBuf>,

    /// JSON catalog file (list of episodes or {"show", "episodes"})
    #[arg(short, long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Fetch catalogs from TMDB
    #[arg(long)]
    pub tmdb: bool,

    /// Show name for every file, overriding parsed names
    #[arg(long, value_name = "NAME")]
    pub show: Option<String>,

    /// Season for files that declare none
    #[arg(long, value_name = "N")]
    pub season: Option<u32>,

    /// Files may hold several episodes; split titles
    #[arg(long)]
    pub anthology: bool,

    /// Ignore file titles and assign episodes by duration
    #[arg(long)]
    pub untrusted_titles: bool,

    /// Longest file duration in minutes, enables the duration walk
    #[arg(long, value_name = "MIN")]
    pub max_duration: Option<u32>,

    /// Ask the Ollama assistant when local matching fails
    #[arg(long)]
    pub assistant: bool,

    /// Do not probe file durations with ffprobe
    #[arg(long)]
    pub no_probe: bool,

    /// Output path for the plan JSON
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

/// Status filter for `show`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Auto,
    Manual,
    Conflict,
}
