//! Preflight checks module.

mod ffprobe;
mod ollama;
mod tmdb;

use crate::services::OllamaConfig;
use colored::Colorize;

/// Outcome of a preflight check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    /// Planning can go on with reduced accuracy.
    Warn,
    Fail,
}

/// Result of a preflight check.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

impl CheckResult {
    pub fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    pub fn warn(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warn,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    pub fn fail(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }
}

/// Which collaborators the run will use.
#[derive(Debug, Clone, Default)]
pub struct PreflightOptions {
    /// Durations will be probed.
    pub probe: bool,
    /// Untitled files will be paired by duration.
    pub duration_pairing: bool,
    /// TMDB is a catalog provider.
    pub tmdb: bool,
    /// Episode title language requested from TMDB.
    pub tmdb_language: Option<String>,
    /// The Ollama assistant is enabled.
    pub assistant: Option<OllamaConfig>,
}

/// Run the checks relevant to `options`.
pub async fn run_preflight_checks(options: &PreflightOptions) -> Vec<CheckResult> {
    let mut results = Vec::new();

    if options.probe {
        results.push(ffprobe::check(options.duration_pairing));
    }
    if options.tmdb {
        results.push(tmdb::check(options.tmdb_language.as_deref()).await);
    }
    if let Some(config) = &options.assistant {
        results.push(ollama::check(config.clone()).await);
    }

    results
}

/// Print preflight check results.
pub fn print_results(results: &[CheckResult]) {
    for result in results {
        let tag = match result.status {
            CheckStatus::Ok => "[OK]".green(),
            CheckStatus::Warn => "[WARN]".yellow(),
            CheckStatus::Fail => "[FAIL]".red(),
        };
        println!("{} {}: {}", tag, result.name.bold(), result.message);
        if result.status != CheckStatus::Ok {
            if let Some(ref hint) = result.hint {
                println!("  {} {}", "->".yellow(), hint);
            }
        }
    }
}

/// Check if no preflight check failed. Warnings pass.
pub fn all_passed(results: &[CheckResult]) -> bool {
    results.iter().all(|r| r.status != CheckStatus::Fail)
}
