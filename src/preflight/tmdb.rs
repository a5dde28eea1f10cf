//! TMDB catalog preflight check.

use super::CheckResult;
use crate::services::tmdb::{TmdbClient, TmdbConfig};

const NAME: &str = "TMDB catalog";

/// Check that TMDB accepts the key; reports the episode title language.
pub async fn check(language: Option<&str>) -> CheckResult {
    let config = match TmdbConfig::from_env() {
        Ok(config) => config.with_language(language),
        Err(_) => {
            return CheckResult::fail(
                NAME,
                "TMDB_API_KEY is not set",
                "Export TMDB_API_KEY, or use --catalog FILE instead of --tmdb",
            )
        }
    };
    let language = config.language.clone();

    match TmdbClient::new(config).verify_api_key().await {
        Ok(true) => CheckResult::ok(NAME, &format!("connected, titles in {}", language)),
        Ok(false) => CheckResult::fail(NAME, "API key rejected", "Check TMDB_API_KEY"),
        Err(e) => CheckResult::fail(
            NAME,
            &format!("unreachable: {}", e),
            "Check your network connection, or use --catalog FILE",
        ),
    }
}
