//! Ollama preflight check.

use super::CheckResult;
use crate::services::ollama::{OllamaClient, OllamaConfig};

/// Check that Ollama is running and has the configured model.
pub async fn check(config: OllamaConfig) -> CheckResult {
    let client = OllamaClient::with_config(config);

    match client.health_check().await {
        Ok(true) => match client.list_models().await {
            Ok(models) => {
                let wanted = client.model();
                if models.iter().any(|m| m.name == wanted) {
                    CheckResult::ok("Ollama", &format!("running (model: {})", wanted))
                } else {
                    CheckResult::fail(
                        "Ollama",
                        &format!("running but model {} is missing", wanted),
                        &format!("Pull the model: ollama pull {}", wanted),
                    )
                }
            }
            Err(_) => CheckResult::ok("Ollama", "running"),
        },
        Ok(false) | Err(_) => CheckResult::fail(
            "Ollama",
            "not running",
            "Start Ollama: ollama serve",
        ),
    }
}
