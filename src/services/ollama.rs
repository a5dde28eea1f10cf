//! Ollama API client and the LLM disambiguation assistant.
//!
//! Configuration can be set via environment variables:
//! - `OLLAMA_HOST`: Ollama service URL (default: http://localhost:11434)
//! - `OLLAMA_MODEL`: Model to use (default: qwen2.5:7b)
//! - `OLLAMA_TIMEOUT`: Request timeout in seconds (default: 120)

use crate::core::assistant::{AssistantSuggestion, DisambiguationAssistant};
use crate::models::catalog::CanonicalEpisode;
use crate::models::config::OllamaSection;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "qwen2.5:7b";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Ollama client configuration.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl OllamaConfig {
    /// Create configuration from environment variables.
    /// Falls back to defaults if not set.
    pub fn from_env() -> Self {
        let base_url = std::env::var("OLLAMA_HOST")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let model = std::env::var("OLLAMA_MODEL")
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_secs = std::env::var("OLLAMA_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            model,
            timeout_secs,
        }
    }

    /// Apply config-file values over the environment.
    pub fn with_overrides(mut self, section: &OllamaSection) -> Self {
        if let Some(host) = &section.host {
            self.base_url = host.clone();
        }
        if let Some(model) = &section.model {
            self.model = model.clone();
        }
        self
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Ollama API client.
pub struct OllamaClient {
    config: OllamaConfig,
    client: reqwest::Client,
}

/// Options for generation.
#[derive(Debug, Serialize)]
struct GenerateOptions {
    /// Temperature for sampling (0 = deterministic, 1 = creative)
    temperature: f32,
    /// Random seed for reproducibility
    seed: u32,
}

/// Generate request payload.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    options: GenerateOptions,
}

/// Generate response.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    pub model: String,
    pub done: bool,
}

/// Models list response.
#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

/// Model information.
#[derive(Debug, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub size: u64,
}

impl OllamaClient {
    /// Create a new Ollama client with default configuration.
    pub fn new() -> Self {
        Self::with_config(OllamaConfig::default())
    }

    /// Create a new Ollama client with custom configuration.
    pub fn with_config(config: OllamaConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { config, client }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Check if Ollama service is available.
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// List available models.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/api/tags", self.config.base_url);
        let resp: ModelsResponse = self.client.get(&url).send().await?.json().await?;
        Ok(resp.models)
    }

    /// Generate text with specified format (e.g., "json").
    pub async fn generate_with_format(
        &self,
        prompt: &str,
        format: Option<&str>,
    ) -> Result<GenerateResponse> {
        let url = format!("{}/api/generate", self.config.base_url);

        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            format: format.map(|s| s.to_string()),
            // Same input, same answer.
            options: GenerateOptions {
                temperature: 0.0,
                seed: 42,
            },
        };

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        Ok(resp)
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the disambiguation prompt.
fn build_prompt(segment: &str, episodes: &[CanonicalEpisode]) -> String {
    let listing: Vec<String> = episodes
        .iter()
        .map(|e| format!("E{:02}: {}", e.episode, e.title))
        .collect();

    format!(
        r#"A TV episode file is named "{segment}".
These are the official episode titles of its season:
{listing}

Which official title (or two adjacent titles, if the file holds two episodes) does the file name refer to?
Answer in JSON: {{"titles": ["<official title>"], "confidence": <0.0 to 1.0>}}
If none fits, answer {{"titles": [], "confidence": 0}}."#,
        segment = segment,
        listing = listing.join("\n"),
    )
}

/// Parse the model's reply. Accepts a title string or list, and a
/// confidence given either as a fraction or a percentage.
pub fn parse_suggestion(reply: &str) -> Option<AssistantSuggestion> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    let value: Value = serde_json::from_str(reply.get(start..=end)?).ok()?;

    let titles: Vec<String> = match value.get("titles").or_else(|| value.get("title"))? {
        Value::String(title) => vec![title.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => return None,
    };
    let titles: Vec<String> = titles
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if titles.is_empty() {
        return None;
    }

    let confidence = match value.get("confidence") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    }?;
    let confidence = if confidence > 1.0 { confidence / 100.0 } else { confidence };

    Some(AssistantSuggestion {
        titles,
        confidence: confidence.clamp(0.0, 1.0) as f32,
    })
}

/// Disambiguation assistant backed by a local Ollama model.
pub struct OllamaAssistant {
    client: OllamaClient,
}

impl OllamaAssistant {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DisambiguationAssistant for OllamaAssistant {
    fn name(&self) -> &str {
        "Ollama"
    }

    async fn suggest(
        &self,
        segment: &str,
        episodes: &[CanonicalEpisode],
    ) -> Result<Option<AssistantSuggestion>> {
        let prompt = build_prompt(segment, episodes);
        let resp = self
            .client
            .generate_with_format(&prompt, Some("json"))
            .await
            .map_err(|e| crate::Error::AssistantError(e.to_string()))?;

        let suggestion = parse_suggestion(&resp.response);
        tracing::debug!("{} suggested {:?} for {:?}", self.client.model(), suggestion, segment);
        Ok(suggestion)
    }
}
