use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Ollama client for interacting with a local Ollama server
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Top-p sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    pub model: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    pub done: bool,
}

/// One model entry from the Ollama tags listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Full model name including tag (e.g. "llama3.2:3b")
    pub name: String,
}

/// Tags response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

/// Builder methods for GenerationRequest
impl GenerationRequest {
    /// Create a new generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: Some(false),
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options
            .get_or_insert_with(GenerationOptions::default)
            .temperature = Some(temperature);
        self
    }

    /// Set top-p sampling
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.options
            .get_or_insert_with(GenerationOptions::default)
            .top_p = Some(top_p);
        self
    }

    /// Limit the number of generated tokens
    pub fn num_predict(mut self, num_predict: u32) -> Self {
        self.options
            .get_or_insert_with(GenerationOptions::default)
            .num_predict = Some(num_predict);
        self
    }
}

impl Ollama {
    /// Create a new Ollama client from a complete endpoint URL
    pub fn from_url(url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: url.into().trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }

    /// Create a new Ollama client with retry configuration
    pub fn with_retries(
        url: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        Self {
            max_retries,
            backoff_base_ms,
            ..Self::from_url(url, timeout_secs)
        }
    }

    /// Generate text from the Ollama API with retry logic
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        let url = format!("{}/api/generate", self.base_url);

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            let response_result = self.client.post(&url).json(&request).send().await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let response_text = response.text().await.map_err(|e| {
                            anyhow!("Failed to get response text from Ollama API: {}", e)
                        })?;

                        match Self::parse_generation_response(&response_text) {
                            Ok(generated) => return Ok(generated),
                            Err(e) => {
                                error!(
                                    "Failed to parse Ollama API response: {}. Raw response (first 500 chars): {}",
                                    e,
                                    response_text.chars().take(500).collect::<String>()
                                );
                                last_error = Some(e);
                            }
                        }
                    } else if status.is_server_error() {
                        // Server error - can retry
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        last_error = Some(anyhow!("Ollama API error ({}): {}", status, error_text));
                        error!(
                            "Ollama API error ({}): {} - attempt {}/{}",
                            status,
                            error_text,
                            attempt + 1,
                            self.max_retries + 1
                        );
                    } else {
                        // Client error - don't retry
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Ollama API error ({}): {}", status, error_text);
                        return Err(anyhow!("Ollama API error ({}): {}", status, error_text));
                    }
                }
                Err(e) => {
                    // Network error - can retry
                    last_error = Some(anyhow!("Failed to send request to Ollama API: {}", e));
                    error!(
                        "Ollama API network error - attempt {}/{}",
                        attempt + 1,
                        self.max_retries + 1
                    );
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("Ollama API request failed after {} attempts", self.max_retries + 1)))
    }

    /// Parse a generation response, tolerating JSONL streaming bodies.
    ///
    /// Ollama replies with one JSON object when `stream` is false, but a
    /// misconfigured server streams JSONL; in that case the text pieces are
    /// concatenated across lines.
    fn parse_generation_response(response_text: &str) -> Result<GenerationResponse> {
        if let Ok(response) = serde_json::from_str::<GenerationResponse>(response_text) {
            return Ok(response);
        }

        let lines: Vec<&str> = response_text.lines().filter(|l| !l.is_empty()).collect();
        if lines.is_empty() {
            return Err(anyhow!("Empty response from Ollama API"));
        }

        let mut full_response = String::new();
        let mut model = String::from("unknown");
        let mut created_at = String::new();
        let mut saw_valid_line = false;

        for line in &lines {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(line) {
                saw_valid_line = true;
                if let Some(part) = value.get("response").and_then(|v| v.as_str()) {
                    full_response.push_str(part);
                }
                if let Some(name) = value.get("model").and_then(|v| v.as_str()) {
                    model = name.to_string();
                }
                if let Some(ts) = value.get("created_at").and_then(|v| v.as_str()) {
                    created_at = ts.to_string();
                }
            }
        }

        if !saw_valid_line {
            return Err(anyhow!("Response from Ollama API contains invalid JSON"));
        }

        Ok(GenerationResponse {
            model,
            created_at,
            response: full_response,
            done: true,
        })
    }

    /// List the models available on the server
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/api/tags", self.base_url);

        let response: TagsResponse = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to connect to Ollama")?
            .json()
            .await
            .context("Failed to parse Ollama tags response")?;

        Ok(response.models)
    }

    /// Check whether a model (exact name or base name before the tag) is
    /// available on the server
    pub async fn has_model(&self, model_name: &str) -> Result<bool> {
        let models = self.list_models().await?;
        let model_base = model_name.split(':').next().unwrap_or(model_name);

        Ok(models.iter().any(|m| {
            m.name == model_name || m.name.split(':').next().unwrap_or(&m.name) == model_base
        }))
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to connect to Ollama")?
            .json()
            .await
            .context("Failed to parse Ollama version response")?;

        let version = response["version"]
            .as_str()
            .ok_or_else(|| anyhow!("Invalid version format in response"))?
            .to_string();

        Ok(version)
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = GenerationRequest;
    type Response = GenerationResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.generate(request)
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.version()
            .await
            .map(|_| ())
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))
    }

    fn extract_text(response: &Self::Response) -> String {
        response.response.clone()
    }
}
