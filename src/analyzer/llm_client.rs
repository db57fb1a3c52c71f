use crate::error::CortexError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const TAGS_ENDPOINT: &str = "/api/tags";
const GENERATE_ENDPOINT: &str = "/api/generate";
const PULL_ENDPOINT: &str = "/api/pull";
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);
// Model downloads run to several gigabytes
const PULL_TIMEOUT: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model_name: String,
    pub timeout_seconds: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl LlmConfig {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model_name: model_name.into(),
            timeout_seconds: 60,
            max_tokens: 2048,
            temperature: 0.7,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Text-completion backend used by `ask` and the chat session.
pub trait LlmProvider: Send + Sync {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        system_prompt: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<String, CortexError>> + Send + 'a>>;
    fn get_model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    model: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    name: String,
}

/// Client for a local Ollama daemon.
pub struct OllamaClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: LlmConfig) -> Result<Self, CortexError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    /// True when `/api/tags` answers 200 within a few seconds.
    pub async fn health_check(&self) -> bool {
        match self
            .http
            .get(self.url(TAGS_ENDPOINT))
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                log::debug!("ollama health check failed: {}", e);
                false
            }
        }
    }

    pub async fn list_models(&self) -> Result<Vec<String>, CortexError> {
        let response = self
            .http
            .get(self.url(TAGS_ENDPOINT))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(CortexError::LlmClientError(format!(
                "listing models returned HTTP {}",
                response.status()
            )));
        }

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    pub async fn generate_text(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, CortexError> {
        let body = GenerateRequest {
            model: &self.config.model_name,
            prompt,
            stream: false,
            system: system_prompt,
            options: GenerateOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        log::debug!(
            "POST {} model={} prompt_chars={}",
            GENERATE_ENDPOINT,
            self.config.model_name,
            prompt.chars().count()
        );

        let response = self
            .http
            .post(self.url(GENERATE_ENDPOINT))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CortexError::ModelNotInstalled(
                self.config.model_name.clone(),
            ));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CortexError::LlmClientError(format!(
                "HTTP {}: {}",
                status,
                detail.trim()
            )));
        }

        let generated: GenerateResponse = response.json().await?;
        Ok(generated.response)
    }

    /// Downloads `model` into the daemon; blocks until the pull finishes.
    pub async fn pull_model(&self, model: &str) -> Result<(), CortexError> {
        log::info!("pulling model {}", model);

        let response = self
            .http
            .post(self.url(PULL_ENDPOINT))
            .timeout(PULL_TIMEOUT)
            .json(&PullRequest {
                model,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CortexError::LlmClientError(format!(
                "pulling {} returned HTTP {}: {}",
                model,
                status,
                detail.trim()
            )));
        }

        let pulled: PullResponse = response.json().await?;
        if pulled.status != "success" {
            return Err(CortexError::LlmClientError(format!(
                "pulling {} ended with status '{}'",
                model, pulled.status
            )));
        }
        Ok(())
    }

    fn map_transport_error(&self, error: reqwest::Error) -> CortexError {
        if error.is_connect() {
            CortexError::OllamaUnavailable {
                url: self.config.base_url.clone(),
            }
        } else if error.is_timeout() {
            CortexError::LlmClientError(format!(
                "no response within {}s",
                self.config.timeout_seconds
            ))
        } else {
            CortexError::NetworkError(error)
        }
    }
}

impl LlmProvider for OllamaClient {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        system_prompt: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<String, CortexError>> + Send + 'a>> {
        Box::pin(self.generate_text(prompt, system_prompt))
    }

    fn get_model_name(&self) -> &str {
        &self.config.model_name
    }
}
