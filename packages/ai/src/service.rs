// ABOUTME: Gemini client for single-shot text generation calls
// ABOUTME: Handles API requests, response parsing, code-fence stripping and usage logging

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const REQUEST_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum AIServiceError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("No API key configured")]
    NoApiKey,

    #[error("Invalid response format")]
    InvalidResponse,
}

pub type AIServiceResult<T> = Result<T, AIServiceError>;

/// Anything that can turn a prompt into raw model text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> AIServiceResult<String>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.prompt_token_count + self.candidates_token_count
    }
}

#[derive(Debug)]
pub struct AIResponse<T> {
    pub data: T,
    pub usage: Usage,
}

/// Gemini `generateContent` client
pub struct GeminiService {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiService {
    fn create_client() -> AIServiceResult<Client> {
        Ok(Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(10))
            .build()?)
    }

    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> AIServiceResult<Self> {
        let model = model.into();
        if model != DEFAULT_MODEL {
            info!("Using custom Gemini model: {}", model);
        }

        Ok(Self {
            client: Self::create_client()?,
            api_key: api_key.into(),
            model,
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Point the client at a different host (proxies, test servers)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }

    /// Sends one prompt and returns the concatenated text of the first candidate
    pub async fn generate(&self, prompt: &str) -> AIServiceResult<AIResponse<String>> {
        if self.api_key.is_empty() {
            return Err(AIServiceError::NoApiKey);
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: DEFAULT_TEMPERATURE,
                response_mime_type: "application/json",
            },
        };

        info!(
            "Making Gemini API request: model={}, prompt_chars={}, timeout={}s",
            self.model,
            prompt.len(),
            REQUEST_TIMEOUT_SECS
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("Gemini API request timed out after {} seconds", REQUEST_TIMEOUT_SECS);
                    AIServiceError::ApiError(format!(
                        "Request timed out after {} seconds",
                        REQUEST_TIMEOUT_SECS
                    ))
                } else if e.is_connect() {
                    error!("Failed to connect to Gemini API: {}", e);
                    AIServiceError::ApiError(format!("Connection failed: {}", e))
                } else {
                    error!("Gemini API request failed: {}", e);
                    AIServiceError::RequestFailed(e)
                }
            })?;

        info!("Received response from Gemini API: status={}", response.status());

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Gemini API error: {} - {}", status, error_text);
            return Err(AIServiceError::ApiError(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AIServiceError::ParseError(e.to_string()))?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or(AIServiceError::InvalidResponse)?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            return Err(AIServiceError::InvalidResponse);
        }

        let usage = body.usage_metadata.unwrap_or_default();
        info!(
            "Gemini usage: input_tokens={}, output_tokens={}, total={}",
            usage.prompt_token_count,
            usage.candidates_token_count,
            usage.total_tokens()
        );

        Ok(AIResponse { data: text, usage })
    }
}

#[async_trait]
impl TextGenerator for GeminiService {
    async fn generate_text(&self, prompt: &str) -> AIServiceResult<String> {
        self.generate(prompt).await.map(|response| response.data)
    }
}

/// Strip markdown code fences if present (```json ... ```)
pub fn strip_code_fences(text: &str) -> &str {
    let cleaned = text.trim();
    if !cleaned.starts_with("```") {
        return cleaned;
    }

    // Skip the opening fence line, then cut at the last closing fence
    let start = cleaned.find('\n').map(|i| i + 1).unwrap_or(cleaned.len());
    let end = cleaned[start..]
        .rfind("```")
        .map(|i| i + start)
        .unwrap_or(cleaned.len());
    cleaned[start..end].trim()
}
