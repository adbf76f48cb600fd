//! Gemini Provider Implementation
//!
//! Calls the Google Generative Language `generateContent` REST endpoint.
//!
//! # Features
//!
//! - Async HTTP communication with the Gemini API
//! - Configurable endpoint, model and timeout
//! - HTTP status mapped onto `LlmError` variants
//!
//! No retries happen here. A failed call surfaces immediately so the caller
//! can tell transport failures apart from content problems.
//!
//! # Examples
//!
//! ```no_run
//! use migrator_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new("my-api-key", "gemini-2.0-flash-exp").unwrap();
//! ```

use crate::LlmError;
use migrator_domain::LlmProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Generative Language API base URL
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for content extraction
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Default timeout for a single generation request (2 minutes)
///
/// Whole legacy pages are sent as input, so this is far above the fetch timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini API provider
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

/// Request body for the generateContent API
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Response from the generateContent API
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider against the public endpoint
    ///
    /// # Parameters
    ///
    /// - `api_key`: Google API key
    /// - `model`: Model to use (e.g., "gemini-2.0-flash-exp")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_options(
            DEFAULT_ENDPOINT,
            api_key,
            model,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a provider with an explicit endpoint and request timeout
    pub fn with_options(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client,
        })
    }

    /// Model name this provider sends requests to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate text using the Gemini API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The request cannot be sent or times out
    /// - The model does not exist (HTTP 404)
    /// - The quota is exhausted (HTTP 429)
    /// - The response carries no text
    pub async fn generate_content(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!("Sending {} chars to model {}", prompt.len(), self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotFound(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }

        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Request(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_response(&body)
    }
}

/// Concatenate the text parts of the first candidate
fn parse_response(body: &str) -> Result<String, LlmError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("No candidates in response".to_string()))?;

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(LlmError::InvalidResponse(format!(
            "Empty response (finish reason: {})",
            reason
        )));
    }

    Ok(text)
}

impl LlmProvider for GeminiProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.generate_content(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_provider_creation() {
        let provider = GeminiProvider::new("key", "gemini-test").unwrap();
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model(), "gemini-test");
    }

    #[test]
    fn test_gemini_provider_rejects_empty_key() {
        let result = GeminiProvider::new("  ", DEFAULT_MODEL);
        assert!(matches!(result, Err(LlmError::Config(_))));
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let provider = GeminiProvider::with_options(
            "http://localhost:8080/v1beta/",
            "key",
            "m",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(provider.endpoint, "http://localhost:8080/v1beta");
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let body = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "---\ntitle: A\n"}, {"text": "---\nBody"}], "role": "model"},
                "finishReason": "STOP"
            }]
        }"#;
        assert_eq!(parse_response(body).unwrap(), "---\ntitle: A\n---\nBody");
    }

    #[test]
    fn test_parse_response_without_candidates() {
        let result = parse_response(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#);
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_response_empty_text_reports_finish_reason() {
        let body = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
        match parse_response(body) {
            Err(LlmError::InvalidResponse(msg)) => assert!(msg.contains("MAX_TOKENS")),
            other => panic!("Expected InvalidResponse, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_parse_response_invalid_json() {
        assert!(matches!(
            parse_response("not json"),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_gemini_error_handling() {
        // Nothing listens on the discard port
        let provider = GeminiProvider::with_options(
            "http://127.0.0.1:9",
            "key",
            "m",
            Duration::from_secs(2),
        )
        .unwrap();

        let result = provider.generate("test").await;
        match result {
            Err(LlmError::Request(_)) => {}
            other => panic!("Expected Request error, got {:?}", other),
        }
    }

    // Integration test (requires GOOGLE_API_KEY and network access)
    #[tokio::test]
    #[ignore]
    async fn test_gemini_generate_integration() {
        let Ok(key) = std::env::var("GOOGLE_API_KEY") else {
            return;
        };
        let provider = GeminiProvider::new(key, DEFAULT_MODEL).unwrap();
        let response = provider.generate("Say 'hello' and nothing else").await.unwrap();
        assert!(!response.is_empty());
    }
}
