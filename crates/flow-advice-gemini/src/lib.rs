//! flow-advice-gemini
//!
//! HTTP client for the Gemini `generateContent` endpoint, exposed as a
//! [`flow_core::AdviceGenerator`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use flow_core::{AdviceError, AdviceGenerator};

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
}

impl GeminiSettings {
    pub fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    settings: GeminiSettings,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait]
impl AdviceGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, AdviceError> {
        let url = self.settings.request_url();
        debug!(%url, model = %self.settings.model, "Calling advice service.");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|err| AdviceError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AdviceError::Transport(err.to_string()))?;
        if !status.is_success() {
            return Err(AdviceError::Service {
                status: status.as_u16(),
                message: service_error_message(&body),
            });
        }
        parse_response(&body)
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    contents: Vec<Content>,
}

impl GenerateRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Concatenated text parts of the first candidate; `None` when there are none.
pub fn parse_response(body: &str) -> Result<Option<String>, AdviceError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|err| AdviceError::Malformed(err.to_string()))?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();
    Ok(if text.is_empty() { None } else { Some(text) })
}

fn service_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_joins_endpoint_and_model() {
        let settings = GeminiSettings {
            endpoint: "http://localhost:8080/v1beta/".into(),
            model: "gemini-2.5-flash".into(),
            api_key: "key".into(),
        };
        assert_eq!(
            settings.request_url(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_body_wraps_prompt_in_single_part() {
        let body = serde_json::to_value(GenerateRequest::from_prompt("hello")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn response_text_concatenates_first_candidate_parts() {
        let body = r#"{"candidates": [
            {"content": {"parts": [{"text": "* Cut "}, {"text": "dining out"}], "role": "model"}},
            {"content": {"parts": [{"text": "ignored"}]}}
        ]}"#;
        assert_eq!(
            parse_response(body).unwrap().as_deref(),
            Some("* Cut dining out")
        );
    }

    #[test]
    fn response_without_text_is_none() {
        assert_eq!(parse_response(r#"{"candidates": []}"#).unwrap(), None);
        assert_eq!(parse_response("{}").unwrap(), None);
        assert_eq!(
            parse_response(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap(),
            None
        );
    }

    #[test]
    fn undecodable_response_is_malformed() {
        assert!(matches!(
            parse_response("<html>"),
            Err(AdviceError::Malformed(_))
        ));
    }

    #[test]
    fn service_errors_prefer_structured_message() {
        let body = r#"{"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}}"#;
        assert_eq!(service_error_message(body), "API key not valid");
        assert_eq!(service_error_message("Bad Gateway"), "Bad Gateway");
    }
}
