/// LLM Client — the single point of entry for all OpenAI API calls.
///
/// ARCHITECTURAL RULE: No other module may call the completion API directly.
/// All LLM interactions MUST go through this module.
///
/// Model and request parameters are policy, not negotiated per request:
/// gpt-4o, temperature 0.7, 1500 output tokens, JSON-object responses.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for all completion calls.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gpt-4o";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1500;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("OpenAI API key is missing")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// The single chat-completion client shared by all handlers, constructed at
/// startup and injected through `AppState` (never a module-level global).
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ChatClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Points the client at a different endpoint. Used by tests to target a
    /// mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Performs exactly one chat-completion call and returns the message text.
    ///
    /// Fails fast with `MissingApiKey` before touching the network when no
    /// credential is configured. A single upstream failure is a single
    /// request failure: no retries, no backoff.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        if self.api_key.trim().is_empty() {
            return Err(CompletionError::MissingApiKey);
        }

        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletion = response.json().await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(CompletionError::EmptyContent)?;

        debug!("Completion call succeeded ({} bytes)", content.len());

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_network_call() {
        let client = ChatClient::new(String::new()).with_base_url("http://127.0.0.1:1");
        let result = client.complete("system", "user").await;
        assert!(matches!(result, Err(CompletionError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_blank_api_key_also_fails_fast() {
        let client = ChatClient::new("   ".to_string()).with_base_url("http://127.0.0.1:1");
        let result = client.complete("system", "user").await;
        assert!(matches!(result, Err(CompletionError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_complete_returns_message_content() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"content":"{\"careerTitle\":\"Designer\"}"}}]}"#,
            )
            .create_async()
            .await;

        let client = ChatClient::new("test-key".to_string()).with_base_url(server.url());
        let content = client.complete("system", "user").await.unwrap();
        assert_eq!(content, r#"{"careerTitle":"Designer"}"#);
    }

    #[tokio::test]
    async fn test_empty_content_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":""}}]}"#)
            .create_async()
            .await;

        let client = ChatClient::new("test-key".to_string()).with_base_url(server.url());
        let result = client.complete("system", "user").await;
        assert!(matches!(result, Err(CompletionError::EmptyContent)));
    }

    #[tokio::test]
    async fn test_no_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = ChatClient::new("test-key".to_string()).with_base_url(server.url());
        let result = client.complete("system", "user").await;
        assert!(matches!(result, Err(CompletionError::EmptyContent)));
    }

    #[tokio::test]
    async fn test_api_error_surfaces_status_and_message_once() {
        let mut server = mockito::Server::new_async().await;
        // expect(1): a 500 must not be retried.
        let mock = server
            .mock("POST", "/")
            .with_status(500)
            .with_body(r#"{"error":{"message":"server exploded"}}"#)
            .expect(1)
            .create_async()
            .await;

        let client = ChatClient::new("test-key".to_string()).with_base_url(server.url());
        let result = client.complete("system", "user").await;
        match result {
            Err(CompletionError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "server exploded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_with_unparseable_body_keeps_raw_text() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let client = ChatClient::new("bad-key".to_string()).with_base_url(server.url());
        match client.complete("system", "user").await {
            Err(CompletionError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "unauthorized");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
