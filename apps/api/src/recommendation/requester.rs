//! Recommendation requester — owns the single upstream completion call.

use serde_json::Value;
use tracing::error;

use crate::errors::AppError;
use crate::llm_client::{ChatClient, CompletionError};
use crate::recommendation::prompts::{format_prompt, ADVISOR_SYSTEM};
use crate::schema::FormResponses;

/// Formats the survey answers into a prompt, performs the completion call,
/// and parses the payload as JSON.
///
/// Returns the raw parsed payload: schema validation belongs to the endpoint
/// handler, not here.
pub async fn generate_recommendation(
    responses: &FormResponses,
    llm: &ChatClient,
) -> Result<Value, AppError> {
    let prompt = format_prompt(responses);

    let content = llm
        .complete(ADVISOR_SYSTEM, &prompt)
        .await
        .map_err(|e| match e {
            CompletionError::MissingApiKey => AppError::MissingCredential,
            other => AppError::Upstream(other.to_string()),
        })?;

    serde_json::from_str(&content).map_err(|e| {
        error!("Unparseable completion payload: {content}");
        AppError::Upstream(format!("completion payload is not valid JSON: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered_survey() -> FormResponses {
        let mut responses = FormResponses::new();
        responses.insert("math_problem_solving", "yes");
        responses.insert("career_goals", "diventare designer");
        responses
    }

    #[tokio::test]
    async fn test_missing_credential_fails_fast() {
        let llm = ChatClient::new(String::new()).with_base_url("http://127.0.0.1:1");
        let result = generate_recommendation(&answered_survey(), &llm).await;
        assert!(matches!(result, Err(AppError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_valid_json_payload_is_returned_unvalidated() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"content":"{\"anything\":\"goes here\"}"}}]}"#,
            )
            .create_async()
            .await;

        let llm = ChatClient::new("test-key".to_string()).with_base_url(server.url());
        let payload = generate_recommendation(&answered_survey(), &llm)
            .await
            .unwrap();
        // No recommendation-schema check at this layer.
        assert_eq!(payload["anything"], "goes here");
    }

    #[tokio::test]
    async fn test_non_json_payload_is_an_upstream_failure() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"non sono JSON, scusa"}}]}"#)
            .create_async()
            .await;

        let llm = ChatClient::new("test-key".to_string()).with_base_url(server.url());
        let result = generate_recommendation(&answered_survey(), &llm).await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_api_failure_propagates_as_upstream() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/")
            .with_status(503)
            .with_body(r#"{"error":{"message":"overloaded"}}"#)
            .create_async()
            .await;

        let llm = ChatClient::new("test-key".to_string()).with_base_url(server.url());
        let result = generate_recommendation(&answered_survey(), &llm).await;
        match result {
            Err(AppError::Upstream(detail)) => assert!(detail.contains("overloaded")),
            other => panic!("expected Upstream error, got {other:?}"),
        }
    }
}
