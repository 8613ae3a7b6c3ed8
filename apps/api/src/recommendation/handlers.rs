//! Axum route handler for the career-recommendation endpoint.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::errors::AppError;
use crate::recommendation::requester::generate_recommendation;
use crate::schema::{validate_career_match, validate_recommendation, CareerRecommendation};
use crate::state::AppState;

/// POST /api/career-recommendation
///
/// Terminal at the first applicable branch:
/// 1. body fails the input schema → 400 with field-level details
/// 2. the upstream call fails → 500 with a generic message
/// 3. the payload fails the output schema → 500 flagging a malformed
///    upstream response
/// 4. otherwise → 200 with the validated recommendation
pub async fn handle_career_recommendation(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<CareerRecommendation>, AppError> {
    let responses = validate_career_match(&body).map_err(AppError::InvalidInput)?;

    let payload = generate_recommendation(&responses, &state.llm).await?;

    let recommendation =
        validate_recommendation(&payload).map_err(AppError::MalformedUpstreamResponse)?;

    Ok(Json(recommendation))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde_json::json;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::ChatClient;
    use crate::storage::MemStorage;

    fn test_state(llm: ChatClient) -> AppState {
        AppState {
            llm,
            config: Config {
                openai_api_key: "test-key".to_string(),
                database_url: None,
                port: 8080,
                rust_log: "info".to_string(),
            },
            users: Arc::new(MemStorage::new()),
        }
    }

    async fn completion_server(content: &str) -> mockito::ServerGuard {
        let mut server = mockito::Server::new_async().await;
        let body = json!({ "choices": [{ "message": { "content": content } }] });
        server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;
        server
    }

    async fn response_json(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_400_with_details() {
        let state = test_state(ChatClient::new("test-key".into()));
        let body = json!({ "formResponses": "not an object" });

        let error = handle_career_recommendation(State(state), Json(body))
            .await
            .unwrap_err();

        let (status, payload) = response_json(error).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["error"], "Invalid request data");
        assert!(payload["details"].is_object());
    }

    #[tokio::test]
    async fn test_partial_survey_is_accepted_by_the_server_schema() {
        // Scenario A: the server checks shape, not completeness.
        let server =
            completion_server(r#"{"careerTitle":"Designer","explanation":"..."}"#).await;
        let state = test_state(ChatClient::new("test-key".into()).with_base_url(server.url()));
        let body = json!({ "formResponses": { "math_problem_solving": "yes" } });

        let result = handle_career_recommendation(State(state), Json(body)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_non_json_upstream_payload_is_a_generic_500() {
        // Scenario B.
        let server = completion_server("spiacente, niente JSON").await;
        let state = test_state(ChatClient::new("test-key".into()).with_base_url(server.url()));
        let body = json!({ "formResponses": { "math_problem_solving": "yes" } });

        let error = handle_career_recommendation(State(state), Json(body))
            .await
            .unwrap_err();

        let (status, payload) = response_json(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(payload["error"], "Failed to process request");
        // Upstream detail must not leak to the client.
        assert!(!payload.to_string().contains("JSON"));
    }

    #[tokio::test]
    async fn test_minimal_recommendation_round_trips_exactly() {
        // Scenario C: no optional keys appear in the response body.
        let server =
            completion_server(r#"{"careerTitle":"Graphic Designer","explanation":"Perché sì."}"#)
                .await;
        let state = test_state(ChatClient::new("test-key".into()).with_base_url(server.url()));
        let body = json!({ "formResponses": { "math_problem_solving": "yes" } });

        let Json(recommendation) = handle_career_recommendation(State(state), Json(body))
            .await
            .unwrap();

        let value = serde_json::to_value(&recommendation).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["careerTitle"], "Graphic Designer");
        assert_eq!(object["explanation"], "Perché sì.");
    }

    #[tokio::test]
    async fn test_schema_violating_payload_is_a_malformed_upstream_500() {
        let server = completion_server(r#"{"careerTitle":"Designer"}"#).await;
        let state = test_state(ChatClient::new("test-key".into()).with_base_url(server.url()));
        let body = json!({ "formResponses": { "math_problem_solving": "yes" } });

        let error = handle_career_recommendation(State(state), Json(body))
            .await
            .unwrap_err();

        let (status, payload) = response_json(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(payload["error"], "Failed to generate valid recommendation");
        assert_eq!(payload["details"]["explanation"], "Required");
    }

    #[tokio::test]
    async fn test_missing_credential_is_a_500_without_network() {
        let state = test_state(ChatClient::new(String::new()));
        let body = json!({ "formResponses": { "math_problem_solving": "yes" } });

        let error = handle_career_recommendation(State(state), Json(body))
            .await
            .unwrap_err();

        let (status, _) = response_json(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
