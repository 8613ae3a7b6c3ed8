//! The wizard's view of the recommendation service: an injected trait so the
//! state machine stays testable with a substitute implementation, plus the
//! real HTTP implementation that posts to the API.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use crate::schema::{CareerRecommendation, FormResponses};

/// Failures surfaced to the wizard's error sub-state. `Display` is the
/// user-facing message.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The server's own `error` field, passed through.
    #[error("{0}")]
    Server(String),

    #[error("Impossibile ottenere la consulenza di carriera")]
    Transport(#[source] reqwest::Error),
}

/// Produces a recommendation for a completed survey. The wizard owns no
/// transport details; substitute implementations are used in tests.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn recommend(
        &self,
        responses: &FormResponses,
    ) -> Result<CareerRecommendation, SourceError>;
}

/// Posts the survey to `POST {base_url}/api/career-recommendation`.
#[derive(Clone)]
pub struct HttpRecommendationSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecommendationSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RecommendationSource for HttpRecommendationSource {
    async fn recommend(
        &self,
        responses: &FormResponses,
    ) -> Result<CareerRecommendation, SourceError> {
        let response = self
            .client
            .post(format!("{}/api/career-recommendation", self.base_url))
            .json(&json!({ "formResponses": responses }))
            .send()
            .await
            .map_err(SourceError::Transport)?;

        if !response.status().is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| {
                    body.get("error")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| "Failed to get career recommendation".to_string());
            return Err(SourceError::Server(message));
        }

        response
            .json::<CareerRecommendation>()
            .await
            .map_err(SourceError::Transport)
    }
}
