//! Client for the review-suggestions proxy endpoint

use crate::types::{ErrorBody, GatewayFailure, Stage, SuggestionsRequest, SuggestionsResponse};
use log::debug;

/// Posts diffs to `POST /api/suggestions`
#[derive(Debug, Clone)]
pub struct SuggestionsClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SuggestionsClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_http_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post `diff` and return the ordered review sections
    pub async fn fetch_suggestions(&self, diff: &str) -> Result<Vec<String>, GatewayFailure> {
        debug!(
            "Posting {} byte diff to {}",
            diff.len(),
            self.endpoint
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&SuggestionsRequest {
                code_diff: diff.to_string(),
            })
            .send()
            .await
            .map_err(|e| GatewayFailure::network(Stage::Suggestions, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // The proxy reports `{ error }`; fall back to the status text otherwise
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => format!(
                    "Failed to fetch suggestions: {}",
                    status.canonical_reason().unwrap_or("unknown status")
                ),
            };
            return Err(GatewayFailure::from_status(
                Stage::Suggestions,
                status.as_u16(),
                message,
            ));
        }

        let body: SuggestionsResponse = response.json().await.map_err(|e| {
            GatewayFailure::network(
                Stage::Suggestions,
                format!("Invalid suggestions response: {}", e),
            )
        })?;

        Ok(body.suggestions)
    }
}
