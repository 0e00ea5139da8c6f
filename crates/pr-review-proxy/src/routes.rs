//! HTTP surface: `POST /api/suggestions`

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::openai::{OpenAiClient, UpstreamError};
use crate::review::{filter_diff, split_sections};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, Method};
use axum::routing::post;
use axum::{Json, Router};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub struct AppState {
    /// `None` when no API key is configured
    upstream: Option<OpenAiClient>,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig) -> Self {
        let upstream = config
            .api_key
            .as_ref()
            .map(|key| OpenAiClient::new(&config.api_url, key, &config.model));
        if upstream.is_none() {
            warn!("OPENAI_API_KEY is not set, review requests will fail");
        }
        Self { upstream }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsRequest {
    #[serde(default)]
    pub code_diff: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/suggestions", post(suggestions))
        .layer(cors)
        .with_state(Arc::new(state))
}

async fn suggestions(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SuggestionsRequest>, JsonRejection>,
) -> Result<Json<SuggestionsResponse>, ProxyError> {
    let diff = match payload {
        Ok(Json(SuggestionsRequest {
            code_diff: Some(diff),
        })) if !diff.is_empty() => diff,
        Ok(_) => return Err(ProxyError::MissingDiff),
        Err(rejection) => {
            warn!("Rejected suggestions request: {}", rejection);
            return Err(ProxyError::MissingDiff);
        }
    };

    let upstream = state.upstream.as_ref().ok_or(ProxyError::MissingApiKey)?;

    let filtered = filter_diff(&diff);
    info!(
        "Reviewing diff of {} bytes ({} after filtering)",
        diff.len(),
        filtered.len()
    );

    let completion = upstream.review(&filtered).await.map_err(|e| match e {
        UpstreamError::Status { .. } => ProxyError::Upstream,
        other => {
            error!("Error fetching suggestions: {}", other);
            ProxyError::Internal
        }
    })?;

    let suggestions = split_sections(&completion);
    info!("Returning {} suggestion sections", suggestions.len());
    Ok(Json(SuggestionsResponse { suggestions }))
}
