//! Endpoint errors and their `{ "error": ... }` responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("No code diff provided")]
    MissingDiff,

    #[error("OpenAI API key not configured")]
    MissingApiKey,

    #[error("Failed to fetch suggestions from OpenAI")]
    Upstream,

    #[error("Internal server error")]
    Internal,
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingDiff => StatusCode::BAD_REQUEST,
            Self::MissingApiKey | Self::Upstream | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
