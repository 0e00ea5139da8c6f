//! Gateway data transfer objects and typed failures
//!
//! Failures carry the stage that produced them so callers can tell a rejected
//! credential (diff stage) from a proxy that happens to answer 401
//! (suggestions stage) without inspecting message strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which half of the review round-trip failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Fetching the pull request diff from GitHub
    Diff,
    /// Posting the diff to the suggestions endpoint
    Suggestions,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Diff => write!(f, "diff"),
            Stage::Suggestions => write!(f, "suggestions"),
        }
    }
}

/// Classified cause of a gateway failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Credential missing, invalid or expired (401)
    Unauthorized,
    /// Credential lacks access (403)
    Forbidden,
    /// Pull request or repository not found (404)
    NotFound,
    /// Any other non-success status
    ServerError,
    /// Transport failure or unreadable response
    Network,
}

/// Typed failure returned by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage} request failed ({kind:?}): {message}")]
pub struct GatewayFailure {
    pub kind: FailureKind,
    pub stage: Stage,
    /// HTTP status when the server answered
    pub status: Option<u16>,
    pub message: String,
}

impl GatewayFailure {
    /// Classify a non-success HTTP status
    ///
    /// Only the diff stage talks to GitHub with the user's credential, so only
    /// there do 401/403/404 carry credential or visibility semantics.
    pub fn from_status(stage: Stage, status: u16, message: impl Into<String>) -> Self {
        let kind = match (stage, status) {
            (Stage::Diff, 401) => FailureKind::Unauthorized,
            (Stage::Diff, 403) => FailureKind::Forbidden,
            (Stage::Diff, 404) => FailureKind::NotFound,
            _ => FailureKind::ServerError,
        };
        Self {
            kind,
            stage,
            status: Some(status),
            message: message.into(),
        }
    }

    /// Failure without an HTTP status (connection refused, bad body, ...)
    pub fn network(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Network,
            stage,
            status: None,
            message: message.into(),
        }
    }

    /// Whether the failure means the stored credential should be discarded
    pub fn is_credential_rejected(&self) -> bool {
        matches!(self.kind, FailureKind::Unauthorized | FailureKind::Forbidden)
    }
}

/// Body of `POST /api/suggestions`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsRequest {
    pub code_diff: String,
}

/// Success body of `POST /api/suggestions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

/// Failure body of `POST /api/suggestions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
