//! Orchestrator inputs and outputs
//!
//! Every trigger the popup can experience is an [`Event`]; race conditions
//! become ordered event sequences that tests can replay.

use crate::pr_identity::PrIdentity;
use chrono::{DateTime, Utc};
use pr_review_client::GatewayFailure;

/// Marks an in-flight fetch with the PR it was issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTag {
    pub identity: PrIdentity,
    /// Monotonic per popup session
    pub generation: u64,
}

/// Inputs to the orchestrator
#[derive(Debug, Clone)]
pub enum Event {
    /// Popup opened on the tab with `url`
    Mounted { url: Option<String> },
    /// Active tab navigated to `url`
    IdentityChanged { url: Option<String> },
    /// User asked for fresh suggestions
    RefreshRequested,
    /// Settings view accepted a (validated) token
    CredentialSaved(String),
    /// User opened the settings view
    SettingsRequested,
    /// User closed the settings view without saving
    SettingsDismissed,
    /// A fetch issued earlier has completed
    GatewayResolved {
        tag: FetchTag,
        result: Result<Vec<String>, GatewayFailure>,
    },
}

/// Work the runtime must perform on behalf of the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchRequest),
    /// Drop cache entries past the retention ceiling; failures only get logged
    Sweep { now: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub tag: FetchTag,
    pub credential: String,
}
