//! Octocrab-based GitHub access
//!
//! Fetches pull request diffs and validates tokens. A fresh octocrab instance
//! is built per call because the credential can change at any time from the
//! settings view.

use crate::client::TokenValidator;
use crate::types::{GatewayFailure, Stage};
use async_trait::async_trait;
use log::debug;
use octocrab::Octocrab;

/// Direct GitHub API client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    base_url: String,
}

impl Default for OctocrabClient {
    fn default() -> Self {
        Self::new(pr_review_config::DEFAULT_API_URL)
    }
}

impl OctocrabClient {
    /// Create a client talking to the GitHub API at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(&self, credential: &str, stage: Stage) -> Result<Octocrab, GatewayFailure> {
        Octocrab::builder()
            .personal_token(credential.to_string())
            .base_uri(self.base_url.as_str())
            .and_then(|builder| builder.build())
            .map_err(|e| GatewayFailure::network(stage, format!("Failed to build client: {}", e)))
    }

    /// Fetch the raw unified diff of a pull request
    pub async fn fetch_diff(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        credential: &str,
    ) -> Result<String, GatewayFailure> {
        debug!("Fetching diff for {}/{}#{}", owner, repo, pr_number);
        let octocrab = self.build(credential, Stage::Diff)?;

        octocrab
            .pulls(owner, repo)
            .get_diff(pr_number)
            .await
            .map_err(|e| failure_from_octocrab(Stage::Diff, e))
    }
}

#[async_trait]
impl TokenValidator for OctocrabClient {
    async fn validate_token(&self, credential: &str) -> Result<bool, GatewayFailure> {
        let octocrab = self.build(credential, Stage::Diff)?;

        match octocrab.current().user().await {
            Ok(user) => {
                debug!("Token accepted for user {}", user.login);
                Ok(true)
            }
            Err(octocrab::Error::GitHub { source, .. }) => {
                debug!(
                    "Token rejected by GitHub ({}): {}",
                    source.status_code, source.message
                );
                Ok(false)
            }
            Err(e) => Err(GatewayFailure::network(Stage::Diff, e.to_string())),
        }
    }
}

/// Map an octocrab error to a typed gateway failure
fn failure_from_octocrab(stage: Stage, err: octocrab::Error) -> GatewayFailure {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            GatewayFailure::from_status(stage, source.status_code.as_u16(), source.message.clone())
        }
        other => GatewayFailure::network(stage, other.to_string()),
    }
}
