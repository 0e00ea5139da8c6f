//! Gateway trait definitions
//!
//! `ReviewGateway` is what the review core talks to; `TokenValidator` is used
//! only by the settings flow before a credential is saved.

use crate::types::GatewayFailure;
use async_trait::async_trait;

/// Diff and suggestion gateway
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so fetches can run on spawned tasks.
#[async_trait]
pub trait ReviewGateway: Send + Sync {
    /// Fetch the unified diff of a pull request
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner (user or organization)
    /// * `repo` - Repository name
    /// * `pr_number` - Pull request number
    /// * `credential` - GitHub token used as bearer credential
    async fn fetch_diff(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        credential: &str,
    ) -> Result<String, GatewayFailure>;

    /// Post a diff to the suggestions endpoint
    ///
    /// Returns the review sections in the order produced by the endpoint.
    async fn fetch_suggestions(&self, diff: &str) -> Result<Vec<String>, GatewayFailure>;

    /// Run both stages as one logical step
    ///
    /// The returned failure keeps its [`Stage`](crate::Stage) so callers can
    /// classify it.
    async fn review(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        credential: &str,
    ) -> Result<Vec<String>, GatewayFailure> {
        let diff = self.fetch_diff(owner, repo, pr_number, credential).await?;
        log::debug!(
            "Fetched diff for {}/{}#{} ({} bytes)",
            owner,
            repo,
            pr_number,
            diff.len()
        );
        let suggestions = self.fetch_suggestions(&diff).await?;
        log::debug!(
            "Received {} suggestion sections for {}/{}#{}",
            suggestions.len(),
            owner,
            repo,
            pr_number
        );
        Ok(suggestions)
    }
}

/// Checks a credential against GitHub before it is stored
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// `Ok(true)` when GitHub accepts the credential, `Ok(false)` when it is
    /// rejected, `Err` when GitHub could not be reached.
    async fn validate_token(&self, credential: &str) -> Result<bool, GatewayFailure>;
}
