//! Settings flow: credential entry validation
//!
//! Runs before a token reaches the orchestrator. Only an accepted token is
//! turned into [`Event::CredentialSaved`](crate::Event::CredentialSaved);
//! every rejection stays here and is shown next to the input field.

use pr_review_client::{GatewayFailure, TokenValidator};
use thiserror::Error;

/// Tokens shorter than this are rejected without asking GitHub
pub const MIN_TOKEN_LEN: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Please enter a valid token")]
    Blank,

    #[error("Token appears to be too short - GitHub tokens are typically longer")]
    TooShort,

    /// Shown with the same text as [`ErrorKind::InvalidCredential`](crate::ErrorKind::InvalidCredential)
    #[error("Invalid GitHub token. Please check the token and try again.")]
    Rejected,

    #[error("Failed to save token: {0}")]
    Unreachable(GatewayFailure),
}

/// Validate user input and return the token to save
pub async fn validate_credential_input(
    input: &str,
    validator: &dyn TokenValidator,
) -> Result<String, SettingsError> {
    let token = input.trim();
    if token.is_empty() {
        return Err(SettingsError::Blank);
    }
    if token.len() < MIN_TOKEN_LEN {
        return Err(SettingsError::TooShort);
    }

    match validator.validate_token(token).await {
        Ok(true) => Ok(token.to_string()),
        Ok(false) => {
            log::warn!("GitHub rejected the entered token");
            Err(SettingsError::Rejected)
        }
        Err(failure) => {
            log::warn!("Could not validate token: {}", failure);
            Err(SettingsError::Unreachable(failure))
        }
    }
}
