use thiserror::Error;

/// User-facing error kinds
///
/// The `Display` text is what the presentation layer shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("GitHub token required. Please enter your GitHub personal access token to continue.")]
    NoCredential,

    #[error("Invalid GitHub token. Please check the token and try again.")]
    InvalidCredential,

    #[error("Invalid or expired GitHub token. Please update your token.")]
    ExpiredOrRevokedCredential,

    #[error("Pull request not found. Please check if you have access to this repository.")]
    NotFound,

    #[error("Please navigate to a GitHub pull request page")]
    NotAPullRequestPage,

    #[error("Failed to fetch suggestions: {0}")]
    NetworkOrServerError(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl ErrorKind {
    /// Whether the settings view should be offered alongside the message
    pub fn wants_settings(&self) -> bool {
        matches!(
            self,
            ErrorKind::NoCredential
                | ErrorKind::InvalidCredential
                | ErrorKind::ExpiredOrRevokedCredential
                | ErrorKind::NotFound
        )
    }
}

impl From<pr_review_storage::StorageError> for ErrorKind {
    fn from(err: pr_review_storage::StorageError) -> Self {
        ErrorKind::StorageUnavailable(err.to_string())
    }
}
