use thiserror::Error;

/// Failure of the underlying persistence engine
///
/// All variants surface to the review core as "storage unavailable"; the
/// split only exists to keep log lines precise.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage contents are not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}
