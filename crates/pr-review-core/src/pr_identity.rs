//! Pull request identity
//!
//! Derived from the active tab URL; the cache key is a pure function of it.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// `(owner, repo, number)` of a GitHub pull request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrIdentity {
    /// Organization or user owning the repository
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Pull request number
    pub number: u64,
}

impl PrIdentity {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// Parse a pull request page URL on `host`
    ///
    /// Accepts `https://<host>/<owner>/<repo>/pull/<number>` with any trailing
    /// path (`/files`, `/commits`), query or fragment. Returns `None` for every
    /// other page.
    pub fn from_url(raw: &str, host: &str) -> Option<Self> {
        let url = Url::parse(raw).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        let url_host = url.host_str()?;
        let url_host = url_host.strip_prefix("www.").unwrap_or(url_host);
        if !url_host.eq_ignore_ascii_case(host) {
            return None;
        }

        let mut segments = url.path_segments()?;
        let owner = segments.next()?;
        let repo = segments.next()?;
        let marker = segments.next()?;
        let number = segments.next()?;

        if owner.is_empty() || repo.is_empty() || marker != "pull" {
            return None;
        }
        let number = number.parse::<u64>().ok().filter(|n| *n > 0)?;

        Some(Self::new(owner, repo, number))
    }

    /// Cache key, `<owner>/<repo>/pull/<number>`
    pub fn cache_key(&self) -> String {
        format!("{}/{}/pull/{}", self.owner, self.repo, self.number)
    }
}

impl fmt::Display for PrIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}
