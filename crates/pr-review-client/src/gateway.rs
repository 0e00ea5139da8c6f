//! Composite gateway wiring GitHub and the suggestions proxy together

use crate::client::{ReviewGateway, TokenValidator};
use crate::octocrab_client::OctocrabClient;
use crate::suggestions_client::SuggestionsClient;
use crate::types::GatewayFailure;
use async_trait::async_trait;
use pr_review_config::AppConfig;

/// Production [`ReviewGateway`]: diff from GitHub, suggestions from the proxy
#[derive(Debug, Clone)]
pub struct HttpGateway {
    github: OctocrabClient,
    suggestions: SuggestionsClient,
}

impl HttpGateway {
    pub fn new(github: OctocrabClient, suggestions: SuggestionsClient) -> Self {
        Self {
            github,
            suggestions,
        }
    }

    /// Build a gateway from the endpoints in `config`
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            OctocrabClient::new(config.github_api_url.clone()),
            SuggestionsClient::new(config.suggestions_url.clone()),
        )
    }

    /// The GitHub client, also usable as a [`TokenValidator`]
    pub fn github(&self) -> &OctocrabClient {
        &self.github
    }
}

#[async_trait]
impl ReviewGateway for HttpGateway {
    async fn fetch_diff(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        credential: &str,
    ) -> Result<String, GatewayFailure> {
        self.github
            .fetch_diff(owner, repo, pr_number, credential)
            .await
    }

    async fn fetch_suggestions(&self, diff: &str) -> Result<Vec<String>, GatewayFailure> {
        self.suggestions.fetch_suggestions(diff).await
    }
}

#[async_trait]
impl TokenValidator for HttpGateway {
    async fn validate_token(&self, credential: &str) -> Result<bool, GatewayFailure> {
        self.github.validate_token(credential).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FailureKind, Stage};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn gateway_for(server: &MockServer) -> HttpGateway {
        HttpGateway::new(
            OctocrabClient::new(server.uri()),
            SuggestionsClient::new(format!("{}/api/suggestions", server.uri())),
        )
    }

    #[tokio::test]
    async fn test_review_chains_diff_into_suggestions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42"))
            .respond_with(ResponseTemplate::new(200).set_body_string("diff --git a/x b/x"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/suggestions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "suggestions": ["### Overall\nok"] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let suggestions = gateway
            .review("acme", "widgets", 42, "ghp_token")
            .await
            .unwrap();

        assert_eq!(suggestions, vec!["### Overall\nok".to_string()]);
    }

    #[tokio::test]
    async fn test_review_stops_at_diff_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "Resource not accessible by personal access token",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/suggestions"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let failure = gateway
            .review("acme", "widgets", 42, "ghp_token")
            .await
            .unwrap_err();

        assert_eq!(failure.stage, Stage::Diff);
        assert_eq!(failure.kind, FailureKind::Forbidden);
    }

    #[test]
    fn test_from_config() {
        let config = AppConfig::default();
        let gateway = HttpGateway::from_config(&config);
        assert_eq!(gateway.github().base_url(), config.github_api_url);
        assert_eq!(gateway.suggestions.endpoint(), config.suggestions_url);
    }
}
