//! Fetch orchestrator
//!
//! Consumes [`Event`]s one at a time and decides, for the PR in the active
//! tab, whether to serve the cache, fetch, or ask for a credential. Network
//! work is returned as [`Effect`]s; completions come back as
//! [`Event::GatewayResolved`] carrying the [`FetchTag`] they were issued with.
//!
//! # Ordering rules
//!
//! - A completion tagged with a PR other than the current one is dropped.
//! - A success is applied only if its generation is above the floor, i.e. no
//!   newer result has landed and no PR change happened since it was issued.
//!   Later-completing newer fetches therefore win, and slow older ones never
//!   overwrite them.
//! - A failure is applied only for the newest outstanding fetch.
//! - Saving a credential soft-cancels every fetch issued before it.
//!
//! Expired cache entries found while reading are swept through
//! [`Effect::Sweep`], after the serve-or-fetch decision has been made.

use crate::cache_policy::CacheAction;
use crate::clock::Clock;
use crate::credential::CredentialStore;
use crate::error::ErrorKind;
use crate::event::{Effect, Event, FetchRequest, FetchTag};
use crate::pr_identity::PrIdentity;
use crate::state::{Phase, SessionState};
use crate::suggestion_cache::{CacheLookup, SuggestionCache};
use log::{debug, error, info, warn};
use pr_review_client::{FailureKind, GatewayFailure};
use std::sync::Arc;

pub struct Orchestrator {
    credentials: CredentialStore,
    cache: SuggestionCache,
    clock: Arc<dyn Clock>,
    github_host: String,
    credential: Option<String>,
    state: SessionState,
}

impl Orchestrator {
    pub fn new(credentials: CredentialStore, cache: SuggestionCache, clock: Arc<dyn Clock>) -> Self {
        Self {
            credentials,
            cache,
            clock,
            github_host: pr_review_config::DEFAULT_HOST.to_string(),
            credential: None,
            state: SessionState::default(),
        }
    }

    /// Recognise pull request pages on `host` instead of github.com
    pub fn with_github_host(mut self, host: impl Into<String>) -> Self {
        self.github_host = host.into();
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn cache(&self) -> &SuggestionCache {
        &self.cache
    }

    /// Apply one event and return the work it requires
    pub async fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Mounted { url } => self.on_mounted(url.as_deref()).await,
            Event::IdentityChanged { url } => self.on_identity_changed(url.as_deref()).await,
            Event::RefreshRequested => self.on_refresh().await,
            Event::CredentialSaved(token) => self.on_credential_saved(&token).await,
            Event::SettingsRequested => {
                self.state.show_settings = true;
                vec![]
            }
            Event::SettingsDismissed => {
                self.state.show_settings = false;
                vec![]
            }
            Event::GatewayResolved { tag, result } => {
                self.on_gateway_resolved(tag, result).await;
                vec![]
            }
        }
    }

    fn resolve(&self, url: Option<&str>) -> Option<PrIdentity> {
        url.and_then(|url| PrIdentity::from_url(url, &self.github_host))
    }

    async fn on_mounted(&mut self, url: Option<&str>) -> Vec<Effect> {
        self.state.current_pr = self.resolve(url);
        info!(
            "Popup mounted on {}",
            self.state
                .current_pr
                .as_ref()
                .map(|pr| pr.to_string())
                .unwrap_or_else(|| "a non-PR page".to_string())
        );

        match self.credentials.load().await {
            Ok(Some(token)) => {
                self.credential = Some(token);
                self.state.credential_present = true;
                self.evaluate(false).await
            }
            Ok(None) => {
                self.credential = None;
                self.state.credential_present = false;
                self.await_credential(ErrorKind::NoCredential);
                vec![]
            }
            Err(e) => {
                error!("Failed to read credential: {}", e);
                self.fail(e.into());
                vec![]
            }
        }
    }

    async fn on_identity_changed(&mut self, url: Option<&str>) -> Vec<Effect> {
        let next = self.resolve(url);
        if next == self.state.current_pr {
            debug!("Navigation stayed on the same PR");
            return vec![];
        }

        info!(
            "PR changed from {:?} to {:?}",
            self.state.current_pr.as_ref().map(|pr| pr.to_string()),
            next.as_ref().map(|pr| pr.to_string())
        );
        self.state.current_pr = next;
        self.state.invalidate_in_flight();
        self.state.phase = Phase::Idle;
        self.state.last_error = None;

        if self.credential.is_none() {
            self.await_credential(ErrorKind::NoCredential);
            return vec![];
        }
        self.evaluate(false).await
    }

    async fn on_refresh(&mut self) -> Vec<Effect> {
        if self.credential.is_none() {
            self.await_credential(ErrorKind::NoCredential);
            return vec![];
        }
        if self.state.current_pr.is_none() {
            self.state.phase = Phase::Ready(vec![]);
            self.state.last_error = Some(ErrorKind::NotAPullRequestPage);
            return vec![];
        }
        self.evaluate(true).await
    }

    async fn on_credential_saved(&mut self, token: &str) -> Vec<Effect> {
        let token = token.trim();
        if token.is_empty() {
            warn!("Ignoring empty credential");
            return vec![];
        }

        if let Err(e) = self.credentials.save(token).await {
            error!("Failed to save credential: {}", e);
            self.fail(e.into());
            return vec![];
        }

        // fetches issued with the previous credential must not judge the new one
        self.state.invalidate_in_flight();
        self.credential = Some(token.to_string());
        self.state.credential_present = true;
        self.state.show_settings = false;
        self.state.last_error = None;
        self.state.phase = Phase::Idle;
        self.evaluate(false).await
    }

    async fn on_gateway_resolved(
        &mut self,
        tag: FetchTag,
        result: Result<Vec<String>, GatewayFailure>,
    ) {
        if self.state.current_pr.as_ref() != Some(&tag.identity) {
            debug!(
                "Dropping result for {} (generation {}): PR no longer active",
                tag.identity, tag.generation
            );
            return;
        }

        match result {
            Ok(suggestions) => {
                if tag.generation <= self.state.generation_floor {
                    debug!(
                        "Dropping result of generation {}: a newer one already landed",
                        tag.generation
                    );
                    return;
                }
                self.state.generation_floor = tag.generation;
                if self.state.pending.as_ref() == Some(&tag) {
                    self.state.pending = None;
                }

                let key = tag.identity.cache_key();
                if let Err(e) = self
                    .cache
                    .store(&key, suggestions.clone(), self.clock.now())
                    .await
                {
                    warn!("Write-through for {} failed: {}", key, e);
                }

                info!(
                    "Showing {} fresh suggestions for {}",
                    suggestions.len(),
                    tag.identity
                );
                self.state.phase = Phase::Ready(suggestions);
                self.state.last_error = None;
            }
            Err(failure) => {
                if self.state.pending.as_ref() != Some(&tag) {
                    debug!(
                        "Ignoring failure of superseded fetch (generation {}): {}",
                        tag.generation, failure
                    );
                    return;
                }
                self.state.pending = None;
                self.state.generation_floor = tag.generation;
                self.apply_failure(failure).await;
            }
        }
    }

    async fn apply_failure(&mut self, failure: GatewayFailure) {
        warn!("Review fetch failed: {}", failure);

        if failure.is_credential_rejected() {
            if let Err(e) = self.credentials.clear().await {
                warn!("Failed to clear rejected credential: {}", e);
            }
            self.credential = None;
            self.state.credential_present = false;
            self.await_credential(ErrorKind::ExpiredOrRevokedCredential);
            return;
        }

        match failure.kind {
            FailureKind::NotFound => {
                // Credential is kept: a wrong PR is not a bad token.
                self.fail(ErrorKind::NotFound);
            }
            _ => self.fail(ErrorKind::NetworkOrServerError(failure.message)),
        }
    }

    /// Serve-or-fetch decision for the current PR
    async fn evaluate(&mut self, force_refresh: bool) -> Vec<Effect> {
        let Some(identity) = self.state.current_pr.clone() else {
            self.state.phase = Phase::Ready(vec![]);
            self.state.last_error = None;
            return vec![];
        };
        let Some(credential) = self.credential.clone() else {
            self.await_credential(ErrorKind::NoCredential);
            return vec![];
        };

        let now = self.clock.now();
        let key = identity.cache_key();
        let lookup = if force_refresh {
            CacheLookup::default()
        } else {
            self.cache.load(&key, now).await.unwrap_or_else(|e| {
                warn!("Cache read for {} failed, treating as miss: {}", key, e);
                CacheLookup::default()
            })
        };

        let action = self
            .cache
            .policy()
            .select_action(lookup.entry.as_ref(), now, force_refresh);
        let mut effects = match action {
            CacheAction::ServeCache => {
                debug!("Serving cached suggestions for {}", identity);
                let suggestions = lookup
                    .entry
                    .map(|entry| entry.suggestions)
                    .unwrap_or_default();
                self.state.phase = Phase::Ready(suggestions);
                self.state.last_error = None;
                vec![]
            }
            CacheAction::Fetch => {
                let tag = FetchTag {
                    identity,
                    generation: self.state.next_generation(),
                };
                info!(
                    "Fetching suggestions for {} (generation {}, forced: {})",
                    tag.identity, tag.generation, force_refresh
                );
                self.state.pending = Some(tag.clone());
                self.state.phase = Phase::Loading;
                self.state.last_error = None;
                vec![Effect::Fetch(FetchRequest { tag, credential })]
            }
        };

        if lookup.expired > 0 {
            debug!("{} expired cache entries to sweep", lookup.expired);
            effects.push(Effect::Sweep { now });
        }
        effects
    }

    fn await_credential(&mut self, reason: ErrorKind) {
        self.state.phase = Phase::AwaitingCredential;
        self.state.show_settings = reason.wants_settings();
        self.state.last_error = Some(reason);
    }

    fn fail(&mut self, kind: ErrorKind) {
        if kind.wants_settings() {
            self.state.show_settings = true;
        }
        self.state.phase = Phase::Error(kind.clone());
        self.state.last_error = Some(kind);
    }
}
