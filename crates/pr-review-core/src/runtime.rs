//! Popup runtime
//!
//! Owns the [`Orchestrator`] and feeds it events from a channel, one at a
//! time. Fetch effects run on spawned tasks that report back through the same
//! channel, so completions are ordered with every other event. Each processed
//! event publishes a [`SessionState`] snapshot on a watch channel for the
//! presentation layer.
//!
//! ```text
//!  Dispatcher ──► event_rx ──► Orchestrator::handle ──► state_tx (watch)
//!                    ▲                  │
//!                    │                  ▼ Effect::Fetch
//!                    └──── spawned ReviewGateway::review
//! ```
//!
//! `Effect::Sweep` runs on its own task and reports nothing back.

use crate::cache_policy::CachePolicy;
use crate::clock::SystemClock;
use crate::credential::CredentialStore;
use crate::event::{Effect, Event, FetchRequest};
use crate::orchestrator::Orchestrator;
use crate::state::SessionState;
use crate::suggestion_cache::SuggestionCache;
use anyhow::Context;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use pr_review_client::{HttpGateway, ReviewGateway};
use pr_review_config::AppConfig;
use pr_review_storage::{JsonFileStore, StorageScope};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::watch;

/// Sends events into a running [`Popup`]
#[derive(Clone)]
pub struct Dispatcher {
    event_tx: UnboundedSender<Event>,
}

impl Dispatcher {
    pub fn dispatch(&self, event: Event) {
        if let Err(e) = self.event_tx.send(event) {
            error!("Dispatcher: popup is gone, dropping {:?}", e.0);
        }
    }
}

pub struct Popup {
    orchestrator: Orchestrator,
    cache: SuggestionCache,
    gateway: Arc<dyn ReviewGateway>,
    event_rx: UnboundedReceiver<Event>,
    // Weak so the loop ends once every Dispatcher and fetch task is gone
    event_tx: WeakUnboundedSender<Event>,
    state_tx: watch::Sender<SessionState>,
}

impl Popup {
    pub fn new(orchestrator: Orchestrator, gateway: Arc<dyn ReviewGateway>) -> (Self, Dispatcher) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(orchestrator.state().clone());
        let popup = Self {
            cache: orchestrator.cache().clone(),
            orchestrator,
            gateway,
            event_rx,
            event_tx: event_tx.downgrade(),
            state_tx,
        };
        (popup, Dispatcher { event_tx })
    }

    /// Wire the production collaborators from `config`
    ///
    /// Credential goes to the sync-scope file, the suggestion cache to the
    /// local-scope file.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<(Self, Dispatcher)> {
        let sync = JsonFileStore::for_scope(StorageScope::Sync)
            .context("Failed to open sync storage")?;
        let local = JsonFileStore::for_scope(StorageScope::Local)
            .context("Failed to open local storage")?;
        info!(
            "Using storage {} and {}",
            sync.path().display(),
            local.path().display()
        );

        let orchestrator = Orchestrator::new(
            CredentialStore::new(Arc::new(sync)),
            SuggestionCache::new(Arc::new(local), CachePolicy::from_config(config)),
            Arc::new(SystemClock),
        )
        .with_github_host(config.github_host.clone());
        let gateway = Arc::new(HttpGateway::from_config(config));

        Ok(Self::new(orchestrator, gateway))
    }

    /// Receive a snapshot after every processed event
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> &SessionState {
        self.orchestrator.state()
    }

    /// Process the next event; `false` once no sender is left
    pub async fn step(&mut self) -> bool {
        let Some(event) = self.event_rx.recv().await else {
            return false;
        };

        let effects = self.orchestrator.handle(event).await;
        self.state_tx.send_replace(self.orchestrator.state().clone());
        for effect in effects {
            self.execute(effect);
        }
        true
    }

    pub async fn run(mut self) {
        while self.step().await {}
        debug!("Popup event loop finished");
    }

    fn execute(&self, effect: Effect) {
        match effect {
            Effect::Fetch(request) => self.spawn_fetch(request),
            Effect::Sweep { now } => self.spawn_sweep(now),
        }
    }

    fn spawn_sweep(&self, now: DateTime<Utc>) {
        let cache = self.cache.clone();
        tokio::spawn(async move {
            match cache.sweep(now).await {
                Ok(removed) => debug!("Swept {} expired cache entries", removed),
                Err(e) => warn!("Cache sweep skipped: {}", e),
            }
        });
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        let Some(event_tx) = self.event_tx.upgrade() else {
            warn!("Popup closed, not fetching for {}", request.tag.identity);
            return;
        };
        let gateway = self.gateway.clone();

        tokio::spawn(async move {
            let FetchRequest { tag, credential } = request;
            let result = gateway
                .review(
                    &tag.identity.owner,
                    &tag.identity.repo,
                    tag.identity.number,
                    &credential,
                )
                .await;
            if event_tx.send(Event::GatewayResolved { tag, result }).is_err() {
                debug!("Popup closed before the fetch completed");
            }
        });
    }
}
