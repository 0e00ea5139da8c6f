//! Review core: suggestion cache policy and fetch orchestration
//!
//! Decides, for the pull request in the active tab, whether cached review
//! suggestions can be shown or a fresh review must be fetched, and keeps
//! overlapping fetches from clobbering each other.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │ Popup (runtime)                                         │
//! │   Dispatcher ─► Event ─► Orchestrator ─► Effect::Fetch  │
//! └────────────────────────────────────────────────────────┘
//!        │                 │                 │
//!        ▼                 ▼                 ▼
//!  CredentialStore   SuggestionCache    ReviewGateway
//!  (sync scope)      (local scope,      (pr-review-client)
//!                     CachePolicy)
//! ```
//!
//! The orchestrator itself performs no network I/O; it returns effects and is
//! driven by [`Event::GatewayResolved`] when they complete. Tests replay event
//! sequences against it with a [`ManualClock`] and in-memory stores.
//!
//! # Example
//!
//! ```rust,no_run
//! use pr_review_config::AppConfig;
//! use pr_review_core::{Event, Popup};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (popup, dispatcher) = Popup::from_config(&AppConfig::load())?;
//! let mut states = popup.subscribe();
//! tokio::spawn(popup.run());
//!
//! dispatcher.dispatch(Event::Mounted {
//!     url: Some("https://github.com/acme/widgets/pull/42".to_string()),
//! });
//! states.changed().await?;
//! println!("{:?}", states.borrow().phase);
//! # Ok(())
//! # }
//! ```

pub mod cache_policy;
pub mod clock;
pub mod credential;
pub mod error;
pub mod event;
pub mod orchestrator;
pub mod pr_identity;
pub mod runtime;
pub mod settings;
pub mod state;
pub mod suggestion_cache;

pub use cache_policy::{
    derive_key, is_fresh, CacheAction, CacheEntry, CacheMapping, CachePolicy, DEFAULT_FRESH_TTL,
    DEFAULT_RETENTION_TTL,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use credential::{CredentialStore, CREDENTIAL_KEY};
pub use error::ErrorKind;
pub use event::{Effect, Event, FetchRequest, FetchTag};
pub use orchestrator::Orchestrator;
pub use pr_identity::PrIdentity;
pub use runtime::{Dispatcher, Popup};
pub use settings::{validate_credential_input, SettingsError, MIN_TOKEN_LEN};
pub use state::{Phase, SessionState};
pub use suggestion_cache::{CacheLookup, SuggestionCache, CACHE_ROOT_KEY, MAX_TIMESTAMP_LEAD_MS};
