//! Diff and review-suggestion gateway
//!
//! This crate provides the network collaborators of the review core behind
//! trait seams, so the core can be driven by in-memory fakes in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              ReviewGateway trait                 │
//! │  - fetch_diff()                                  │
//! │  - fetch_suggestions()                           │
//! │  - review()  (both stages)                       │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌───────────────────┐
//!              │    HttpGateway    │
//!              └───────────────────┘
//!                 │             │
//!                 ▼             ▼
//! ┌─────────────────┐   ┌─────────────────────┐
//! │ OctocrabClient  │   │ SuggestionsClient   │
//! │ (GitHub diff,   │   │ (POST /api/         │
//! │  token check)   │   │  suggestions)       │
//! └─────────────────┘   └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use pr_review_client::{HttpGateway, ReviewGateway};
//! use pr_review_config::AppConfig;
//!
//! # async fn example() -> Result<(), pr_review_client::GatewayFailure> {
//! let gateway = HttpGateway::from_config(&AppConfig::default());
//! let sections = gateway.review("acme", "widgets", 42, "ghp_token").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod gateway;
pub mod octocrab_client;
pub mod suggestions_client;
pub mod types;

pub use client::{ReviewGateway, TokenValidator};
pub use gateway::HttpGateway;
pub use octocrab_client::OctocrabClient;
pub use suggestions_client::SuggestionsClient;
pub use types::{
    ErrorBody, FailureKind, GatewayFailure, Stage, SuggestionsRequest, SuggestionsResponse,
};
