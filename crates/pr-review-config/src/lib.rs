//! Configuration and file management for the PR review assistant
//!
//! This crate provides:
//! - Directory and file paths for the persistent stores
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;
pub mod paths;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

/// Default GitHub REST API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

pub use app_config::AppConfig;
pub use config_file::{config_candidates, load_config_file};
pub use paths::{cache_dir, config_dir, local_storage_path, sync_storage_path};
