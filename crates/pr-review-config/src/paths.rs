//! Configuration and data directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/pr-review/`, `~/.cache/pr-review/`
//! - macOS: `~/Library/Application Support/pr-review/`, `~/Library/Caches/pr-review/`
//! - Windows: `%APPDATA%\pr-review\`, `%LOCALAPPDATA%\pr-review\`
//!
//! The credential lives in the config directory (it should survive cache wipes),
//! cached suggestions live in the cache directory.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "pr-review";
const SYNC_STORAGE_FILE: &str = "sync-storage.json";
const LOCAL_STORAGE_FILE: &str = "local-storage.json";

/// Get the application config directory
/// Returns ~/.config/pr-review/ on Linux, ~/Library/Application Support/pr-review/ on macOS
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
    Ok(dir)
}

/// Get the application cache directory
/// Returns ~/.cache/pr-review/ on Linux, ~/Library/Caches/pr-review/ on macOS
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache directory: {:?}", dir))?;
    Ok(dir)
}

/// Get path to the sync-scope store (credential)
pub fn sync_storage_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(SYNC_STORAGE_FILE))
}

/// Get path to the local-scope store (suggestion cache)
pub fn local_storage_path() -> Result<PathBuf> {
    Ok(cache_dir()?.join(LOCAL_STORAGE_FILE))
}
