//! `.pr-review.toml` discovery
//!
//! A project-local file in the working directory overrides the one in the
//! user's home directory. The first readable candidate wins; the files are
//! never merged.

use std::path::PathBuf;

const CONFIG_FILE: &str = ".pr-review.toml";

/// Places searched for the config file, highest priority first
pub fn config_candidates() -> Vec<PathBuf> {
    std::iter::once(PathBuf::from(CONFIG_FILE))
        .chain(dirs::home_dir().map(|home| home.join(CONFIG_FILE)))
        .collect()
}

/// Content of the first readable config file, if any
pub fn load_config_file() -> Option<String> {
    read_first(&config_candidates())
}

fn read_first(candidates: &[PathBuf]) -> Option<String> {
    candidates.iter().find_map(|path| match std::fs::read_to_string(path) {
        Ok(content) => {
            log::debug!("Using config file {}", path.display());
            Some(content)
        }
        Err(e) => {
            log::trace!("No config at {}: {}", path.display(), e);
            None
        }
    })
}
