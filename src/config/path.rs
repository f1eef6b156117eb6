//! Handles the logic for determining the configuration file paths.

use directories::BaseDirs;
use std::path::{Path, PathBuf};

use crate::constants::{APP_NAME, CONFIG_FILE_NAME, PROJECT_CONFIG_DIR};

/// Returns the user's home directory.
///
/// `$HOME` wins when set so tests and sandboxes can redirect it; otherwise
/// the platform lookup from the `directories` crate is used.
pub fn home_dir() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("HOME").filter(|h| !h.is_empty()) {
        return Some(PathBuf::from(home));
    }
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Global configuration file: `<home>/.config/source-agents/config.yml`
pub fn global_config_path() -> Option<PathBuf> {
    home_dir().map(|home| global_config_path_in(&home))
}

/// Global configuration file path below an explicit home directory
pub fn global_config_path_in(home: &Path) -> PathBuf {
    home.join(".config").join(APP_NAME).join(CONFIG_FILE_NAME)
}

/// Project configuration candidates, in lookup order: `<root>/config.yml`,
/// then `<root>/.source-agents/config.yml`
pub fn project_config_paths(root: &Path) -> [PathBuf; 2] {
    [
        root.join(CONFIG_FILE_NAME),
        root.join(PROJECT_CONFIG_DIR).join(CONFIG_FILE_NAME),
    ]
}
