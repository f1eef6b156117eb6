//! Handles reading configuration files from disk.

use super::path::{global_config_path, project_config_paths};
use super::structure::{Config, PartialConfig};
use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Reads one YAML configuration file.
///
/// Returns `Ok(None)` when the file does not exist; an empty file is an empty
/// fragment.
///
/// # Errors
///
/// Returns [`Error::Config`] if the file cannot be read or parsed.
pub fn load_config_file(path: &Path) -> Result<Option<PartialConfig>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    };

    // Handle empty file case
    if content.trim().is_empty() {
        return Ok(Some(PartialConfig::default()));
    }

    serde_yml::from_str(&content)
        .map(Some)
        .map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Loads a file for merging; broken files are reported and skipped.
fn load_for_merge(path: &Path) -> Option<PartialConfig> {
    match load_config_file(path) {
        Ok(partial) => {
            if partial.is_some() {
                tracing::debug!(path = %path.display(), "loaded configuration file");
            }
            partial
        }
        Err(e) => {
            tracing::warn!("Failed to load config from {}: {}", path.display(), e);
            None
        }
    }
}

/// Merges defaults, an optional global file and the project files under `root`.
///
/// The first existing project file is used; project settings win over
/// global ones.
pub fn load_config_from(global: Option<&Path>, root: &Path) -> Config {
    let mut config = Config::default();

    if let Some(partial) = global.and_then(load_for_merge) {
        config.merge(partial);
    }

    if let Some(partial) = project_config_paths(root)
        .iter()
        .find_map(|path| load_for_merge(path))
    {
        config.merge(partial);
    }

    config
}

/// Loads the effective configuration for a scan rooted at `root`.
pub fn load_config(root: &Path) -> Config {
    let global = global_config_path();
    load_config_from(global.as_deref(), root)
}
