//! Defines the `Config` struct and how file fragments merge into it.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_EXCLUDE;

/// Effective configuration after defaults, global and project files are merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Glob patterns skipped during discovery
    pub exclude: Vec<String>,
    pub scan_options: ScanOptionsConfig,
}

/// The `scanOptions` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOptionsConfig {
    /// Accepted for compatibility; discovery never follows symlinks
    pub follow_symlinks: bool,
    pub verbose: bool,
}

/// A single configuration file as written; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfig {
    pub exclude: Option<Vec<String>>,
    pub scan_options: Option<PartialScanOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialScanOptions {
    pub follow_symlinks: Option<bool>,
    pub verbose: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude: DEFAULT_EXCLUDE.iter().map(|p| p.to_string()).collect(),
            scan_options: ScanOptionsConfig::default(),
        }
    }
}

impl Config {
    /// Creates the built-in default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a file fragment on top of this configuration.
    ///
    /// A present `exclude` list replaces the current one rather than
    /// extending it; `scanOptions` keys override one by one.
    pub fn merge(&mut self, partial: PartialConfig) {
        if let Some(exclude) = partial.exclude {
            self.exclude = exclude;
        }

        if let Some(scan_options) = partial.scan_options {
            if let Some(follow_symlinks) = scan_options.follow_symlinks {
                self.scan_options.follow_symlinks = follow_symlinks;
            }
            if let Some(verbose) = scan_options.verbose {
                self.scan_options.verbose = verbose;
            }
        }
    }
}
