//! Status probing for a single convention file.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::constants::SOURCING_MARKER;
use crate::error::{Error, Result};

/// What a convention file path currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    /// A regular file
    Exists,
    /// Nothing there, or something that is not a regular file (e.g. a directory)
    Missing,
    /// A symbolic link whose target is reachable
    Symlink,
    /// A symbolic link whose target cannot be accessed
    Broken,
    /// A regular CLAUDE.md that contains the sourcing marker
    Sourcing,
}

impl FileStatus {
    /// All statuses, in declaration order
    pub const ALL: [FileStatus; 5] = [
        FileStatus::Exists,
        FileStatus::Missing,
        FileStatus::Symlink,
        FileStatus::Broken,
        FileStatus::Sourcing,
    ];

    /// True for a regular file, whether or not it sources AGENTS.md
    pub fn is_regular_file(self) -> bool {
        matches!(self, FileStatus::Exists | FileStatus::Sourcing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileStatus::Exists => "exists",
            FileStatus::Missing => "missing",
            FileStatus::Symlink => "symlink",
            FileStatus::Broken => "broken",
            FileStatus::Sourcing => "sourcing",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inspects `path` without following it, then follows it only to tell a live
/// symlink from a dangling one.
///
/// Never yields [`FileStatus::Sourcing`]; promotion happens in the classifier.
///
/// # Errors
///
/// Returns [`Error::Probe`] for any I/O failure other than "not found"
/// (permission denied, a parent component that is not a directory, ...).
pub fn probe_file(path: &Path) -> Result<FileStatus> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(FileStatus::Missing),
        Err(source) => {
            return Err(Error::Probe {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if metadata.file_type().is_symlink() {
        // A separate, link-following check decides whether the target is reachable
        return Ok(match fs::metadata(path) {
            Ok(_) => FileStatus::Symlink,
            Err(_) => FileStatus::Broken,
        });
    }

    if metadata.is_file() {
        Ok(FileStatus::Exists)
    } else {
        Ok(FileStatus::Missing)
    }
}

/// Returns true when the file at `claude_path` contains the sourcing marker.
///
/// Read failures count as "does not source".
pub fn claude_sources_agents(claude_path: &Path) -> bool {
    match fs::read(claude_path) {
        Ok(bytes) => contains_marker(&String::from_utf8_lossy(&bytes)),
        Err(e) => {
            tracing::debug!(
                path = %claude_path.display(),
                error = %e,
                "could not read CLAUDE.md for sourcing check"
            );
            false
        }
    }
}

/// Substring test for the sourcing marker, anywhere in the content.
pub fn contains_marker(content: &str) -> bool {
    content.contains(SOURCING_MARKER)
}
