//! Error types shared by the scanner, executor and CLI.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::actions::ActionType;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the crate reports to its callers
#[derive(Debug, Error)]
pub enum Error {
    /// The scan root is missing or not a directory; reported before any UI starts
    #[error("--root path {reason}: {}", path.display())]
    InvalidRoot { path: PathBuf, reason: RootProblem },

    /// Unexpected I/O failure while probing one of the two convention files
    #[error("failed to inspect {}: {source}", path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An action failed part-way; the wrapped error is shown in the summary
    #[error("Failed to execute action: {source}")]
    Execute {
        action: ActionType,
        directory: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration file could not be read or parsed
    #[error("invalid configuration at {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// An exclude pattern is not a valid glob
    #[error("invalid exclude pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// Reading keys from or drawing to the terminal failed
    #[error("terminal error: {0}")]
    Terminal(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Why a `--root` argument was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootProblem {
    Missing,
    NotADirectory,
}

impl std::fmt::Display for RootProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RootProblem::Missing => f.write_str("does not exist"),
            RootProblem::NotADirectory => f.write_str("is not a directory"),
        }
    }
}

impl Error {
    pub(crate) fn execute(action: ActionType, directory: &std::path::Path, source: io::Error) -> Self {
        Error::Execute {
            action,
            directory: directory.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_root_message() {
        let err = Error::InvalidRoot {
            path: PathBuf::from("/nope"),
            reason: RootProblem::Missing,
        };
        assert_eq!(err.to_string(), "--root path does not exist: /nope");

        let err = Error::InvalidRoot {
            path: PathBuf::from("/etc/hosts"),
            reason: RootProblem::NotADirectory,
        };
        assert_eq!(err.to_string(), "--root path is not a directory: /etc/hosts");
    }

    #[test]
    fn test_execute_error_wraps_io_text() {
        let err = Error::execute(
            ActionType::AddSourceToClaude,
            std::path::Path::new("/tmp/project"),
            io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to execute action: No such file or directory"
        );
    }
}
