//! Path expansion for `--root` and shortening for display.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::config::home_dir;
use crate::error::{Error, Result, RootProblem};

/// Expands a leading `~` to the home directory and makes the path absolute,
/// with `.` and `..` segments collapsed.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined for a
/// relative path.
pub fn expand_path(input: &str) -> io::Result<PathBuf> {
    if let Some(rest) = input.strip_prefix('~') {
        if let Some(home) = home_dir() {
            let rest = rest.trim_start_matches(['/', '\\']);
            let expanded = if rest.is_empty() { home } else { home.join(rest) };
            return Ok(normalize(&expanded));
        }
    }

    let path = Path::new(input);
    if path.is_absolute() {
        Ok(normalize(path))
    } else {
        Ok(normalize(&std::env::current_dir()?.join(path)))
    }
}

/// Lexically removes `.` and resolves `..` against the preceding segment.
/// `..` at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Checks that a scan root exists and is a directory.
///
/// # Errors
///
/// Returns [`Error::InvalidRoot`] naming the problem.
pub fn validate_root(path: &Path) -> Result<()> {
    let reason = match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => RootProblem::NotADirectory,
        Err(_) => RootProblem::Missing,
    };
    Err(Error::InvalidRoot {
        path: path.to_path_buf(),
        reason,
    })
}

/// Replaces the home prefix with `~` and truncates to `max_len` characters.
pub fn shorten_path(path: &Path, max_len: usize) -> String {
    shorten_path_with_home(path, home_dir().as_deref(), max_len)
}

/// [`shorten_path`] with an explicit home directory
pub fn shorten_path_with_home(path: &Path, home: Option<&Path>, max_len: usize) -> String {
    let display = match home.and_then(|home| path.strip_prefix(home).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => path.display().to_string(),
    };

    let chars = display.chars().count();
    if chars <= max_len {
        return display;
    }
    if max_len <= 3 {
        return display.chars().take(1).collect();
    }

    let kept: String = display.chars().take(max_len - 3).collect();
    format!("{kept}...")
}
