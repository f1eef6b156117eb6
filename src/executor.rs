//! Applies a chosen [`Action`] to the files of one directory.
//!
//! Every mutation is confined to `AGENTS.md` and `CLAUDE.md` inside
//! `action.directory`; nothing recurses into subdirectories.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::actions::{Action, ActionType};
use crate::constants::{
    AGENTS_FILENAME, AGENTS_TEMPLATE, CLAUDE_FILENAME, CLAUDE_SOURCING_ONLY, CLAUDE_TEMPLATE,
    SOURCING_DIRECTIVE,
};
use crate::error::{Error, Result};
use crate::status::contains_marker;

/// Prefix that marks a simulated outcome
pub const DRY_RUN_PREFIX: &str = "[DRY RUN]";

/// Result of applying (or failing to apply) an action to one directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    pub fn from_result(result: &Result<String>) -> Self {
        match result {
            Ok(message) => Self::success(message.clone()),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

/// Per-directory outcomes, keyed by absolute directory path
pub type ActionResults = BTreeMap<PathBuf, ActionOutcome>;

/// Executes a single action and returns a human-readable outcome.
///
/// With `dry_run` set nothing is touched and the returned message starts
/// with [`DRY_RUN_PREFIX`].
///
/// # Errors
///
/// Returns [`Error::Execute`] wrapping the underlying I/O failure.
pub fn execute_action(action: &Action, dry_run: bool) -> Result<String> {
    if dry_run {
        return Ok(format!("{DRY_RUN_PREFIX} {}", action.description));
    }

    let dir = action.directory.as_path();
    let agents_path = dir.join(AGENTS_FILENAME);
    let claude_path = dir.join(CLAUDE_FILENAME);

    let outcome = match &action.action_type {
        ActionType::CreateAgentsEmpty => create_agents_empty(&agents_path, &claude_path),
        ActionType::CreateAgentsFromClaude => create_agents_from_claude(&agents_path, &claude_path),
        ActionType::CreateClaudeSourcing => fs::write(&claude_path, CLAUDE_SOURCING_ONLY)
            .map(|()| "Created CLAUDE.md with @AGENTS.md sourcing".to_string()),
        ActionType::CreateClaudeEmpty => fs::write(&claude_path, CLAUDE_TEMPLATE)
            .map(|()| "Created CLAUDE.md from template".to_string()),
        ActionType::AddSourceToClaude => add_source_to_claude(&claude_path),
        ActionType::ConvertSymlinks => convert_symlinks(&agents_path, &claude_path),
        ActionType::RemoveBroken => Ok(remove_broken(&agents_path, &claude_path)),
        ActionType::DoNothing => Ok("No changes made".to_string()),
        ActionType::ReviewManually => Ok("Skipped - requires manual review".to_string()),
        ActionType::Unknown(name) => Ok(format!("Unknown action type: {name}")),
    };

    match outcome {
        Ok(message) => {
            tracing::info!(
                action = %action.action_type,
                dir = %dir.display(),
                "{message}"
            );
            Ok(message)
        }
        Err(source) => Err(Error::execute(action.action_type.clone(), dir, source)),
    }
}

/// Executes staged actions one at a time, in order.
///
/// A failure is recorded for its directory and never stops later actions.
/// `on_progress` receives the 1-based index, the total, and the directory.
pub fn execute_actions<F>(actions: &[Action], dry_run: bool, mut on_progress: F) -> ActionResults
where
    F: FnMut(usize, usize, &Path),
{
    let mut results = ActionResults::new();

    for (index, action) in actions.iter().enumerate() {
        on_progress(index + 1, actions.len(), &action.directory);

        let result = execute_action(action, dry_run);
        if let Err(e) = &result {
            tracing::warn!(dir = %action.directory.display(), error = %e, "action failed");
        }
        results.insert(action.directory.clone(), ActionOutcome::from_result(&result));
    }

    results
}

fn create_agents_empty(agents_path: &Path, claude_path: &Path) -> io::Result<String> {
    fs::write(agents_path, AGENTS_TEMPLATE)?;

    // AGENTS.md exists now; wiring up CLAUDE.md is best effort
    if claude_path.exists() {
        if let Err(e) = prepend_directive(claude_path) {
            tracing::debug!(
                path = %claude_path.display(),
                error = %e,
                "could not add sourcing directive to CLAUDE.md"
            );
        }
    }

    Ok("Created empty AGENTS.md and ensured CLAUDE.md sources it".to_string())
}

fn create_agents_from_claude(agents_path: &Path, claude_path: &Path) -> io::Result<String> {
    let content = fs::read(claude_path)?;
    fs::write(agents_path, content)?;
    fs::write(claude_path, SOURCING_DIRECTIVE)?;
    Ok("Moved content from CLAUDE.md to AGENTS.md and added sourcing".to_string())
}

fn add_source_to_claude(claude_path: &Path) -> io::Result<String> {
    if prepend_directive(claude_path)? {
        Ok("Added @AGENTS.md sourcing to CLAUDE.md".to_string())
    } else {
        Ok("CLAUDE.md already sources AGENTS.md".to_string())
    }
}

/// Prepends the sourcing directive unless the marker is already present.
/// Returns whether the file was rewritten.
fn prepend_directive(claude_path: &Path) -> io::Result<bool> {
    let content = fs::read_to_string(claude_path)?;
    if contains_marker(&content) {
        return Ok(false);
    }
    fs::write(claude_path, format!("{SOURCING_DIRECTIVE}{content}"))?;
    Ok(true)
}

fn convert_symlinks(agents_path: &Path, claude_path: &Path) -> io::Result<String> {
    let conversions = [
        (AGENTS_FILENAME, convert_symlink(agents_path)),
        (CLAUDE_FILENAME, convert_symlink(claude_path)),
    ];

    let mut converted = Vec::new();
    let mut failed = Vec::new();
    for (name, result) in conversions {
        match result {
            Ok(true) => converted.push(format!("Converted {name} symlink to real file")),
            Ok(false) => {}
            Err(e) => {
                tracing::debug!(file = name, error = %e, "symlink conversion failed");
                failed.push((name, e));
            }
        }
    }

    if converted.is_empty() {
        // Nothing succeeded: surface the first failure, if there was one
        if let Some((name, e)) = failed.into_iter().next() {
            return Err(io::Error::new(e.kind(), format!("{name}: {e}")));
        }
        return Ok("No symlinks to convert".to_string());
    }

    let mut message = converted.join("; ");
    for (name, e) in &failed {
        message.push_str(&format!("; could not convert {name}: {e}"));
    }
    Ok(message)
}

/// Replaces a symlink with a regular file holding its target's content.
/// Returns `Ok(false)` when `path` is not a symlink.
fn convert_symlink(path: &Path) -> io::Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => {}
        _ => return Ok(false),
    }

    let link = fs::read_link(path)?;
    let target = match path.parent() {
        Some(parent) => parent.join(link),
        None => link,
    };
    let content = fs::read(&target)?;

    fs::remove_file(path)?;
    fs::write(path, content)?;
    Ok(true)
}

fn remove_broken(agents_path: &Path, claude_path: &Path) -> String {
    let removed: Vec<&str> = [(AGENTS_FILENAME, agents_path), (CLAUDE_FILENAME, claude_path)]
        .into_iter()
        .filter_map(|(name, path)| match remove_if_broken(path) {
            Ok(true) => Some(name),
            Ok(false) => None,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "skipping broken-link check");
                None
            }
        })
        .collect();

    if removed.is_empty() {
        "No broken symlinks found".to_string()
    } else {
        format!("Removed broken symlinks: {}", removed.join(", "))
    }
}

/// Deletes `path` only if it is a symlink whose target cannot be reached.
fn remove_if_broken(path: &Path) -> io::Result<bool> {
    if !fs::symlink_metadata(path)?.file_type().is_symlink() {
        return Ok(false);
    }
    if fs::metadata(path).is_ok() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn action(dir: &Path, action_type: ActionType) -> Action {
        Action {
            description: format!("test {action_type}"),
            action_type,
            directory: dir.to_path_buf(),
            recommended: false,
        }
    }

    #[test]
    fn test_create_claude_sourcing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(AGENTS_FILENAME), "# Agents").unwrap();

        execute_action(&action(dir.path(), ActionType::CreateClaudeSourcing), false).unwrap();

        let claude = fs::read_to_string(dir.path().join(CLAUDE_FILENAME)).unwrap();
        assert_eq!(claude, "@AGENTS.md\n");
    }

    #[test]
    fn test_create_claude_empty_uses_template() {
        let dir = tempdir().unwrap();
        execute_action(&action(dir.path(), ActionType::CreateClaudeEmpty), false).unwrap();

        let claude = fs::read_to_string(dir.path().join(CLAUDE_FILENAME)).unwrap();
        assert_eq!(claude, CLAUDE_TEMPLATE);
        assert_ne!(claude, CLAUDE_SOURCING_ONLY);
    }

    #[test]
    fn test_create_agents_from_claude_moves_content() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CLAUDE_FILENAME), "hello").unwrap();

        execute_action(&action(dir.path(), ActionType::CreateAgentsFromClaude), false).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join(AGENTS_FILENAME)).unwrap(),
            "hello"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join(CLAUDE_FILENAME)).unwrap(),
            SOURCING_DIRECTIVE
        );
    }

    #[test]
    fn test_create_agents_from_claude_missing_claude_fails() {
        let dir = tempdir().unwrap();
        let err = execute_action(&action(dir.path(), ActionType::CreateAgentsFromClaude), false)
            .unwrap_err();
        assert!(matches!(err, Error::Execute { .. }));
        assert!(err.to_string().starts_with("Failed to execute action:"));
    }

    #[test]
    fn test_create_agents_empty_adds_directive_to_claude() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CLAUDE_FILENAME), "# Claude notes\n").unwrap();

        execute_action(&action(dir.path(), ActionType::CreateAgentsEmpty), false).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join(AGENTS_FILENAME)).unwrap(),
            AGENTS_TEMPLATE
        );
        assert_eq!(
            fs::read_to_string(dir.path().join(CLAUDE_FILENAME)).unwrap(),
            "@AGENTS.md\n\n# Claude notes\n"
        );
    }

    #[test]
    fn test_create_agents_empty_without_claude() {
        let dir = tempdir().unwrap();
        execute_action(&action(dir.path(), ActionType::CreateAgentsEmpty), false).unwrap();

        assert!(dir.path().join(AGENTS_FILENAME).exists());
        assert!(!dir.path().join(CLAUDE_FILENAME).exists());
    }

    #[test]
    fn test_add_source_is_idempotent() {
        let dir = tempdir().unwrap();
        let claude_path = dir.path().join(CLAUDE_FILENAME);
        fs::write(&claude_path, "# Custom").unwrap();

        let first = execute_action(&action(dir.path(), ActionType::AddSourceToClaude), false)
            .unwrap();
        assert_eq!(first, "Added @AGENTS.md sourcing to CLAUDE.md");
        assert_eq!(fs::read_to_string(&claude_path).unwrap(), "@AGENTS.md\n\n# Custom");

        let second = execute_action(&action(dir.path(), ActionType::AddSourceToClaude), false)
            .unwrap();
        assert_eq!(second, "CLAUDE.md already sources AGENTS.md");
        assert_eq!(fs::read_to_string(&claude_path).unwrap(), "@AGENTS.md\n\n# Custom");
    }

    #[test]
    fn test_noop_actions_and_unknown() {
        let dir = tempdir().unwrap();
        assert_eq!(
            execute_action(&action(dir.path(), ActionType::DoNothing), false).unwrap(),
            "No changes made"
        );
        assert_eq!(
            execute_action(&action(dir.path(), ActionType::ReviewManually), false).unwrap(),
            "Skipped - requires manual review"
        );
        let unknown = ActionType::Unknown("frobnicate".to_string());
        assert_eq!(
            execute_action(&action(dir.path(), unknown), false).unwrap(),
            "Unknown action type: frobnicate"
        );
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CLAUDE_FILENAME), "hello").unwrap();

        for action_type in [
            ActionType::CreateAgentsEmpty,
            ActionType::CreateAgentsFromClaude,
            ActionType::CreateClaudeSourcing,
            ActionType::CreateClaudeEmpty,
            ActionType::AddSourceToClaude,
            ActionType::ConvertSymlinks,
            ActionType::RemoveBroken,
        ] {
            let message = execute_action(&action(dir.path(), action_type), true).unwrap();
            assert!(message.starts_with(DRY_RUN_PREFIX));
        }

        assert!(!dir.path().join(AGENTS_FILENAME).exists());
        assert_eq!(
            fs::read_to_string(dir.path().join(CLAUDE_FILENAME)).unwrap(),
            "hello"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_convert_symlinks_to_real_files() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        fs::write(dir.path().join("shared.md"), "# Shared").unwrap();
        symlink("shared.md", dir.path().join(AGENTS_FILENAME)).unwrap();
        symlink("shared.md", dir.path().join(CLAUDE_FILENAME)).unwrap();

        let message =
            execute_action(&action(dir.path(), ActionType::ConvertSymlinks), false).unwrap();
        assert!(message.contains("Converted AGENTS.md"));
        assert!(message.contains("Converted CLAUDE.md"));

        for name in [AGENTS_FILENAME, CLAUDE_FILENAME] {
            let path = dir.path().join(name);
            assert!(!fs::symlink_metadata(&path).unwrap().file_type().is_symlink());
            assert_eq!(fs::read_to_string(&path).unwrap(), "# Shared");
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_convert_symlinks_isolates_broken_one() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        fs::write(dir.path().join("real.md"), "# Real").unwrap();
        symlink("real.md", dir.path().join(AGENTS_FILENAME)).unwrap();
        symlink("gone.md", dir.path().join(CLAUDE_FILENAME)).unwrap();

        let message =
            execute_action(&action(dir.path(), ActionType::ConvertSymlinks), false).unwrap();
        assert!(message.contains("Converted AGENTS.md symlink to real file"));
        assert!(message.contains("could not convert CLAUDE.md"));

        assert_eq!(
            fs::read_to_string(dir.path().join(AGENTS_FILENAME)).unwrap(),
            "# Real"
        );
        // The dangling link is left as it was
        let claude_meta = fs::symlink_metadata(dir.path().join(CLAUDE_FILENAME)).unwrap();
        assert!(claude_meta.file_type().is_symlink());
    }

    #[test]
    fn test_convert_without_symlinks() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(AGENTS_FILENAME), "a").unwrap();
        let message =
            execute_action(&action(dir.path(), ActionType::ConvertSymlinks), false).unwrap();
        assert_eq!(message, "No symlinks to convert");
    }

    #[cfg(unix)]
    #[test]
    fn test_remove_broken_only_touches_dangling_links() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        fs::write(dir.path().join(AGENTS_FILENAME), "# Agents").unwrap();
        symlink("missing.md", dir.path().join(CLAUDE_FILENAME)).unwrap();

        let message =
            execute_action(&action(dir.path(), ActionType::RemoveBroken), false).unwrap();
        assert_eq!(message, "Removed broken symlinks: CLAUDE.md");

        assert!(fs::symlink_metadata(dir.path().join(CLAUDE_FILENAME)).is_err());
        assert_eq!(
            fs::read_to_string(dir.path().join(AGENTS_FILENAME)).unwrap(),
            "# Agents"
        );

        let again = execute_action(&action(dir.path(), ActionType::RemoveBroken), false).unwrap();
        assert_eq!(again, "No broken symlinks found");
    }

    #[test]
    fn test_execute_actions_continues_after_failure() {
        let failing = tempdir().unwrap();
        let working = tempdir().unwrap();
        fs::write(working.path().join(AGENTS_FILENAME), "# A").unwrap();

        let actions = vec![
            action(failing.path(), ActionType::AddSourceToClaude),
            action(working.path(), ActionType::CreateClaudeSourcing),
        ];

        let mut seen = Vec::new();
        let results = execute_actions(&actions, false, |index, total, _| seen.push((index, total)));

        assert_eq!(seen, vec![(1, 2), (2, 2)]);
        assert!(!results[failing.path()].success);
        assert!(results[failing.path()]
            .message
            .starts_with("Failed to execute action:"));
        assert!(results[working.path()].success);
        assert!(working.path().join(CLAUDE_FILENAME).exists());
    }
}
