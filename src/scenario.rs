//! Classification of a directory's AGENTS.md / CLAUDE.md pair.
//!
//! A directory is reduced to one [`Scenario`] from the status of its two
//! convention files. The rules are evaluated in a fixed priority order so
//! that every status combination resolves deterministically.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::constants::{AGENTS_FILENAME, CLAUDE_FILENAME};
use crate::error::Result;
use crate::status::{claude_sources_agents, probe_file, FileStatus};

/// The relationship between the two convention files in one directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// Both exist and CLAUDE.md sources AGENTS.md
    Optimal,
    /// Both exist but CLAUDE.md does not source AGENTS.md
    BothNoSource,
    /// Only CLAUDE.md exists
    OnlyClaude,
    /// Only AGENTS.md exists
    OnlyAgents,
    /// Both are (live) symlinks
    BothSymlinks,
    /// One is a live symlink, the other a regular file
    MixedSymlinks,
    /// At least one of them is a dangling symlink
    BrokenSymlinks,
}

impl Scenario {
    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::Optimal => "optimal",
            Scenario::BothNoSource => "both-no-source",
            Scenario::OnlyClaude => "only-claude",
            Scenario::OnlyAgents => "only-agents",
            Scenario::BothSymlinks => "both-symlinks",
            Scenario::MixedSymlinks => "mixed-symlinks",
            Scenario::BrokenSymlinks => "broken-symlinks",
        }
    }

    pub fn needs_action(self) -> bool {
        self != Scenario::Optimal
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one directory's classification.
///
/// Replaced wholesale whenever the directory's files change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryInfo {
    pub path: PathBuf,
    pub agents_status: FileStatus,
    pub claude_status: FileStatus,
    pub needs_action: bool,
    pub scenario: Scenario,
}

impl DirectoryInfo {
    pub fn new(
        path: PathBuf,
        agents_status: FileStatus,
        claude_status: FileStatus,
        scenario: Scenario,
    ) -> Self {
        Self {
            path,
            agents_status,
            claude_status,
            needs_action: scenario.needs_action(),
            scenario,
        }
    }

    /// Copy of this entry that no longer asks for attention.
    ///
    /// Used when the user settles a directory with a no-op choice.
    pub fn settled(&self) -> Self {
        Self {
            needs_action: false,
            ..self.clone()
        }
    }

    /// True when no explicit rule matched and the scenario is the fallback
    pub fn is_unclassified(&self) -> bool {
        match_scenario(
            self.agents_status,
            self.claude_status,
            self.claude_status == FileStatus::Sourcing,
        )
        .is_none()
    }
}

/// Applies the explicit classification rules.
///
/// Returns `None` for status combinations no rule covers; see [`classify`].
pub fn match_scenario(
    agents_status: FileStatus,
    claude_status: FileStatus,
    claude_sources: bool,
) -> Option<Scenario> {
    use FileStatus::*;

    let agents_exists = agents_status == Exists;
    let claude_exists = claude_status.is_regular_file();

    if agents_exists && claude_exists {
        return Some(if claude_sources {
            Scenario::Optimal
        } else {
            Scenario::BothNoSource
        });
    }

    if claude_exists && agents_status == Missing {
        return Some(Scenario::OnlyClaude);
    }

    if agents_exists && claude_status == Missing {
        return Some(Scenario::OnlyAgents);
    }

    if agents_status == Symlink && claude_status == Symlink {
        return Some(Scenario::BothSymlinks);
    }

    // Raw `exists` on the non-link side; a sourcing CLAUDE.md is left unmatched
    if (agents_status == Symlink && claude_status == Exists)
        || (agents_exists && claude_status == Symlink)
    {
        return Some(Scenario::MixedSymlinks);
    }

    if agents_status == Broken || claude_status == Broken {
        return Some(Scenario::BrokenSymlinks);
    }

    None
}

/// Total classification over every status combination.
///
/// Combinations without an explicit rule (for instance a live AGENTS.md
/// symlink next to a missing CLAUDE.md) fall back to
/// [`Scenario::BothNoSource`].
pub fn classify(
    agents_status: FileStatus,
    claude_status: FileStatus,
    claude_sources: bool,
) -> Scenario {
    match match_scenario(agents_status, claude_status, claude_sources) {
        Some(scenario) => scenario,
        None => {
            tracing::debug!(
                agents = %agents_status,
                claude = %claude_status,
                "unclassified status combination, falling back to both-no-source"
            );
            Scenario::BothNoSource
        }
    }
}

/// Probes both convention files in `dir` and classifies the directory.
///
/// # Errors
///
/// Propagates any probe failure other than "not found".
pub fn analyze_directory(dir: &Path) -> Result<DirectoryInfo> {
    let agents_status = probe_file(&dir.join(AGENTS_FILENAME))?;
    let mut claude_status = probe_file(&dir.join(CLAUDE_FILENAME))?;

    let claude_sources =
        claude_status == FileStatus::Exists && claude_sources_agents(&dir.join(CLAUDE_FILENAME));

    if claude_sources {
        claude_status = FileStatus::Sourcing;
    }

    let scenario = classify(agents_status, claude_status, claude_sources);
    tracing::debug!(
        dir = %dir.display(),
        agents = %agents_status,
        claude = %claude_status,
        scenario = %scenario,
        "classified directory"
    );

    Ok(DirectoryInfo::new(
        dir.to_path_buf(),
        agents_status,
        claude_status,
        scenario,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::tempdir;
    use FileStatus::*;

    fn any_status() -> impl Strategy<Value = FileStatus> {
        prop::sample::select(FileStatus::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn classify_is_total(agents in any_status(), claude in any_status(), sources in any::<bool>()) {
            let scenario = classify(agents, claude, sources);
            match match_scenario(agents, claude, sources) {
                Some(explicit) => prop_assert_eq!(scenario, explicit),
                None => prop_assert_eq!(scenario, Scenario::BothNoSource),
            }
        }

        #[test]
        fn optimal_requires_sourcing(agents in any_status(), claude in any_status(), sources in any::<bool>()) {
            if classify(agents, claude, sources) == Scenario::Optimal {
                prop_assert!(sources);
                prop_assert_eq!(agents, Exists);
                prop_assert!(claude.is_regular_file());
            }
        }
    }

    #[test]
    fn test_every_combination_has_a_scenario() {
        for agents in FileStatus::ALL {
            for claude in FileStatus::ALL {
                let sources = claude == Sourcing;
                let scenario = classify(agents, claude, sources);
                let info = DirectoryInfo::new(PathBuf::from("/x"), agents, claude, scenario);
                assert_eq!(info.needs_action, scenario != Scenario::Optimal);
            }
        }
    }

    #[test]
    fn test_rule_priority() {
        assert_eq!(classify(Exists, Sourcing, true), Scenario::Optimal);
        assert_eq!(classify(Exists, Exists, false), Scenario::BothNoSource);
        assert_eq!(classify(Missing, Exists, false), Scenario::OnlyClaude);
        assert_eq!(classify(Missing, Sourcing, true), Scenario::OnlyClaude);
        assert_eq!(classify(Exists, Missing, false), Scenario::OnlyAgents);
        assert_eq!(classify(Symlink, Symlink, false), Scenario::BothSymlinks);
        assert_eq!(classify(Symlink, Exists, false), Scenario::MixedSymlinks);
        assert_eq!(classify(Exists, Symlink, false), Scenario::MixedSymlinks);
        assert_eq!(classify(Symlink, Sourcing, true), Scenario::BothNoSource);
        assert_eq!(classify(Exists, Broken, false), Scenario::BrokenSymlinks);
        assert_eq!(classify(Broken, Missing, false), Scenario::BrokenSymlinks);
        assert_eq!(classify(Symlink, Broken, false), Scenario::BrokenSymlinks);
    }

    #[test]
    fn test_fallback_is_distinguishable() {
        assert_eq!(match_scenario(Symlink, Missing, false), None);
        assert_eq!(match_scenario(Missing, Missing, false), None);
        assert_eq!(classify(Symlink, Missing, false), Scenario::BothNoSource);
        assert_eq!(match_scenario(Symlink, Sourcing, true), None);
        assert_eq!(
            match_scenario(Exists, Exists, false),
            Some(Scenario::BothNoSource)
        );

        let fallback = DirectoryInfo::new(
            PathBuf::from("/p"),
            Symlink,
            Missing,
            classify(Symlink, Missing, false),
        );
        assert!(fallback.is_unclassified());

        let genuine = DirectoryInfo::new(
            PathBuf::from("/p"),
            Exists,
            Exists,
            classify(Exists, Exists, false),
        );
        assert!(!genuine.is_unclassified());
    }

    #[test]
    fn test_analyze_promotes_sourcing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(AGENTS_FILENAME), "# Agents").unwrap();
        fs::write(dir.path().join(CLAUDE_FILENAME), "@AGENTS.md\n").unwrap();

        let info = analyze_directory(dir.path()).unwrap();
        assert_eq!(info.agents_status, Exists);
        assert_eq!(info.claude_status, Sourcing);
        assert_eq!(info.scenario, Scenario::Optimal);
        assert!(!info.needs_action);
    }

    #[test]
    fn test_analyze_plain_claude() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(AGENTS_FILENAME), "# Agents").unwrap();
        fs::write(dir.path().join(CLAUDE_FILENAME), "# Claude only").unwrap();

        let info = analyze_directory(dir.path()).unwrap();
        assert_eq!(info.claude_status, Exists);
        assert_eq!(info.scenario, Scenario::BothNoSource);
        assert!(info.needs_action);
    }

    #[cfg(unix)]
    #[test]
    fn test_analyze_linked_agents_with_sourcing_claude_is_unclassified() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("real.md"), "# Agents").unwrap();
        std::os::unix::fs::symlink("real.md", dir.path().join(AGENTS_FILENAME)).unwrap();
        fs::write(dir.path().join(CLAUDE_FILENAME), "@AGENTS.md\n").unwrap();

        let info = analyze_directory(dir.path()).unwrap();
        assert_eq!(info.agents_status, Symlink);
        assert_eq!(info.claude_status, Sourcing);
        assert_eq!(info.scenario, Scenario::BothNoSource);
        assert!(info.is_unclassified());
        assert_eq!(
            crate::actions::options_for_directory(&info)[0].action_type,
            crate::actions::ActionType::ReviewManually
        );
    }

    #[test]
    fn test_settled_keeps_scenario() {
        let info = DirectoryInfo::new(
            PathBuf::from("/p"),
            Exists,
            Missing,
            Scenario::OnlyAgents,
        );
        let settled = info.settled();
        assert!(!settled.needs_action);
        assert_eq!(settled.scenario, Scenario::OnlyAgents);
        assert_eq!(settled.path, info.path);
    }
}
