//! Catalog of the actions offered for each scenario.

use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::scenario::{DirectoryInfo, Scenario};

/// The kinds of change the executor knows how to make
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionType {
    CreateAgentsEmpty,
    CreateAgentsFromClaude,
    CreateClaudeSourcing,
    CreateClaudeEmpty,
    AddSourceToClaude,
    ConvertSymlinks,
    RemoveBroken,
    DoNothing,
    ReviewManually,
    /// A type name this version does not recognize
    Unknown(String),
}

impl ActionType {
    pub fn as_str(&self) -> &str {
        match self {
            ActionType::CreateAgentsEmpty => "create-agents-empty",
            ActionType::CreateAgentsFromClaude => "create-agents-from-claude",
            ActionType::CreateClaudeSourcing => "create-claude-sourcing",
            ActionType::CreateClaudeEmpty => "create-claude-empty",
            ActionType::AddSourceToClaude => "add-source-to-claude",
            ActionType::ConvertSymlinks => "convert-symlinks",
            ActionType::RemoveBroken => "remove-broken",
            ActionType::DoNothing => "do-nothing",
            ActionType::ReviewManually => "review-manually",
            ActionType::Unknown(name) => name,
        }
    }

    /// No-op kinds settle a directory without touching its files
    pub fn is_noop(&self) -> bool {
        matches!(self, ActionType::DoNothing | ActionType::ReviewManually)
    }
}

impl FromStr for ActionType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "create-agents-empty" => ActionType::CreateAgentsEmpty,
            "create-agents-from-claude" => ActionType::CreateAgentsFromClaude,
            "create-claude-sourcing" => ActionType::CreateClaudeSourcing,
            "create-claude-empty" => ActionType::CreateClaudeEmpty,
            "add-source-to-claude" => ActionType::AddSourceToClaude,
            "convert-symlinks" => ActionType::ConvertSymlinks,
            "remove-broken" => ActionType::RemoveBroken,
            "do-nothing" => ActionType::DoNothing,
            "review-manually" => ActionType::ReviewManually,
            other => ActionType::Unknown(other.to_string()),
        })
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A chosen change for one directory. Carries intent only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub directory: PathBuf,
    pub description: String,
    pub recommended: bool,
}

/// One row of the menu shown for a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOption {
    pub action_type: ActionType,
    pub label: &'static str,
    pub description: &'static str,
    pub recommended: bool,
}

impl ActionOption {
    const fn new(
        action_type: ActionType,
        label: &'static str,
        description: &'static str,
        recommended: bool,
    ) -> Self {
        Self {
            action_type,
            label,
            description,
            recommended,
        }
    }

    /// Binds this option to a directory
    pub fn to_action(&self, directory: &DirectoryInfo) -> Action {
        Action {
            action_type: self.action_type.clone(),
            directory: directory.path.clone(),
            description: self.description.to_string(),
            recommended: self.recommended,
        }
    }
}

/// Options for a scenario, recommended first.
pub fn action_options(scenario: Scenario) -> Vec<ActionOption> {
    use ActionType::*;

    match scenario {
        Scenario::Optimal => vec![ActionOption::new(
            DoNothing,
            "No action needed",
            "Both files exist and CLAUDE.md sources AGENTS.md",
            true,
        )],
        Scenario::BothNoSource => vec![
            ActionOption::new(
                AddSourceToClaude,
                "Add @AGENTS.md to CLAUDE.md",
                "Add sourcing directive to existing CLAUDE.md",
                true,
            ),
            ActionOption::new(
                DoNothing,
                "Leave as-is",
                "Keep custom setup without sourcing",
                false,
            ),
        ],
        Scenario::OnlyClaude => vec![
            ActionOption::new(
                CreateAgentsFromClaude,
                "Move content to AGENTS.md",
                "Move CLAUDE.md content to AGENTS.md and add sourcing",
                true,
            ),
            ActionOption::new(
                CreateAgentsEmpty,
                "Create empty AGENTS.md",
                "Create empty AGENTS.md, add @AGENTS.md to CLAUDE.md",
                false,
            ),
            ActionOption::new(DoNothing, "Keep CLAUDE.md only", "No changes", false),
        ],
        Scenario::OnlyAgents => vec![
            ActionOption::new(
                CreateClaudeSourcing,
                "Create CLAUDE.md with sourcing",
                "Create CLAUDE.md that sources AGENTS.md",
                true,
            ),
            ActionOption::new(
                CreateClaudeEmpty,
                "Create empty CLAUDE.md",
                "Create CLAUDE.md from the template with room for customizations",
                false,
            ),
            ActionOption::new(DoNothing, "Keep AGENTS.md only", "No changes", false),
        ],
        Scenario::BothSymlinks | Scenario::MixedSymlinks => vec![
            ActionOption::new(
                ConvertSymlinks,
                "Convert symlinks to real files",
                "Replace symlinks with real files",
                true,
            ),
            ActionOption::new(DoNothing, "Keep symlinks", "No changes", false),
        ],
        Scenario::BrokenSymlinks => vec![
            ActionOption::new(
                RemoveBroken,
                "Remove broken symlinks",
                "Delete broken symbolic links",
                true,
            ),
            ActionOption::new(
                ReviewManually,
                "Review manually",
                "Skip automated fix",
                false,
            ),
        ],
    }
}

/// The single option offered when a directory matched no explicit rule.
pub fn fallback_options() -> Vec<ActionOption> {
    vec![ActionOption::new(
        ActionType::ReviewManually,
        "Review manually",
        "Requires manual review",
        true,
    )]
}

/// Options for a concrete directory.
///
/// Unclassified directories get [`fallback_options`] rather than the options
/// of the scenario they were folded into.
pub fn options_for_directory(dir: &DirectoryInfo) -> Vec<ActionOption> {
    if dir.is_unclassified() {
        fallback_options()
    } else {
        action_options(dir.scenario)
    }
}

/// The recommended action for a directory, as used by `--auto`.
pub fn recommended_action(dir: &DirectoryInfo) -> Action {
    let options = options_for_directory(dir);
    let option = options
        .iter()
        .find(|option| option.recommended)
        .unwrap_or(&options[0]);

    Action {
        action_type: option.action_type.clone(),
        directory: dir.path.clone(),
        description: option.label.to_string(),
        recommended: true,
    }
}
