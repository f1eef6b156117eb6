//! Data held by the selection workflow between events.

use std::path::Path;

use crate::actions::Action;
use crate::executor::ActionResults;
use crate::scenario::DirectoryInfo;

/// Where the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scanning,
    Displaying,
    Selecting,
    Executing,
    Complete,
    Error,
}

/// What the final screen should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// At least one action was applied or settled
    Results,
    /// Directories were found and none needs attention
    AllOptimal,
    /// No directory holds either convention file
    NothingFound,
    /// The user skipped past or quit with directories still needing attention
    Unresolved,
}

/// Session state: the live inventory, the cursor, staged and applied actions.
///
/// Only [`Workflow::handle`] changes it; the inventory is
/// updated by replacing whole entries.
#[derive(Debug, Clone)]
pub struct Workflow {
    pub phase: Phase,
    pub directories: Vec<DirectoryInfo>,
    /// Index into [`Workflow::needing_action`]
    pub cursor: usize,
    /// Chosen but not yet applied, in the order they will run
    pub staged: Vec<Action>,
    pub results: ActionResults,
    pub auto: bool,
    pub dry_run: bool,
    pub error: Option<String>,
}

impl Workflow {
    pub fn new(auto: bool, dry_run: bool) -> Self {
        Self {
            phase: Phase::Scanning,
            directories: Vec::new(),
            cursor: 0,
            staged: Vec::new(),
            results: ActionResults::new(),
            auto,
            dry_run,
            error: None,
        }
    }

    /// Directories still asking for attention, recomputed on every call
    pub fn needing_action(&self) -> Vec<&DirectoryInfo> {
        self.directories.iter().filter(|d| d.needs_action).collect()
    }

    pub fn needing_count(&self) -> usize {
        self.directories.iter().filter(|d| d.needs_action).count()
    }

    /// The directory under the cursor
    pub fn current_directory(&self) -> Option<&DirectoryInfo> {
        self.needing_action().get(self.cursor).copied()
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn staged_for(&self, dir: &Path) -> Option<&Action> {
        self.staged.iter().find(|a| a.directory == dir)
    }

    /// Replaces the entry for `info.path`, leaving every other entry alone
    pub(crate) fn replace_directory(&mut self, info: DirectoryInfo) {
        if let Some(slot) = self.directories.iter_mut().find(|d| d.path == info.path) {
            *slot = info;
        }
    }

    /// Keeps the cursor inside the (possibly shorter) needing-action list
    pub(crate) fn clamp_cursor(&mut self) {
        let remaining = self.needing_count();
        self.cursor = self.cursor.min(remaining.saturating_sub(1));
    }

    pub fn completion(&self) -> Option<Completion> {
        if self.phase != Phase::Complete {
            return None;
        }
        Some(if !self.results.is_empty() {
            Completion::Results
        } else if self.directories.is_empty() {
            Completion::NothingFound
        } else if self.needing_count() == 0 {
            Completion::AllOptimal
        } else {
            Completion::Unresolved
        })
    }
}
