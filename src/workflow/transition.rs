//! The pure transition function of the selection workflow.
//!
//! `handle` never touches the filesystem or the terminal. Work that needs
//! I/O is returned as [`Effect`]s; the runner performs it and reports back
//! with another [`Event`].

use crate::actions::{recommended_action, Action};
use crate::executor::{ActionOutcome, ActionResults};
use crate::scanner::ScanResult;
use crate::scenario::DirectoryInfo;

use super::state::{Phase, Workflow};

/// Something that happened: user input or the result of an effect
#[derive(Debug, Clone)]
pub enum Event {
    ScanFinished(ScanResult),
    ScanFailed(String),
    /// Any key on the inventory screen
    KeyPressed,
    /// The all-optimal inventory has been on screen long enough
    DisplayTimeout,
    /// Apply this action to the current directory now
    Choose(Action),
    /// Queue this action for the batch and move on
    Stage(Action),
    Skip,
    Back,
    ExitToList,
    /// The interrupt key combination
    Quit,
    /// An applied action finished; `refreshed` is the directory re-classified
    /// afterwards when its files may have changed
    ActionApplied {
        action: Action,
        outcome: ActionOutcome,
        refreshed: Option<DirectoryInfo>,
    },
    BatchFinished(ActionResults),
}

/// Work the runner must perform on the workflow's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Scan,
    /// Execute one action, re-classify its directory, answer with `ActionApplied`
    Apply(Action),
    /// Execute staged actions in order, answer with `BatchFinished`
    ExecuteBatch(Vec<Action>),
    /// Wait a moment, then answer with `DisplayTimeout`
    ScheduleAdvance,
}

impl Workflow {
    /// Effects that start a session
    pub fn start(&mut self) -> Vec<Effect> {
        self.phase = Phase::Scanning;
        vec![Effect::Scan]
    }

    /// Advances the state machine by one event.
    ///
    /// Events that make no sense in the current phase are ignored.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match (self.phase, event) {
            (Phase::Scanning, Event::ScanFinished(result)) => self.on_scan_finished(result),
            (Phase::Scanning, Event::ScanFailed(message)) => {
                self.error = Some(message);
                self.phase = Phase::Error;
                Vec::new()
            }
            (Phase::Displaying, Event::KeyPressed) => {
                if self.needing_count() > 0 {
                    self.phase = Phase::Selecting;
                }
                Vec::new()
            }
            (Phase::Displaying, Event::DisplayTimeout) => {
                if self.needing_count() == 0 {
                    self.phase = Phase::Complete;
                }
                Vec::new()
            }
            (Phase::Selecting, Event::Choose(action)) => {
                self.phase = Phase::Executing;
                vec![Effect::Apply(action)]
            }
            (Phase::Selecting, Event::Stage(action)) => {
                self.staged.retain(|a| a.directory != action.directory);
                self.staged.push(action);
                self.advance()
            }
            (Phase::Selecting, Event::Skip) => self.advance(),
            (Phase::Selecting, Event::Back) => {
                self.go_back();
                Vec::new()
            }
            (Phase::Selecting, Event::ExitToList) => {
                self.staged.clear();
                self.cursor = 0;
                self.phase = Phase::Displaying;
                Vec::new()
            }
            (Phase::Displaying | Phase::Selecting, Event::Quit) => {
                self.staged.clear();
                self.phase = Phase::Complete;
                Vec::new()
            }
            (
                Phase::Executing,
                Event::ActionApplied {
                    action,
                    outcome,
                    refreshed,
                },
            ) => {
                self.on_action_applied(action, outcome, refreshed);
                Vec::new()
            }
            (Phase::Executing, Event::BatchFinished(results)) => {
                self.results.extend(results);
                self.staged.clear();
                self.phase = Phase::Complete;
                Vec::new()
            }
            (phase, event) => {
                tracing::debug!(?phase, ?event, "ignoring event");
                Vec::new()
            }
        }
    }

    fn on_scan_finished(&mut self, result: ScanResult) -> Vec<Effect> {
        self.directories = result.directories;
        self.cursor = 0;

        if self.directories.is_empty() {
            self.phase = Phase::Complete;
            return Vec::new();
        }

        if self.needing_count() == 0 {
            self.phase = Phase::Displaying;
            return vec![Effect::ScheduleAdvance];
        }

        if self.auto {
            self.staged = self
                .needing_action()
                .into_iter()
                .map(recommended_action)
                .collect();
            self.phase = Phase::Executing;
            return vec![Effect::ExecuteBatch(self.staged.clone())];
        }

        self.phase = Phase::Displaying;
        Vec::new()
    }

    fn advance(&mut self) -> Vec<Effect> {
        let next = self.cursor + 1;
        if next < self.needing_count() {
            self.cursor = next;
            return Vec::new();
        }

        if self.staged.is_empty() {
            self.phase = Phase::Complete;
            Vec::new()
        } else {
            self.phase = Phase::Executing;
            vec![Effect::ExecuteBatch(self.staged.clone())]
        }
    }

    fn go_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;

        // Returning to a directory un-stages its pending choice
        if let Some(path) = self.current_directory().map(|d| d.path.clone()) {
            self.staged.retain(|a| a.directory != path);
        }
    }

    fn on_action_applied(
        &mut self,
        action: Action,
        outcome: ActionOutcome,
        refreshed: Option<DirectoryInfo>,
    ) {
        let succeeded = outcome.success;
        self.results.insert(action.directory.clone(), outcome);

        if !succeeded {
            // Stays in the list so the user can retry or pick differently
            self.phase = Phase::Selecting;
            return;
        }

        match refreshed {
            Some(info) => self.replace_directory(info),
            None => {
                // No files changed (no-op kind or dry run): settle it as is
                let settled = self
                    .directories
                    .iter()
                    .find(|d| d.path == action.directory)
                    .map(DirectoryInfo::settled);
                if let Some(settled) = settled {
                    self.replace_directory(settled);
                }
            }
        }

        if self.needing_count() == 0 {
            self.phase = Phase::Complete;
        } else {
            self.clamp_cursor();
            self.phase = Phase::Selecting;
        }
    }
}
