//! Drives a [`Workflow`] by performing its effects and feeding results back.

use std::collections::VecDeque;
use std::path::Path;

use crate::actions::Action;
use crate::error::Result;
use crate::executor::{execute_action, execute_actions, ActionOutcome};
use crate::scanner::{scan_directories, ScanOptions};
use crate::scenario::analyze_directory;

use super::state::{Phase, Workflow};
use super::transition::{Effect, Event};

/// The interactive surface: draws state and turns input into events.
pub trait Frontend {
    /// Draws the current state
    fn render(&mut self, workflow: &Workflow) -> Result<()>;

    /// Blocks for the next user event; only called while displaying or selecting
    fn next_event(&mut self, workflow: &Workflow) -> Result<Event>;

    /// Pause shown before an all-optimal inventory advances to completion
    fn pause(&mut self) {}

    /// Called before each action of a batch runs
    fn progress(&mut self, _index: usize, _total: usize, _directory: &Path) {}
}

/// Runs a session from scanning until it is complete or has failed.
///
/// # Errors
///
/// Only front end failures are returned; scan and action failures are
/// recorded in the workflow itself.
pub fn run<F: Frontend>(
    workflow: &mut Workflow,
    options: &ScanOptions,
    frontend: &mut F,
) -> Result<()> {
    let mut pending: VecDeque<Effect> = workflow.start().into();

    loop {
        while let Some(effect) = pending.pop_front() {
            if matches!(
                effect,
                Effect::Apply(_) | Effect::ExecuteBatch(_) | Effect::ScheduleAdvance
            ) {
                frontend.render(workflow)?;
            }
            let event = perform(effect, workflow, options, frontend);
            pending.extend(workflow.handle(event));
        }

        match workflow.phase {
            Phase::Complete | Phase::Error => {
                frontend.render(workflow)?;
                return Ok(());
            }
            Phase::Displaying | Phase::Selecting => {
                frontend.render(workflow)?;
                let event = frontend.next_event(workflow)?;
                pending.extend(workflow.handle(event));
            }
            Phase::Scanning | Phase::Executing => {
                // Effects always move these phases on; getting here is a stall
                tracing::warn!(phase = ?workflow.phase, "workflow stalled without pending work");
                workflow.phase = Phase::Complete;
            }
        }
    }
}

fn perform<F: Frontend>(
    effect: Effect,
    workflow: &Workflow,
    options: &ScanOptions,
    frontend: &mut F,
) -> Event {
    match effect {
        Effect::Scan => match scan_directories(options) {
            Ok(result) => Event::ScanFinished(result),
            Err(e) => Event::ScanFailed(e.to_string()),
        },
        Effect::Apply(action) => apply(action, workflow),
        Effect::ExecuteBatch(actions) => {
            let results = execute_actions(&actions, workflow.dry_run, |index, total, dir| {
                frontend.progress(index, total, dir)
            });
            Event::BatchFinished(results)
        }
        Effect::ScheduleAdvance => {
            frontend.pause();
            Event::DisplayTimeout
        }
    }
}

/// Executes one action and re-classifies its directory when files may have
/// changed.
fn apply(action: Action, workflow: &Workflow) -> Event {
    let result = execute_action(&action, workflow.dry_run);
    let outcome = ActionOutcome::from_result(&result);

    let refreshed = if result.is_err() || action.action_type.is_noop() || workflow.dry_run {
        None
    } else {
        match analyze_directory(&action.directory) {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!(
                    dir = %action.directory.display(),
                    error = %e,
                    "could not re-check directory after applying action"
                );
                // Keep the old entry so the directory stays in the list
                workflow
                    .directories
                    .iter()
                    .find(|d| d.path == action.directory)
                    .cloned()
            }
        }
    };

    Event::ActionApplied {
        action,
        outcome,
        refreshed,
    }
}
