//! A library for keeping AGENTS.md and CLAUDE.md files in step.
//!
//! AGENTS.md holds the shared, tool-agnostic instructions for a project and
//! CLAUDE.md should source it through the literal `@AGENTS.md` directive.
//! This crate finds every directory holding either file, classifies how the
//! two relate, offers the fixes that make sense for each case and applies
//! the chosen ones.
//!
//! The pieces, bottom-up:
//!
//! - [`status`] probes a single file
//! - [`scenario`] classifies a directory from its two file statuses
//! - [`actions`] lists the fixes offered for each scenario
//! - [`executor`] applies a fix (or simulates it in dry-run mode)
//! - [`scanner`] walks a tree and builds the inventory
//! - [`workflow`] is the interactive selection state machine
//! - [`ui`] is the terminal front end driving it

pub mod actions;
pub mod config;
pub mod constants;
pub mod error;
pub mod executor;
pub mod paths;
pub mod scanner;
pub mod scenario;
pub mod status;
pub mod ui;
pub mod workflow;

pub use actions::{
    action_options, fallback_options, options_for_directory, recommended_action, Action,
    ActionOption, ActionType,
};
pub use config::{load_config, Config};
pub use error::{Error, Result, RootProblem};
pub use executor::{execute_action, execute_actions, ActionOutcome, ActionResults};
pub use paths::{expand_path, shorten_path, validate_root};
pub use scanner::{scan_directories, scan_directories_with_config, ScanOptions, ScanResult};
pub use scenario::{analyze_directory, classify, DirectoryInfo, Scenario};
pub use status::{claude_sources_agents, probe_file, FileStatus};
pub use workflow::{run, Completion, Effect, Event, Frontend, Phase, Workflow};
