//! Terminal front end: inventory and summary tables, the action menu, and
//! key handling.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{style, Key, Term};
use serde::Serialize;

use crate::actions::options_for_directory;
use crate::error::{Error, Result};
use crate::executor::ActionOutcome;
use crate::paths::shorten_path;
use crate::scenario::DirectoryInfo;
use crate::status::FileStatus;
use crate::workflow::{Completion, Event, Frontend, Phase, Workflow};

const MENU_PATH_WIDTH: usize = 60;
const TABLE_PATH_WIDTH: usize = 50;

/// How long an all-optimal inventory stays up before the session completes
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_secs(2);

/// Renders to stdout and reads keys from the terminal
pub struct TerminalFrontend {
    term: Term,
    /// Print nothing (JSON output is produced separately)
    quiet: bool,
    advance_delay: Duration,
    /// Highlighted menu row and the directory it belongs to
    selected: usize,
    menu_for: Option<PathBuf>,
}

impl TerminalFrontend {
    pub fn new(quiet: bool) -> Self {
        Self::with_term(Term::stdout(), quiet)
    }

    /// Front end drawing to (and reading keys from) an explicit terminal
    pub fn with_term(term: Term, quiet: bool) -> Self {
        Self {
            term,
            quiet,
            advance_delay: if quiet {
                Duration::ZERO
            } else {
                DEFAULT_ADVANCE_DELAY
            },
            selected: 0,
            menu_for: None,
        }
    }

    fn clear(&self) -> Result<()> {
        if self.term.is_term() {
            self.term.clear_screen().map_err(Error::Terminal)?;
        }
        Ok(())
    }

    /// Writes a line that must not interrupt the session; returns whether it
    /// reached the terminal
    fn write_best_effort(&self, text: &str) -> bool {
        match self.term.write_line(text) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "could not write progress line");
                false
            }
        }
    }

    fn line(&self, text: impl AsRef<str>) -> Result<()> {
        self.term.write_line(text.as_ref()).map_err(Error::Terminal)
    }

    fn render_menu(&mut self, workflow: &Workflow, dir: &DirectoryInfo) -> Result<()> {
        if self.menu_for.as_deref() != Some(dir.path.as_path()) {
            self.menu_for = Some(dir.path.clone());
            self.selected = 0;
        }

        let options = options_for_directory(dir);
        let needing = workflow.needing_count();

        self.line(
            style(format!("Directory {} of {}", workflow.cursor + 1, needing))
                .dim()
                .to_string(),
        )?;
        self.line("")?;
        self.line(
            style(shorten_path(&dir.path, MENU_PATH_WIDTH))
                .cyan()
                .bold()
                .to_string(),
        )?;
        self.line(format!(
            "AGENTS: {} | CLAUDE: {} | {}",
            styled_status(dir.agents_status),
            styled_status(dir.claude_status),
            style(dir.scenario).dim()
        ))?;
        if let Some(outcome) = workflow.results.get(&dir.path).filter(|o| !o.success) {
            self.line(style(format!("Last attempt failed: {}", outcome.message)).red().to_string())?;
        }
        if let Some(staged) = workflow.staged_for(&dir.path) {
            self.line(style(format!("Staged: {}", staged.description)).yellow().to_string())?;
        }
        self.line("")?;
        self.line("Choose an action:")?;

        for (index, option) in options.iter().enumerate() {
            let badge = if option.recommended { " [recommended]" } else { "" };
            let text = format!("{}{}", option.label, badge);
            if index == self.selected {
                self.line(style(format!("❯ {text}")).cyan().bold().to_string())?;
            } else {
                self.line(format!("  {text}"))?;
            }
        }

        self.line("")?;
        let back = if workflow.can_go_back() { " • ← prev" } else { "" };
        self.line(
            style(format!(
                "↑↓ navigate • Enter apply • Space stage • 's' skip{back} • Esc list"
            ))
            .dim()
            .to_string(),
        )
    }

    fn render_complete(&self, workflow: &Workflow) -> Result<()> {
        match workflow.completion() {
            Some(Completion::Results) => {
                self.line(style("Summary").bold().to_string())?;
                self.line(results_table(workflow).to_string())?;
                let failed = workflow.results.values().filter(|o| !o.success).count();
                let succeeded = workflow.results.len() - failed;
                self.line(format!(
                    "{} succeeded, {} failed",
                    style(succeeded).green(),
                    if failed > 0 {
                        style(failed).red()
                    } else {
                        style(failed).dim()
                    }
                ))
            }
            Some(Completion::NothingFound) => self.line(
                style("No directories found with CLAUDE.md or AGENTS.md files.")
                    .yellow()
                    .to_string(),
            ),
            Some(Completion::AllOptimal) => {
                self.line(inventory_table(&workflow.directories).to_string())?;
                self.line(
                    style("✓ All directories are in optimal state!")
                        .green()
                        .to_string(),
                )
            }
            Some(Completion::Unresolved) | None => {
                self.line(inventory_table(&workflow.directories).to_string())?;
                self.line(format!(
                    "{} directories still need attention",
                    style(workflow.needing_count()).yellow()
                ))
            }
        }
    }
}

impl Frontend for TerminalFrontend {
    fn render(&mut self, workflow: &Workflow) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        if !workflow.auto {
            self.clear()?;
        }

        let dry = if workflow.dry_run { "[DRY RUN] " } else { "" };
        match workflow.phase {
            Phase::Scanning => self.line(format!("{dry}Scanning for AGENTS.md and CLAUDE.md...")),
            Phase::Displaying => {
                self.line(inventory_table(&workflow.directories).to_string())?;
                if workflow.needing_count() > 0 {
                    self.line("")?;
                    self.line("Press any key to start interactive mode, or Ctrl+C to exit...")?;
                }
                Ok(())
            }
            Phase::Selecting => match workflow.current_directory() {
                Some(dir) => {
                    let dir = dir.clone();
                    self.render_menu(workflow, &dir)
                }
                None => Ok(()),
            },
            Phase::Executing => {
                let count = workflow.staged.len();
                if count > 0 {
                    let plural = if count == 1 { "" } else { "s" };
                    self.line(format!("{dry}Executing {count} action{plural}..."))
                } else {
                    self.line(format!("{dry}Applying action..."))
                }
            }
            Phase::Complete => self.render_complete(workflow),
            Phase::Error => self.line(
                style(format!(
                    "Error: {}",
                    workflow.error.as_deref().unwrap_or("unknown error")
                ))
                .red()
                .bold()
                .to_string(),
            ),
        }
    }

    fn next_event(&mut self, workflow: &Workflow) -> Result<Event> {
        if !self.term.is_term() {
            tracing::debug!("stdout is not a terminal, ending interactive session");
            return Ok(Event::Quit);
        }

        loop {
            let key = self.term.read_key().map_err(Error::Terminal)?;

            match workflow.phase {
                Phase::Displaying => match key {
                    Key::CtrlC => return Ok(Event::Quit),
                    Key::Escape => continue,
                    _ => return Ok(Event::KeyPressed),
                },
                Phase::Selecting => {
                    let Some(dir) = workflow.current_directory() else {
                        return Ok(Event::Skip);
                    };
                    let options = options_for_directory(dir);

                    match key {
                        Key::ArrowUp => {
                            self.selected = self.selected.checked_sub(1).unwrap_or(options.len() - 1);
                        }
                        Key::ArrowDown => {
                            self.selected = (self.selected + 1) % options.len();
                        }
                        Key::Enter => {
                            let option = &options[self.selected.min(options.len() - 1)];
                            return Ok(Event::Choose(option.to_action(dir)));
                        }
                        Key::Char(' ') => {
                            let option = &options[self.selected.min(options.len() - 1)];
                            return Ok(Event::Stage(option.to_action(dir)));
                        }
                        Key::Char('s') | Key::Char('S') => return Ok(Event::Skip),
                        Key::ArrowLeft if workflow.can_go_back() => return Ok(Event::Back),
                        Key::Escape => return Ok(Event::ExitToList),
                        Key::CtrlC => return Ok(Event::Quit),
                        _ => continue,
                    }

                    // Highlight moved: redraw and keep reading
                    self.render(workflow)?;
                }
                _ => return Ok(Event::Quit),
            }
        }
    }

    fn pause(&mut self) {
        thread::sleep(self.advance_delay);
    }

    fn progress(&mut self, index: usize, total: usize, directory: &Path) {
        if self.quiet {
            return;
        }
        let name = directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| directory.display().to_string());
        self.write_best_effort(&format!("[{index}/{total}] Processing {name}..."));
    }
}

fn styled_status(status: FileStatus) -> String {
    match status {
        FileStatus::Exists => style(status).green().to_string(),
        FileStatus::Sourcing => style(status).cyan().to_string(),
        _ => style(status).red().to_string(),
    }
}

fn status_cell(status: FileStatus) -> Cell {
    let color = match status {
        FileStatus::Exists => Color::Green,
        FileStatus::Sourcing => Color::Cyan,
        FileStatus::Missing => Color::DarkGrey,
        FileStatus::Symlink => Color::Yellow,
        FileStatus::Broken => Color::Red,
    };
    Cell::new(status).fg(color)
}

/// The scanned inventory, one row per directory
pub fn inventory_table(directories: &[DirectoryInfo]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Directory").add_attribute(Attribute::Bold),
        Cell::new("AGENTS.md").add_attribute(Attribute::Bold),
        Cell::new("CLAUDE.md").add_attribute(Attribute::Bold),
        Cell::new("Scenario").add_attribute(Attribute::Bold),
    ]);

    for dir in directories {
        let scenario = if dir.needs_action {
            Cell::new(dir.scenario).fg(Color::Yellow)
        } else {
            Cell::new(format!("✓ {}", dir.scenario)).fg(Color::Green)
        };
        table.add_row(vec![
            Cell::new(shorten_path(&dir.path, TABLE_PATH_WIDTH)),
            status_cell(dir.agents_status),
            status_cell(dir.claude_status),
            scenario,
        ]);
    }

    table
}

/// Per-directory outcomes; failures are highlighted in red
pub fn results_table(workflow: &Workflow) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Directory").add_attribute(Attribute::Bold),
        Cell::new("Result").add_attribute(Attribute::Bold),
        Cell::new("Message").add_attribute(Attribute::Bold),
    ]);

    for (path, outcome) in &workflow.results {
        let color = if outcome.success { Color::Green } else { Color::Red };
        let mark = if outcome.success { "✓" } else { "✗" };
        table.add_row(vec![
            Cell::new(shorten_path(path, TABLE_PATH_WIDTH)).fg(color),
            Cell::new(mark).fg(color),
            Cell::new(&outcome.message).fg(color),
        ]);
    }

    table
}

#[derive(Serialize)]
struct ResultRow<'a> {
    path: &'a Path,
    #[serde(flatten)]
    outcome: &'a ActionOutcome,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    dry_run: bool,
    error: Option<&'a str>,
    directories: &'a [DirectoryInfo],
    results: Vec<ResultRow<'a>>,
}

/// Machine-readable summary of a finished session
pub fn json_report(workflow: &Workflow) -> serde_json::Result<String> {
    let report = Report {
        dry_run: workflow.dry_run,
        error: workflow.error.as_deref(),
        directories: &workflow.directories,
        results: workflow
            .results
            .iter()
            .map(|(path, outcome)| ResultRow { path, outcome })
            .collect(),
    };
    serde_json::to_string_pretty(&report)
}
