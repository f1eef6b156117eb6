use clap::Parser;
use source_agents::ui::{json_report, TerminalFrontend};
use source_agents::{expand_path, load_config, run, validate_root, Phase, ScanOptions, Workflow};
use std::process;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "source-agents")]
#[command(version, about = "Manage CLAUDE.md and AGENTS.md files with intelligent sourcing")]
struct Cli {
    /// Root directory to scan
    #[arg(short, long, default_value = "~")]
    root: String,

    /// Additional glob patterns to exclude (merged after config excludes)
    #[arg(short, long, num_args = 1.., action = clap::ArgAction::Append)]
    exclude: Vec<String>,

    /// Show what would happen without touching any file
    #[arg(short, long)]
    dry_run: bool,

    /// Apply the recommended action for every directory without prompting
    #[arg(short, long)]
    auto: bool,

    /// Log per-directory decisions to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,
}

type FilterHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

fn filter_for(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("source_agents=debug")
        } else {
            EnvFilter::new("warn")
        }
    })
}

/// Logs go to stderr so stdout stays clean for tables and JSON
fn init_tracing(verbose: bool) -> FilterHandle {
    let (filter, handle) = reload::Layer::new(filter_for(verbose));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
    handle
}

fn main() {
    let cli = Cli::parse();
    let logging = init_tracing(cli.verbose);

    let root = match expand_path(&cli.root) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Error resolving --root path: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = validate_root(&root) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let config = load_config(&root);
    if config.scan_options.verbose && !cli.verbose {
        // Config can only raise verbosity once it has been read
        if let Err(e) = logging.reload(filter_for(true)) {
            eprintln!("Warning: could not raise log level: {}", e);
        }
    }

    let mut options = ScanOptions::new(&root)
        .with_config(&config)
        .with_excludes(cli.exclude);
    options.verbose |= cli.verbose;
    tracing::debug!(root = %root.display(), dry_run = cli.dry_run, auto = cli.auto, "starting session");

    let mut workflow = Workflow::new(cli.auto, cli.dry_run);
    let mut frontend = TerminalFrontend::new(cli.json && cli.auto);

    if let Err(e) = run(&mut workflow, &options, &mut frontend) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if cli.json {
        match json_report(&workflow) {
            Ok(report) => println!("{}", report),
            Err(e) => {
                eprintln!("Error writing JSON summary: {}", e);
                process::exit(1);
            }
        }
    }

    if workflow.phase == Phase::Error {
        if cli.json {
            if let Some(message) = &workflow.error {
                eprintln!("Error: {}", message);
            }
        }
        process::exit(1);
    }
}
