#![forbid(unsafe_code)]

mod cmd;
mod output;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use sprig_core::config::{SprigConfig, load_config, load_user_config};
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sprig: hierarchical todo ordering and drag-and-drop planning",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output (shorthand for `--format json`).
    #[arg(long, global = true)]
    json: bool,

    /// Output format. Overrides `--json`, `FORMAT` and the config file.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Config file to use instead of the user config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "Print nodes in hierarchical display order",
        after_help = "EXAMPLES:\n    sprig order todos.json\n    cat todos.json | sprig order - --json"
    )]
    Order(cmd::order::OrderArgs),

    #[command(
        next_help_heading = "Read",
        about = "Report dangling parents, self-parents, loops and duplicate ids"
    )]
    Check(cmd::check::CheckArgs),

    #[command(
        next_help_heading = "Drag",
        about = "Check whether nesting one node under another is allowed",
        after_help = "EXAMPLES:\n    sprig cycle todos.json parent child"
    )]
    Cycle(cmd::cycle::CycleArgs),

    #[command(
        next_help_heading = "Drag",
        about = "Build the commit payload for a final visual order",
        after_help = "EXAMPLES:\n    sprig plan visual.json\n    sprig plan visual.json --mode nest --dragged d --parent p"
    )]
    Plan(cmd::plan::PlanArgs),

    #[command(
        next_help_heading = "Drag",
        about = "Replay a scripted drag gesture through a session"
    )]
    Replay(cmd::replay::ReplayArgs),

    #[command(about = "Generate shell completions")]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SPRIG_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "sprig=debug,info"
        } else {
            "sprig=info,warn"
        })
    });

    let format = env::var("SPRIG_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn load(cli: &Cli) -> Result<SprigConfig> {
    match &cli.config {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(path)
        }
        None => load_user_config(),
    }
}

fn run(cli: Cli, config: &SprigConfig, output: OutputMode) -> Result<()> {
    match cli.command {
        Commands::Order(ref args) => cmd::order::run_order(args, output),
        Commands::Check(ref args) => cmd::check::run_check(args, output),
        Commands::Cycle(ref args) => cmd::cycle::run_cycle(args, output),
        Commands::Plan(ref args) => cmd::plan::run_plan(args, output),
        Commands::Replay(ref args) => cmd::replay::run_replay(args, &config.drag, output),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    // A broken config still has to pick an output mode for its own error.
    let (config, config_err) = match load(&cli) {
        Ok(config) => (config, None),
        Err(err) => (SprigConfig::default(), Some(err)),
    };
    let output = resolve_output_mode(cli.format, cli.json, config.output.as_deref());

    let result = match config_err {
        Some(err) => Err(err),
        None => run(cli, &config, output),
    };

    if let Err(err) = result {
        let cli_err = CliError::from(&err);
        if render_error(output, &cli_err).is_err() {
            eprintln!("error: {err:#}");
        }
        std::process::exit(1);
    }
}
