use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tusk_core::manager::{TaskManager, TaskManagerConfig, DEFAULT_DEFINITION_FILE};

mod commands;

/// Tusk - A task runner for namespaced, dependency-aware tasks
#[derive(Parser)]
#[command(name = "tusk")]
#[command(about = "Run namespaced tasks and their dependencies concurrently")]
#[command(version)]
struct Cli {
    /// The task definition file to use
    #[arg(short, long, default_value = DEFAULT_DEFINITION_FILE)]
    file: PathBuf,

    /// Show the resolved task dependency graph
    #[arg(long)]
    graph: bool,

    /// Print the JSON schema of the definition file and exit
    #[arg(long)]
    schema: bool,

    /// Disable colored task prefixes
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Patterns selecting the tasks to run; lists all tasks when omitted
    tasks: Vec<String>,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env("TUSK_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.schema {
        return commands::schema::execute();
    }

    // Load the task tree (CLI layer only handles presentation)
    let manager = TaskManager::load(TaskManagerConfig {
        definition_file: cli.file,
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize tasks: {}", e))?;

    if cli.graph {
        return commands::graph::execute(&manager);
    }

    if cli.tasks.is_empty() {
        return commands::list::execute(&manager);
    }

    let code = commands::run::execute(&manager, &cli.tasks).await?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
