//! Skipper - terminal monitor for agent-driven task plans
//!
//! Runs a multi-task plan against an AI coding CLI and shows the run
//! live: streamed agent output, a tool activity feed, and per-task
//! progress, all in one dashboard.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use skipper_core::{paths, ExecConfig, Plan};

mod tui;

/// Skipper - plan run monitor
#[derive(Parser)]
#[command(name = "skipper")]
#[command(about = "Run multi-task plans against an AI coding CLI", long_about = None)]
struct Cli {
    /// Path to a plan JSON file
    plan: Option<PathBuf>,

    /// Agent command to spawn for each task attempt
    #[arg(short, long)]
    command: Option<String>,

    /// Extra argument passed to the agent command (repeatable)
    #[arg(long = "arg", value_name = "ARG")]
    args: Vec<String>,

    /// Attempts per task before the run fails
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Replay a scripted demo run instead of spawning an agent
    #[arg(long)]
    demo: bool,
}

/// Restore terminal state - called on panic or unexpected exit
fn restore_terminal() {
    use crossterm::{
        event::DisableMouseCapture,
        execute,
        terminal::{disable_raw_mode, LeaveAlternateScreen},
    };
    let _ = disable_raw_mode();
    let _ = execute!(std::io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up panic hook to restore terminal state
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    // Initialize logging to file (not stdout/stderr which would mess up TUI)
    let log_dir = paths::logs_dir();
    std::fs::create_dir_all(&log_dir).ok();

    // Create null device path based on platform
    #[cfg(unix)]
    let null_device = "/dev/null";
    #[cfg(windows)]
    let null_device = "NUL";

    let log_file = std::fs::File::create(log_dir.join("skipper.log"))
        .unwrap_or_else(|_| std::fs::File::create(null_device).unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let mut config = ExecConfig::load().context("failed to load config")?;
    if let Some(command) = cli.command {
        config.command = command;
    }
    if !cli.args.is_empty() {
        config.args = cli.args;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.max_attempts = max_attempts.max(1);
    }

    let plan = match (&cli.plan, cli.demo) {
        (Some(path), _) => Plan::load(path)
            .with_context(|| format!("failed to load plan {}", path.display()))?,
        (None, true) => Plan::sample(),
        (None, false) => bail!("a plan file is required unless --demo is given"),
    };

    tracing::info!(title = %plan.title, tasks = plan.total_tasks(), "plan loaded");

    let mut app = tui::App::new(plan, config, cli.demo);
    app.run().await
}
