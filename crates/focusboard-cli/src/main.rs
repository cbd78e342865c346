use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "focusboard", version, about = "FocusBoard CLI")]
struct Cli {
    /// Database file (defaults to ~/.config/focusboard/focusboard.db)
    #[arg(long, global = true, env = "FOCUSBOARD_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Kanban task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Kanban label management
    Label {
        #[command(subcommand)]
        action: commands::label::LabelAction,
    },
    /// Quick todo list
    Todo {
        #[command(subcommand)]
        action: commands::todo::TodoAction,
    },
    /// Notes
    Note {
        #[command(subcommand)]
        action: commands::note::NoteAction,
    },
    /// Workflow step progress
    Workflow {
        #[command(subcommand)]
        action: commands::workflow::WorkflowAction,
    },
    /// Focus timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Focus statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let db = cli.db.as_deref();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(db, action),
        Commands::Label { action } => commands::label::run(db, action),
        Commands::Todo { action } => commands::todo::run(db, action),
        Commands::Note { action } => commands::note::run(db, action),
        Commands::Workflow { action } => commands::workflow::run(db, action),
        Commands::Timer { action } => commands::timer::run(db, action),
        Commands::Stats { action } => commands::stats::run(db, action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
