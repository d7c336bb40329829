use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod app;
mod commands;

#[derive(Parser)]
#[command(name = "lifeos", version, about = "Life OS CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pillar levels, streak, runway, KPIs and the goal of the day
    Dashboard,
    /// To-do list management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Daily self-review
    Review {
        #[command(subcommand)]
        action: commands::review::ReviewAction,
    },
    /// Long-term life goals
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Ask a mentor for advice on one of the fixed doubts
    Mentor(commands::mentor::MentorArgs),
    /// Generate a strategic report from all stored data
    Report,
    /// Personal context shared with the AI
    Memory {
        #[command(subcommand)]
        action: commands::memory::MemoryAction,
    },
    /// Monthly financial history
    Finance {
        #[command(subcommand)]
        action: commands::finance::FinanceAction,
    },
    /// Review questions, KPIs, mentors and budget
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Dashboard => commands::dashboard::run(),
        Commands::Task { action } => commands::task::run(action).await,
        Commands::Review { action } => commands::review::run(action).await,
        Commands::Goal { action } => commands::goal::run(action).await,
        Commands::Mentor(args) => commands::mentor::run(args).await,
        Commands::Report => commands::report::run().await,
        Commands::Memory { action } => commands::memory::run(action),
        Commands::Finance { action } => commands::finance::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
