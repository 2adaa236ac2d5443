use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "lifebalance", version, about = "Work/life balance, focus timer and habits")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work/life balance gauge
    Balance {
        #[command(subcommand)]
        action: commands::balance::BalanceAction,
    },
    /// Weekly planner grid
    Planner {
        #[command(subcommand)]
        action: commands::planner::PlannerAction,
    },
    /// Focus timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Today's habits and mood
    Habits {
        #[command(subcommand)]
        action: commands::habits::HabitsAction,
    },
    /// Print a koan
    Koan {
        /// List every koan instead of picking one
        #[arg(long)]
        all: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LIFEBALANCE_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Balance { action } => commands::balance::run(action),
        Commands::Planner { action } => commands::planner::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Habits { action } => commands::habits::run(action),
        Commands::Koan { all } => commands::koan::run(all),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
