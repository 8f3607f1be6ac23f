//! Platelog CLI - meal photo → nutrition estimates, habit tracking, and a coach.
//!
//! # Usage
//!
//! ```bash
//! # Download the classifier once
//! platelog models download
//!
//! # Estimate a meal and log it
//! platelog estimate lunch.jpg --grams 250 --log
//!
//! # Track habits
//! platelog habits add "drink water"
//! platelog habits done 1
//!
//! # Ask the coach
//! platelog coach "I ate a lot of pizza today, help me stay motivated"
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Platelog - estimate meal nutrition from photos and track habits.
#[derive(Parser, Debug)]
#[command(name = "platelog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate calories and macros from a meal photo
    Estimate(cli::estimate::EstimateArgs),

    /// Show or add logged meals
    Meals(cli::meals::MealsArgs),

    /// Manage and log habits
    Habits(cli::habits::HabitsArgs),

    /// Chat with the habit coach
    Coach(cli::coach::CoachArgs),

    /// Manage the classifier model (download, list, etc.)
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match platelog_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `platelog config path`."
            );
            platelog_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Platelog v{}", platelog_core::VERSION);

    match cli.command {
        Commands::Estimate(args) => cli::estimate::execute(args, &config).await,
        Commands::Meals(args) => cli::meals::execute(args, &config).await,
        Commands::Habits(args) => cli::habits::execute(args, &config).await,
        Commands::Coach(args) => cli::coach::execute(args, &config).await,
        Commands::Models(args) => cli::models::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
