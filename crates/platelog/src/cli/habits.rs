//! The `platelog habits` command.

use clap::{Args, Subcommand};
use platelog_core::journal::DEFAULT_RECENT_HABIT_LOGS;
use platelog_core::{Config, Journal};

use super::{stdout_writer, FormatArg};

/// Arguments for the `habits` command.
#[derive(Args, Debug)]
pub struct HabitsArgs {
    #[command(subcommand)]
    pub command: HabitsCommand,

    /// Output format [default: output.format]
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<FormatArg>,
}

/// Subcommands for habit tracking.
#[derive(Subcommand, Debug)]
pub enum HabitsCommand {
    /// Add a habit to track
    Add {
        /// Habit name
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// List habits
    List,

    /// Mark a habit as done
    Done {
        /// Habit id (see `platelog habits list`)
        id: i64,

        /// Free-form note
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Show recent habit completions, newest first
    Log {
        /// Number of entries to show
        #[arg(short, long, default_value_t = DEFAULT_RECENT_HABIT_LOGS)]
        limit: u32,
    },
}

/// Execute the habits command.
pub async fn execute(args: HabitsArgs, config: &Config) -> anyhow::Result<()> {
    let journal = Journal::open(&config.journal_path()).await?;
    let mut out = stdout_writer(config, args.format)?;

    match args.command {
        HabitsCommand::Add { name } => {
            let habit = journal.add_habit(&name.join(" ")).await?;
            tracing::info!("Habit added: [{}] {}", habit.id, habit.name);
            out.write(&habit)?;
        }

        HabitsCommand::List => {
            let habits = journal.list_habits().await?;
            if habits.is_empty() {
                eprintln!("No habits yet. Add one with `platelog habits add <NAME>`.");
            }
            out.write_all(&habits)?;
        }

        HabitsCommand::Done { id, note } => {
            let log = journal.log_habit(id, &note).await?;
            tracing::info!("Logged habit {}", id);
            out.write(&log)?;
        }

        HabitsCommand::Log { limit } => {
            let logs = journal.recent_habit_logs(limit).await?;
            if logs.is_empty() {
                eprintln!("No habit logs yet.");
            }
            out.write_all(&logs)?;
        }
    }

    out.flush()?;
    journal.close().await;
    Ok(())
}
