//! The `platelog coach` command: chat with the habit coach.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use platelog_core::coach::Conversation;
use platelog_core::{ChatMessage, Coach, CoachReply, Config};

use super::{stdout_writer, FormatArg};

/// Arguments for the `coach` command.
#[derive(Args, Debug)]
pub struct CoachArgs {
    /// What to tell the coach
    #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
    pub message: Vec<String>,

    /// Chat model [default: coach.model]
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature [default: coach.temperature]
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Continue the conversation saved in this JSON file (created if missing)
    #[arg(long)]
    pub session: Option<PathBuf>,

    /// Output format [default: text]
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

/// Execute the coach command.
pub async fn execute(args: CoachArgs, config: &Config) -> anyhow::Result<()> {
    if let Some(t) = args.temperature {
        if !(0.0..=2.0).contains(&t) {
            anyhow::bail!("--temperature must be between 0 and 2, got {t}");
        }
    }

    let coach = Coach::from_config(&config.coach);
    let mut conversation = match &args.session {
        Some(path) => Conversation::load(path)
            .with_context(|| format!("Failed to read coach session {}", path.display()))?,
        None => Conversation::default(),
    };

    let message = ChatMessage::user(args.message.join(" "));
    let reply = coach
        .chat(
            &conversation.with_turn(&message),
            args.model.as_deref(),
            args.temperature,
        )
        .await?;

    if let Some(path) = &args.session {
        conversation.record(message, &reply);
        conversation
            .save(path)
            .with_context(|| format!("Failed to save coach session {}", path.display()))?;
    }

    if let CoachReply::Unavailable { reason } = &reply {
        tracing::warn!("{reason}");
    }

    let mut out = stdout_writer(config, Some(args.format.unwrap_or(FormatArg::Text)))?;
    out.write(&reply)?;
    out.flush()?;
    Ok(())
}
