//! The `platelog estimate` command: photo → nutrition estimate.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use platelog_core::coach::meal_feedback_prompt;
use platelog_core::{
    ChatMessage, Coach, CoachReply, Config, Device, Journal, MealEstimate, MealPipeline,
};

use super::{stdout_writer, FormatArg};

/// Arguments for the `estimate` command.
#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Meal photo (JPEG, PNG, WebP, GIF, BMP, TIFF)
    #[arg(required = true)]
    pub image: PathBuf,

    /// Portion mass in grams [default: estimation.default_portion_grams]
    #[arg(short, long)]
    pub grams: Option<f64>,

    /// Where inference runs: cpu or accelerated (alias: cuda)
    #[arg(long, value_parser = parse_device)]
    pub device: Option<Device>,

    /// Number of classifier labels to consider
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Store the estimate in the journal
    #[arg(long)]
    pub log: bool,

    /// Note stored with the logged meal
    #[arg(long, default_value = "")]
    pub note: String,

    /// Output format [default: output.format]
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Ask the coach for feedback on this meal
    #[arg(long)]
    pub coach: bool,
}

fn parse_device(s: &str) -> Result<Device, String> {
    Device::parse(s).ok_or_else(|| format!("unknown device '{s}' (expected cpu or accelerated)"))
}

/// Execute the estimate command.
pub async fn execute(args: EstimateArgs, config: &Config) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("Failed to read {}", args.image.display()))?;

    let grams = args
        .grams
        .unwrap_or(config.estimation.default_portion_grams);
    let device = args.device.unwrap_or(config.classifier.device);
    let top_k = args.top_k.unwrap_or(config.classifier.top_k);

    tracing::info!("Estimating {:?} ({} g, {})", args.image, grams, device);

    // Model load and inference are blocking; keep them off the async workers.
    let pipeline = MealPipeline::new(config).top_k(top_k);
    let estimate = tokio::task::spawn_blocking(move || pipeline.run(&bytes, grams, device))
        .await
        .context("Estimation task panicked")??;

    if args.log {
        let journal = Journal::open(&config.journal_path()).await?;
        let record = journal
            .log_meal(&estimate.to_new_meal(&config.estimation.source, &args.note))
            .await?;
        journal.close().await;
        tracing::info!("Meal logged (id {})", record.id);
    }

    let mut out = stdout_writer(config, args.format)?;
    out.write(&estimate)?;
    out.flush()?;

    if args.coach {
        let coach = Coach::from_config(&config.coach);
        if let Some(reply) = coach_feedback(&coach, &estimate).await {
            out.write(&reply)?;
            out.flush()?;
        }
    }

    Ok(())
}

/// Ask the coach about an estimate. A failed call is logged and skipped so
/// the command still succeeds with the estimate it already printed.
async fn coach_feedback(coach: &Coach, estimate: &MealEstimate) -> Option<CoachReply> {
    let prompt = ChatMessage::user(meal_feedback_prompt(estimate));
    match coach.chat(&[prompt], None, None).await {
        Ok(reply) => Some(reply),
        Err(e) => {
            tracing::warn!("Coach feedback failed: {e}");
            None
        }
    }
}
