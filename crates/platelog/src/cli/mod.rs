//! Command implementations.

pub mod coach;
pub mod config;
pub mod estimate;
pub mod habits;
pub mod meals;
pub mod models;

use clap::ValueEnum;
use platelog_core::{Config, OutputFormat, OutputWriter};

/// Output format flag shared by commands that print records.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
    /// Human-readable lines
    Text,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Jsonl => OutputFormat::JsonLines,
            FormatArg::Text => OutputFormat::Text,
        }
    }
}

/// Writer on stdout using the flag if given, else `[output]` from config.
pub fn stdout_writer(
    config: &Config,
    format: Option<FormatArg>,
) -> anyhow::Result<OutputWriter<std::io::StdoutLock<'static>>> {
    let format = match format {
        Some(arg) => arg.into(),
        None => OutputFormat::parse(&config.output.format).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown output format '{}' in config (expected json, jsonl, or text)",
                config.output.format
            )
        })?,
    };
    Ok(OutputWriter::new(
        std::io::stdout().lock(),
        format,
        config.output.pretty,
    ))
}
