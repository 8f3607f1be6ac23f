//! Output formatting for estimates and journal rows.
//!
//! Machine formats (JSON, JSON Lines) go through serde; the text format uses
//! each type's [`Render`] one-liner for terminal use.

use serde::Serialize;
use std::io::{self, Write};

use crate::coach::CoachReply;
use crate::journal::{Habit, HabitLog, MealRecord};
use crate::types::MealEstimate;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
    /// Human-readable text
    Text,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            "text" | "plain" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Human-readable rendering for the text output format.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for MealEstimate {
    fn render(&self) -> String {
        let n = &self.nutrients;
        format!(
            "Detected: {} (confidence {:.2})\n\
             Portion: {} g\n\
             Estimated: {} kcal | carbs {} g | protein {} g | fat {} g\n\
             {}",
            self.food.food,
            self.food.confidence,
            self.portion_grams,
            n.kcal,
            n.carbs_g,
            n.protein_g,
            n.fat_g,
            n.notes
        )
    }
}

impl Render for MealRecord {
    fn render(&self) -> String {
        let mut line = format!(
            "{}: {} - {} kcal ({} g)",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.food,
            self.kcal,
            self.grams
        );
        if !self.note.is_empty() {
            line.push_str(&format!(". Note: {}", self.note));
        }
        line
    }
}

impl Render for Habit {
    fn render(&self) -> String {
        format!("[{}] {}", self.id, self.name)
    }
}

impl Render for HabitLog {
    fn render(&self) -> String {
        format!(
            "{}: habit_id={} note={}",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.habit_id,
            self.note
        )
    }
}

impl Render for CoachReply {
    fn render(&self) -> String {
        match self {
            CoachReply::Text(response) => format!("Coach: {}", response.text),
            CoachReply::Unavailable { reason } => format!("Coach unavailable: {reason}"),
        }
    }
}

/// A writer that emits items as JSON, JSONL, or text.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects the JSON format.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write a single item.
    pub fn write<T: Serialize + Render>(&mut self, item: &T) -> io::Result<()> {
        match self.format {
            OutputFormat::Json if self.pretty => {
                serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
            }
            OutputFormat::Json | OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
            }
            OutputFormat::Text => {
                write!(self.writer, "{}", item.render())?;
            }
        }
        writeln!(self.writer)
    }

    /// Write a list of items.
    ///
    /// JSON writes one array; JSONL and text write one item per line.
    pub fn write_all<T: Serialize + Render>(&mut self, items: &[T]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, items)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, items).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
            }
            OutputFormat::JsonLines | OutputFormat::Text => {
                for item in items {
                    self.write(item)?;
                }
            }
        }
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn habits() -> Vec<Habit> {
        let created_at = Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap();
        vec![
            Habit {
                id: 1,
                name: "drink water".to_string(),
                created_at,
            },
            Habit {
                id: 2,
                name: "walk".to_string(),
                created_at,
            },
        ]
    }

    fn render_with(format: OutputFormat, pretty: bool, items: &[Habit]) -> String {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, format, pretty);
        writer.write_all(items).unwrap();
        writer.flush().unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_write_json() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);
        writer.write(&habits()[0]).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("\"name\":\"drink water\""));
        assert!(output.contains("\"id\":1"));
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_write_all_json_array() {
        let output = render_with(OutputFormat::Json, false, &habits());
        assert!(output.starts_with('['));
        assert!(output.trim().ends_with(']'));
    }

    #[test]
    fn test_write_all_jsonl() {
        let output = render_with(OutputFormat::JsonLines, true, &habits());
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("\"walk\""));
    }

    #[test]
    fn test_write_all_text() {
        let output = render_with(OutputFormat::Text, false, &habits());
        assert_eq!(output, "[1] drink water\n[2] walk\n");
    }

    #[test]
    fn test_render_meal_record() {
        let mut record = MealRecord {
            id: 7,
            food: "pizza".to_string(),
            grams: 200.0,
            kcal: 532.0,
            carbs_g: 53.2,
            protein_g: 20.0,
            fat_g: 26.6,
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 5, 0).unwrap(),
            source: "image_estimate".to_string(),
            note: String::new(),
        };
        assert_eq!(record.render(), "2026-03-01 12:05: pizza - 532 kcal (200 g)");

        record.note = "shared".to_string();
        assert!(record.render().ends_with(". Note: shared"));
    }

    #[test]
    fn test_render_unavailable_coach() {
        let reply = CoachReply::Unavailable {
            reason: "no key".to_string(),
        };
        assert_eq!(reply.render(), "Coach unavailable: no key");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("JSONL"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("invalid"), None);
    }
}
