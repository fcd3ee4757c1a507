//! Command-line interface for dictask.
//!
//! Provides commands for extracting task drafts from a transcript (file or
//! stdin) and for inspecting the effective vocabulary.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{Clock, FixedClock, SystemClock, Vocabulary};
use crate::domain::TaskDraft;
use crate::pipeline::TaskExtractor;

/// dictask - voice-dictation task extraction
#[derive(Parser, Debug)]
#[command(name = "dictask")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract task drafts from a transcript
    Extract {
        /// Transcript file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Resolve dates against this instant instead of the wall clock
        /// (e.g. 2026-02-19T10:00)
        #[arg(long)]
        now: Option<String>,

        /// Vocabulary pack (YAML); built-in vocabulary if not provided
        #[arg(long, env = "DICTASK_VOCABULARY")]
        vocabulary: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Print the effective vocabulary as YAML
    Vocabulary {
        /// Vocabulary pack (YAML); built-in vocabulary if not provided
        #[arg(long, env = "DICTASK_VOCABULARY")]
        vocabulary: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Table,
    Json,
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Extract {
                input,
                now,
                vocabulary,
                format,
            } => extract_command(input, now, vocabulary, format),
            Commands::Vocabulary { vocabulary } => vocabulary_command(vocabulary),
        }
    }
}

fn extract_command(
    input: Option<PathBuf>,
    now: Option<String>,
    vocabulary: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let vocabulary = load_vocabulary(vocabulary)?;
    let clock: Box<dyn Clock> = match now {
        Some(raw) => Box::new(FixedClock(parse_now(&raw)?)),
        None => Box::new(SystemClock),
    };

    let extractor = TaskExtractor::new(&vocabulary, clock)?;

    let transcript = read_transcript(input)?;
    let drafts = extractor.extract(&transcript);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&drafts)?);
        }
        OutputFormat::Table => print_table(&drafts),
    }

    Ok(())
}

fn vocabulary_command(vocabulary: Option<PathBuf>) -> Result<()> {
    let vocabulary = load_vocabulary(vocabulary)?;
    vocabulary.validate()?;
    print!("{}", serde_yaml::to_string(&vocabulary)?);
    Ok(())
}

fn load_vocabulary(path: Option<PathBuf>) -> Result<Vocabulary> {
    match path {
        Some(path) => Vocabulary::from_file(&path),
        None => Ok(Vocabulary::default()),
    }
}

fn read_transcript(input: Option<PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read transcript file: {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read transcript from stdin")?;
            Ok(buffer)
        }
    }
}

/// Parse the `--now` override; accepts a few common date-time shapes
fn parse_now(raw: &str) -> Result<NaiveDateTime> {
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(instant) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(instant);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(instant) = date.and_hms_opt(0, 0, 0) {
            return Ok(instant);
        }
    }
    anyhow::bail!("Unrecognized --now value: '{}'", raw)
}

fn print_table(drafts: &[TaskDraft]) {
    if drafts.is_empty() {
        println!("No tasks found.");
        return;
    }

    for draft in drafts {
        println!("• {}", draft.title);
        if let Some(due) = draft.due {
            println!("    due:      {}", due.format("%Y-%m-%d %H:%M"));
        }
        if let Some(address) = &draft.address {
            println!("    address:  {}", address);
        }
        println!("    priority: {}", draft.priority.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_now_formats() {
        assert!(parse_now("2026-02-19T10:00").is_ok());
        assert!(parse_now("2026-02-19T10:00:30").is_ok());
        assert!(parse_now("2026-02-19 10:00").is_ok());
        assert!(parse_now("2026-02-19").is_ok());
        assert!(parse_now("yesterday").is_err());
    }

    #[test]
    fn test_cli_parses_extract() {
        let cli = Cli::try_parse_from([
            "dictask",
            "extract",
            "--now",
            "2026-02-19T10:00",
            "--format",
            "json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Extract { .. }));
    }
}
