//! Command-line interface for audioscribe
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Resumable batch speech-to-text for long recordings
#[derive(Parser, Debug)]
#[command(
    name = "audioscribe",
    version,
    about = "Resumable batch speech-to-text for long recordings"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Audio file to transcribe, or a directory to pick one from
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Write the transcript here instead of beside the input
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Recognition service endpoint URL
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Language hint for the recognition service (e.g., en, de, fr)
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Per-request service timeout. Examples: 30s, 90s, 2m
    #[arg(long, value_name = "DURATION", value_parser = parse_timeout_secs)]
    pub timeout: Option<u64>,

    /// Discard saved progress and start from the beginning
    #[arg(long)]
    pub fresh: bool,

    /// Suppress progress output (skipped chunks are still reported)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: per-chunk timings)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse a timeout duration string into seconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`30s`, `2m`), and compound (`1m30s`).
fn parse_timeout_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs())
        .map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["audioscribe", "talk.wav"]).unwrap();
        assert_eq!(cli.path, Some(PathBuf::from("talk.wav")));
        assert!(cli.command.is_none());
        assert!(!cli.fresh);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "audioscribe",
            "talk.wav",
            "--output",
            "/tmp/out.txt",
            "--endpoint",
            "https://stt.example.com",
            "--language",
            "de",
            "--timeout",
            "2m",
            "--fresh",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.output, Some(PathBuf::from("/tmp/out.txt")));
        assert_eq!(cli.endpoint.as_deref(), Some("https://stt.example.com"));
        assert_eq!(cli.language.as_deref(), Some("de"));
        assert_eq!(cli.timeout, Some(120));
        assert!(cli.fresh);
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_completions_subcommand() {
        let cli = Cli::try_parse_from(["audioscribe", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Bash })
        ));
    }

    #[test]
    fn test_timeout_bare_number_is_seconds() {
        assert_eq!(parse_timeout_secs("45"), Ok(45));
    }

    #[test]
    fn test_timeout_humantime_formats() {
        assert_eq!(parse_timeout_secs("30s"), Ok(30));
        assert_eq!(parse_timeout_secs("2m"), Ok(120));
        assert_eq!(parse_timeout_secs("1m30s"), Ok(90));
    }

    #[test]
    fn test_timeout_invalid_is_error() {
        assert!(parse_timeout_secs("soon").is_err());
    }
}
