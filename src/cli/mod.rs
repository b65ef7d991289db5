//! CLI Module
//!
//! Command-line front end: loads a WAV file into an edit session, applies
//! one operation and writes the result.

pub mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::engine::FadeKind;

/// Wavedit - sample-accurate WAV editing
#[derive(Parser, Debug)]
#[command(name = "wavedit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Input, output and selection shared by the editing commands
#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Input WAV file
    pub input: PathBuf,

    /// Output WAV file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Selection start in seconds
    #[arg(long)]
    pub start: Option<f64>,

    /// Selection end in seconds
    #[arg(long)]
    pub end: Option<f64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeArg {
    In,
    Out,
}

impl From<FadeArg> for FadeKind {
    fn from(arg: FadeArg) -> Self {
        match arg {
            FadeArg::In => FadeKind::In,
            FadeArg::Out => FadeKind::Out,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the session state of a WAV file as JSON
    #[command(name = "info")]
    Info {
        /// Input WAV file
        input: PathBuf,
    },

    /// Keep only the selected range
    #[command(name = "trim")]
    Trim {
        #[command(flatten)]
        args: EditArgs,
    },

    /// Delete the selected range
    #[command(name = "delete")]
    Delete {
        #[command(flatten)]
        args: EditArgs,
    },

    /// Split into two clips and print the resulting clip list
    #[command(name = "split")]
    Split {
        #[command(flatten)]
        args: EditArgs,

        /// Playhead position in seconds, used when no selection is given
        #[arg(long)]
        at: Option<f64>,
    },

    /// Peak-normalize the selection or the whole file
    #[command(name = "normalize")]
    Normalize {
        #[command(flatten)]
        args: EditArgs,
    },

    /// Apply a linear fade to the selection or the whole file
    #[command(name = "fade")]
    Fade {
        #[command(flatten)]
        args: EditArgs,

        /// Fade direction
        #[arg(long, value_enum)]
        kind: FadeArg,
    },

    /// Export the selection (or the whole file) as 16-bit WAV
    #[command(name = "export")]
    Export {
        #[command(flatten)]
        args: EditArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fade() {
        let cli = Cli::try_parse_from([
            "wavedit", "fade", "in.wav", "-o", "out.wav", "--kind", "out", "--start", "1.5",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Fade { args, kind }) => {
                assert_eq!(kind, FadeArg::Out);
                assert_eq!(args.start, Some(1.5));
                assert_eq!(args.end, None);
                assert_eq!(args.output, PathBuf::from("out.wav"));
            }
            other => panic!("Expected fade command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli =
            Cli::try_parse_from(["wavedit", "info", "a.wav", "--verbose", "--config", "c.json"])
                .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
    }

    #[test]
    fn test_output_required_for_edits() {
        assert!(Cli::try_parse_from(["wavedit", "trim", "in.wav"]).is_err());
    }
}
