//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// recap - Segment long transcripts and produce AI-powered combined summaries
#[derive(Parser, Debug)]
#[command(name = "recap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a transcript file
    Summarize {
        /// Path to the transcript text file
        input: PathBuf,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable key-phrase context carry-forward between segments
        #[arg(long)]
        no_context: bool,

        /// Issue a final aggregation call over all segment summaries
        #[arg(long)]
        aggregate: bool,

        /// Override the per-segment character budget
        #[arg(long)]
        max_characters: Option<usize>,
    },

    /// Segment a transcript file and print the labeled segments
    Segments {
        /// Path to the transcript text file
        input: PathBuf,

        /// Override the per-segment character budget
        #[arg(long)]
        max_characters: Option<usize>,

        /// Use fixed-size windows instead of sentence-aware cuts
        #[arg(long)]
        fixed: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
