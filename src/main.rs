//! recap - Transcript segmentation and AI-powered combined summaries
//!
//! Entry point for the recap CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recap::cli::{Cli, Commands};
use recap::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            recap::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;

            match command {
                Commands::Summarize {
                    input,
                    output,
                    no_context,
                    aggregate,
                    max_characters,
                } => {
                    recap::cli::commands::summarize_transcript(
                        &settings,
                        &input,
                        output.as_deref(),
                        no_context,
                        aggregate,
                        max_characters,
                    )
                    .await?;
                }
                Commands::Segments {
                    input,
                    max_characters,
                    fixed,
                } => {
                    recap::cli::commands::dump_segments(&settings, &input, max_characters, fixed)?;
                }
                Commands::Config(config_command) => {
                    recap::cli::commands::handle_config(&settings, config_command)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
