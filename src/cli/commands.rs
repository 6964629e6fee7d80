//! CLI command implementations

use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::pipeline::{ProgressCallback, SequentialSummaryPipeline};
use crate::segment::{segment, segment_fixed, Segment};

/// Summarize a transcript file through the sequential pipeline
pub async fn summarize_transcript(
    settings: &Settings,
    input: &Path,
    output: Option<&Path>,
    no_context: bool,
    aggregate: bool,
    max_characters: Option<usize>,
) -> Result<()> {
    let mut settings = settings.clone();
    if no_context {
        settings.summary.carry_context = false;
    }
    if aggregate {
        settings.summary.aggregate = true;
    }
    if let Some(max) = max_characters {
        settings.summary.max_characters = max;
    }

    let transcript = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read transcript: {}", input.display()))?;

    let pipeline = SequentialSummaryPipeline::from_settings(&settings)?;

    let progress: ProgressCallback = Box::new(|index, total| {
        eprintln!("Summarizing segment {index}/{total}...");
    });

    let combined = match pipeline.run(&transcript, Some(progress)).await {
        Ok(combined) => combined,
        Err(err) => {
            // Surface what completed before the failure, clearly marked as
            // partial, then report the failing stage.
            let partial = err.partial();
            if !partial.is_empty() {
                eprintln!();
                eprintln!("Partial output ({} segments completed):", partial.len());
                for part in partial {
                    eprintln!();
                    eprintln!("Part {} Summary:", part.index);
                    eprintln!("{}", part.text);
                }
                eprintln!();
            }
            anyhow::bail!("{err}");
        }
    };

    if combined.parts.is_empty() {
        println!("Transcript is empty; nothing to summarize.");
        return Ok(());
    }

    let rendered = combined.render();
    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write summary: {}", path.display()))?;
            println!("Combined summary saved to: {}", path.display());
        }
        None => {
            println!("{rendered}");
        }
    }

    Ok(())
}

/// Segment a transcript file and print the labeled segments
pub fn dump_segments(
    settings: &Settings,
    input: &Path,
    max_characters: Option<usize>,
    fixed: bool,
) -> Result<()> {
    let mut settings = settings.clone();
    if let Some(max) = max_characters {
        settings.summary.max_characters = max;
    }
    let budget = settings.effective_max_characters()?;

    let transcript = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read transcript: {}", input.display()))?;

    let segments = if fixed {
        segment_fixed(&transcript, budget)?
    } else {
        segment(&transcript, budget)?
    };

    if segments.is_empty() {
        println!("Transcript is empty; no segments.");
        return Ok(());
    }

    print!("{}", render_segments(&segments));
    Ok(())
}

/// Handle configuration subcommands
pub fn handle_config(settings: &Settings, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let content = toml::to_string_pretty(settings)?;
            println!("{}", content);
        }
        ConfigCommand::Path => {
            println!("{}", Settings::config_path()?.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Config written to: {}", path.display());
        }
    }
    Ok(())
}

/// Labeled segment dump, one "Segment i:" block per segment
fn render_segments(segments: &[Segment]) -> String {
    let mut out = String::new();
    for (i, seg) in segments.iter().enumerate() {
        out.push_str(&format!("Segment {}:\n{}\n\n", i + 1, seg.text));
    }
    out
}
