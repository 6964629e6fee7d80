//! Sequential summarization pipeline orchestration
//!
//! Segments a transcript, summarizes each segment in order through the
//! remote completion service, threads key-phrase context between calls, and
//! assembles the labeled combined summary. Strictly sequential: each prompt
//! depends on the previous call's output.

use thiserror::Error;

use crate::config::Settings;
use crate::keyphrase::{HeuristicExtractor, KeyPhraseExtractor};
use crate::llm::{build_provider, CompletionRequest, Summarizer};
use crate::segment::segment;
use crate::{RecapError, Result};

/// Progress callback type, called with (current 1-based index, total)
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// The summary of one segment, tagged with its 1-based index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSummary {
    pub index: usize,
    pub text: String,
}

/// Ordered concatenation of all segment summaries, optionally followed by a
/// top-level aggregate. The pipeline's terminal artifact; only produced when
/// every segment succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedSummary {
    pub parts: Vec<SegmentSummary>,
    pub aggregate: Option<String>,
}

impl CombinedSummary {
    /// Labeled text form: one "Part i Summary:" block per segment, aggregate
    /// appended when present.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            out.push_str(&format!("Part {} Summary:\n{}\n\n", part.index, part.text));
        }
        if let Some(aggregate) = &self.aggregate {
            out.push_str(&format!("Final Summary:\n{aggregate}\n"));
        }
        out
    }
}

/// Pipeline failure, carrying the summaries completed before it as a
/// distinct partial artifact. Each stage of the run fails differently:
/// segmentation before any remote call, a segment tagged with its 1-based
/// index, or the final aggregation call after every segment succeeded.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Segmentation failed: {source}")]
    Segmentation { source: RecapError },

    #[error("Segment {index} failed: {source}")]
    Segment {
        index: usize,
        partial: Vec<SegmentSummary>,
        source: RecapError,
    },

    #[error("Aggregation failed: {source}")]
    Aggregation {
        partial: Vec<SegmentSummary>,
        source: RecapError,
    },
}

impl PipelineError {
    /// The summaries completed before the failure, in segment order.
    pub fn partial(&self) -> &[SegmentSummary] {
        match self {
            PipelineError::Segmentation { .. } => &[],
            PipelineError::Segment { partial, .. } | PipelineError::Aggregation { partial, .. } => {
                partial
            }
        }
    }
}

/// Pipeline configuration, independent of any collaborator.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Per-segment character budget
    pub max_characters: usize,

    /// Feed key phrases from each summary into the next prompt
    pub carry_context: bool,

    /// Issue one final aggregation call over all segment summaries
    pub aggregate: bool,
}

impl PipelineOptions {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            max_characters: settings.effective_max_characters()?,
            carry_context: settings.summary.carry_context,
            aggregate: settings.summary.aggregate,
        })
    }
}

/// Sequential summarization pipeline over a summarizer and a key-phrase
/// extractor.
pub struct SequentialSummaryPipeline {
    summarizer: Box<dyn Summarizer>,
    extractor: Box<dyn KeyPhraseExtractor>,
    instructions: String,
    options: PipelineOptions,
}

impl SequentialSummaryPipeline {
    /// Create a pipeline. Fails fast on a non-positive character budget so a
    /// degenerate configuration never reaches the remote service.
    pub fn new(
        summarizer: Box<dyn Summarizer>,
        extractor: Box<dyn KeyPhraseExtractor>,
        instructions: String,
        options: PipelineOptions,
    ) -> Result<Self> {
        if options.max_characters == 0 {
            return Err(RecapError::Config(
                "max_characters must be positive".to_string(),
            ));
        }

        Ok(Self {
            summarizer,
            extractor,
            instructions,
            options,
        })
    }

    /// Build a pipeline from runtime settings with the default collaborators.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            build_provider(settings)?,
            Box::new(HeuristicExtractor::default()),
            settings.summary.instructions.clone(),
            PipelineOptions::from_settings(settings)?,
        )
    }

    /// Run the pipeline over a transcript. An empty transcript yields an
    /// empty combined summary without any remote call.
    pub async fn run(
        &self,
        transcript: &str,
        progress: Option<ProgressCallback>,
    ) -> std::result::Result<CombinedSummary, PipelineError> {
        let segments = segment(transcript, self.options.max_characters)
            .map_err(|source| PipelineError::Segmentation { source })?;

        let total = segments.len();
        let mut parts: Vec<SegmentSummary> = Vec::with_capacity(total);
        let mut context = String::new();

        for (i, seg) in segments.iter().enumerate() {
            let index = i + 1;
            tracing::info!("Summarizing segment {}/{}", index, total);
            if let Some(cb) = &progress {
                cb(index, total);
            }

            let summary = match self
                .summarizer
                .complete(CompletionRequest {
                    instructions: &self.instructions,
                    context: &context,
                    text: &seg.text,
                })
                .await
            {
                Ok(text) => text,
                Err(source) => {
                    tracing::error!("Segment {}/{} failed: {}", index, total, source);
                    return Err(PipelineError::Segment {
                        index,
                        partial: parts,
                        source,
                    });
                }
            };

            if self.options.carry_context {
                context = self.extractor.extract(&summary);
            }

            parts.push(SegmentSummary {
                index,
                text: summary,
            });
        }

        let aggregate = if self.options.aggregate && !parts.is_empty() {
            tracing::info!("Aggregating {} segment summaries", total);
            let joined = parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");

            match self
                .summarizer
                .complete(CompletionRequest {
                    instructions: "",
                    context: "",
                    text: &joined,
                })
                .await
            {
                Ok(text) => Some(text),
                Err(source) => {
                    tracing::error!("Aggregation failed: {}", source);
                    return Err(PipelineError::Aggregation {
                        partial: parts,
                        source,
                    });
                }
            }
        } else {
            None
        };

        Ok(CombinedSummary { parts, aggregate })
    }
}
