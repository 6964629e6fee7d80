//! recap - A lightweight CLI tool for segmenting long transcripts and
//! producing AI-powered combined summaries
//!
//! The core is a deterministic, sentence-aware segmenter plus a strictly
//! sequential summarization pipeline that carries key-phrase context from
//! one segment's summary into the next prompt.

pub mod cli;
pub mod config;
pub mod keyphrase;
pub mod llm;
pub mod pipeline;
pub mod segment;

use thiserror::Error;

/// Main error type for recap
#[derive(Error, Debug)]
pub enum RecapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote service error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Remote {
        /// HTTP status when the service answered; None for transport errors.
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecapError {
    /// Whether a retry with backoff is worthwhile.
    ///
    /// Transport errors (timeouts, connection resets) and 408/429/5xx answers
    /// are transient; auth and invalid-request failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            RecapError::Remote { status, .. } => match status {
                None => true,
                Some(code) => *code == 408 || *code == 429 || *code >= 500,
            },
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, RecapError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "recap";
