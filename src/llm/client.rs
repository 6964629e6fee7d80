use async_trait::async_trait;

use crate::config::Settings;
use crate::llm::gemini::GeminiClient;
use crate::{RecapError, Result};

/// Sampling parameters forwarded to the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl SamplingParams {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            temperature: settings.llm.temperature,
            max_output_tokens: settings.llm.max_output_tokens,
            top_p: settings.llm.top_p,
            frequency_penalty: settings.llm.frequency_penalty,
            presence_penalty: settings.llm.presence_penalty,
        }
    }
}

/// One completion request: fixed instructions, the carried-forward context
/// hint (empty for the first segment) and the text to summarize.
pub struct CompletionRequest<'a> {
    pub instructions: &'a str,
    pub context: &'a str,
    pub text: &'a str,
}

/// Remote completion service: text in, text out, subject to latency and
/// failure. Implementations own their retry policy.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String>;
}

/// Build a summarizer provider from runtime settings.
pub fn build_provider(settings: &Settings) -> Result<Box<dyn Summarizer>> {
    match settings.llm.provider.to_lowercase().as_str() {
        "gemini" => Ok(Box::new(GeminiClient::from_settings(settings)?)),
        other => Err(RecapError::Config(format!(
            "Unsupported llm.provider '{other}'. Supported providers: gemini"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn unsupported_provider_returns_error() {
        let mut settings = Settings::default();
        settings.llm.provider = "unknown".to_string();

        let err = match build_provider(&settings) {
            Ok(_) => panic!("expected provider creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("Unsupported llm.provider"));
    }

    #[test]
    fn gemini_provider_requires_api_key() {
        let settings = Settings::default();

        let err = match build_provider(&settings) {
            Ok(_) => panic!("expected provider creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("Gemini API key is missing"));
    }

    #[test]
    fn sampling_params_come_from_settings() {
        let mut settings = Settings::default();
        settings.llm.temperature = 0.2;
        settings.llm.max_output_tokens = 300;

        let params = SamplingParams::from_settings(&settings);
        assert_eq!(params.temperature, 0.2);
        assert_eq!(params.max_output_tokens, 300);
        assert_eq!(params.top_p, 1.0);
    }
}
