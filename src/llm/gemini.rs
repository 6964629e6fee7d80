use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Settings;
use crate::llm::client::{CompletionRequest, SamplingParams, Summarizer};
use crate::llm::prompts::build_segment_prompt;
use crate::{RecapError, Result};

const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
    sampling: SamplingParams,
    max_retries: u32,
}

impl GeminiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.llm.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(RecapError::Config(
                "Gemini API key is missing. Set llm.api_key in config or RECAP_GEMINI_API_KEY."
                    .to_string(),
            ));
        }

        let model = if settings.llm.model.trim().is_empty() {
            DEFAULT_GEMINI_MODEL.to_string()
        } else {
            settings.llm.model.trim().to_string()
        };

        let endpoint = if settings.llm.endpoint.trim().is_empty() {
            DEFAULT_GEMINI_ENDPOINT.to_string()
        } else {
            settings
                .llm
                .endpoint
                .trim()
                .trim_end_matches('/')
                .to_string()
        };

        Ok(Self {
            http: Client::builder()
                .timeout(Duration::from_secs(settings.llm.timeout_secs))
                .build()
                .map_err(|e| {
                    RecapError::Config(format!("Failed to build Gemini HTTP client: {e}"))
                })?,
            api_key,
            model,
            endpoint,
            sampling: SamplingParams::from_settings(settings),
            max_retries: settings.llm.max_retries,
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }

    async fn complete_once(&self, prompt: &str) -> Result<String> {
        let body = GeminiGenerateContentRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.sampling.temperature,
                max_output_tokens: self.sampling.max_output_tokens,
                top_p: self.sampling.top_p,
                frequency_penalty: self.sampling.frequency_penalty,
                presence_penalty: self.sampling.presence_penalty,
            },
        };

        let response = self
            .http
            .post(self.request_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| RecapError::Remote {
                status: None,
                message: format!("Gemini request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Gemini wraps failures in {"error": {"message": ...}}; fall
            // back to the raw body when the shape differs.
            let message = serde_json::from_str::<GeminiErrorResponse>(&body)
                .ok()
                .and_then(|payload| payload.error)
                .map(|detail| detail.message)
                .unwrap_or(body);
            return Err(RecapError::Remote {
                status: Some(status.as_u16()),
                message: format!("Gemini returned an error status: {message}"),
            });
        }

        let payload: GeminiGenerateContentResponse =
            response.json().await.map_err(|e| {
                RecapError::MalformedResponse(format!("Failed to parse Gemini response: {e}"))
            })?;

        payload
            .candidates
            .iter()
            .flat_map(|c| c.content.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                RecapError::MalformedResponse(
                    "Gemini response did not contain summary text".to_string(),
                )
            })
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String> {
        let prompt = build_segment_prompt(request.instructions, request.context, request.text);

        let mut backoff = INITIAL_BACKOFF;
        let mut attempt = 0;

        loop {
            match self.complete_once(&prompt).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Transient Gemini failure (attempt {}/{}), retrying in {:?}: {}",
                        attempt,
                        self.max_retries,
                        backoff,
                        err
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct GeminiGenerateContentRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiGenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContentResponse,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn gemini_ok_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        })
        .to_string()
    }

    fn gemini_error_body(message: &str) -> String {
        serde_json::json!({"error": {"message": message, "status": "FAILED"}}).to_string()
    }

    /// Serves the scripted (status, body) responses one connection at a
    /// time, counting how many requests arrived.
    async fn spawn_scripted_server(responses: Vec<(u16, String)>) -> (u16, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 65536];
                let _ = stream.read(&mut buf).await.unwrap();
                counter.fetch_add(1, Ordering::SeqCst);

                let reason = match status {
                    200 => "OK",
                    401 => "Unauthorized",
                    429 => "Too Many Requests",
                    _ => "Internal Server Error",
                };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\n\
                     Content-Type: application/json\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.flush().await.unwrap();
            }
        });

        (port, calls)
    }

    fn client_for(port: u16, max_retries: u32) -> GeminiClient {
        let mut settings = Settings::default();
        settings.llm.api_key = "test-key".to_string();
        settings.llm.endpoint = format!("http://127.0.0.1:{port}");
        settings.llm.max_retries = max_retries;
        settings.llm.timeout_secs = 5;
        GeminiClient::from_settings(&settings).unwrap()
    }

    fn request() -> CompletionRequest<'static> {
        CompletionRequest {
            instructions: "Summarize.",
            context: "",
            text: "hello world",
        }
    }

    #[tokio::test]
    async fn rate_limited_call_succeeds_after_retry() {
        let (port, calls) = spawn_scripted_server(vec![
            (429, gemini_error_body("quota exceeded")),
            (200, gemini_ok_body("all good")),
        ])
        .await;

        let client = client_for(port, 3);
        let summary = client.complete(request()).await.unwrap();

        assert_eq!(summary, "all good");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn auth_failure_is_not_retried() {
        let (port, calls) =
            spawn_scripted_server(vec![(401, gemini_error_body("API key not valid"))]).await;

        let client = client_for(port, 3);
        let err = client.complete(request()).await.unwrap_err();

        match err {
            RecapError::Remote { status, message } => {
                assert_eq!(status, Some(401));
                assert!(message.contains("API key not valid"), "got: {message}");
            }
            other => panic!("expected remote error, got: {other}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_stay_within_the_configured_bound() {
        let (port, calls) = spawn_scripted_server(vec![
            (500, gemini_error_body("internal")),
            (500, gemini_error_body("internal")),
        ])
        .await;

        let client = client_for(port, 1);
        let err = client.complete(request()).await.unwrap_err();

        assert!(matches!(
            err,
            RecapError::Remote {
                status: Some(500),
                ..
            }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}

