//! Local Ollama-backed extraction provider, plus the mock used in tests.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::parser::parse_extraction_response;
use super::prompt::EXTRACTION_SYSTEM_PROMPT;
use super::provider::{CancelFlag, ExtractionProvider, InvocationError, ProviderResponse};
use super::schema::{ExtractionResult, SchemaDescriptor};

/// Extraction provider speaking to a local Ollama instance over HTTP.
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
    temperature: f32,
    max_tokens: u32,
}

impl OllamaProvider {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, InvocationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| InvocationError::Provider {
                status: 0,
                message: format!("HTTP client construction failed: {e}"),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
            temperature: 0.2,
            max_tokens: 2048,
        })
    }

    /// Default Ollama instance at localhost:11434 with 5-minute timeout.
    pub fn default_local() -> Result<Self, InvocationError> {
        Self::new("http://localhost:11434", 300)
    }

    pub fn with_generation_options(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    prompt_eval_count: Option<u64>,
    eval_count: Option<u64>,
}

impl ExtractionProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn extract(
        &self,
        model: &str,
        prompt: &str,
        _schema: &SchemaDescriptor,
        cancel: &CancelFlag,
    ) -> Result<ProviderResponse, InvocationError> {
        // Once the request is sent the call may bill; only bail out before.
        if cancel.is_cancelled() {
            return Err(InvocationError::Cancelled);
        }

        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model,
            prompt,
            system: EXTRACTION_SYSTEM_PROMPT,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };

        let started = Instant::now();
        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_timeout() {
                InvocationError::Timeout {
                    secs: self.timeout_secs,
                }
            } else if e.is_connect() {
                InvocationError::Provider {
                    status: 0,
                    message: format!("Cannot reach Ollama at {}", self.base_url),
                }
            } else {
                InvocationError::Provider {
                    status: 0,
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(InvocationError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(InvocationError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| InvocationError::InvalidResponse(e.to_string()))?;
        let latency_ms = started.elapsed().as_millis() as u64;

        let extraction = parse_extraction_response(&parsed.response)?;

        Ok(ProviderResponse {
            extraction,
            input_tokens: parsed.prompt_eval_count.unwrap_or(0),
            output_tokens: parsed.eval_count.unwrap_or(0),
            latency_ms,
        })
    }
}

/// Mock provider for tests. Replays a scripted sequence of outcomes.
pub struct MockProvider {
    script: std::sync::Mutex<std::collections::VecDeque<Result<ProviderResponse, InvocationError>>>,
    pub calls: std::sync::Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            script: std::sync::Mutex::new(std::collections::VecDeque::new()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response with the given extraction and token counts.
    pub fn then_ok(self, extraction: ExtractionResult, input_tokens: u64, output_tokens: u64) -> Self {
        self.script.lock().unwrap().push_back(Ok(ProviderResponse {
            extraction,
            input_tokens,
            output_tokens,
            latency_ms: 42,
        }));
        self
    }

    /// Queue a failure.
    pub fn then_err(self, err: InvocationError) -> Self {
        self.script.lock().unwrap().push_back(Err(err));
        self
    }

    /// Models the provider was asked to run, in call order.
    pub fn models_called(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn extract(
        &self,
        model: &str,
        _prompt: &str,
        _schema: &SchemaDescriptor,
        cancel: &CancelFlag,
    ) -> Result<ProviderResponse, InvocationError> {
        if cancel.is_cancelled() {
            return Err(InvocationError::Cancelled);
        }
        self.calls.lock().unwrap().push(model.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(InvocationError::Provider {
                status: 0,
                message: "mock script exhausted".into(),
            }))
    }
}
