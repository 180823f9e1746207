use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

use super::error::LlmError;
use super::message::ChatMessage;
use super::rate_limit::RateLimiter;

/// Upper bound on automatic retries, whatever a feature profile asks for.
pub const MAX_RETRIES: u8 = 2;

const BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Per-call request settings.
///
/// Each bot feature (welcome, goodbye, translation, chat) carries its own
/// options so one exhausted provider key does not stop the others.
#[derive(Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.groq.com/openai/v1`.
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub timeout: Duration,
    /// Extra attempts after a timeout or provider failure, capped at [`MAX_RETRIES`].
    pub retries: u8,
}

impl fmt::Debug for GenerateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerateOptions")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .finish()
    }
}

/// Anything that can turn a prompt into text.
///
/// [`LlmClient`] is the production implementation; tests substitute fakes.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &[ChatMessage],
        options: &GenerateOptions,
    ) -> Result<String, LlmError>;
}

// Use Cow to avoid cloning strings that are only borrowed for serialization
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Snapshot of request outcomes since startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LlmStats {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub last_error: Option<String>,
}

impl LlmStats {
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.successful as f64 / self.total as f64 * 100.0
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    total: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
    last_error: Mutex<Option<String>>,
}

/// Chat-completion client shared by every feature of the bot.
pub struct LlmClient {
    client: Client,
    limiter: Arc<RateLimiter>,
    counters: Counters,
}

impl LlmClient {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self {
            client: Client::new(),
            limiter,
            counters: Counters::default(),
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn stats(&self) -> LlmStats {
        LlmStats {
            total: self.counters.total.load(Ordering::Relaxed),
            successful: self.counters.successful.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            last_error: self
                .counters
                .last_error
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }

    async fn attempt(
        &self,
        prompt: &[ChatMessage],
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        let reservation = self.limiter.try_acquire().ok_or(LlmError::RateLimited)?;

        let text = tokio::time::timeout(options.timeout, self.send(prompt, options))
            .await
            .map_err(|_| LlmError::Timeout)??;

        reservation.commit();
        Ok(text)
    }

    async fn send(
        &self,
        prompt: &[ChatMessage],
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        let url = format!(
            "{}/chat/completions",
            options.endpoint.trim_end_matches('/')
        );

        let request = ChatCompletionRequest {
            model: &options.model,
            messages: prompt
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: Cow::Borrowed(&m.content),
                })
                .collect(),
            max_tokens: options.max_tokens,
            stream: false,
        };

        let mut http_request = self.client.post(&url).json(&request);

        // Add Authorization header if API key is present
        if let Some(api_key) = &options.api_key {
            http_request = http_request.bearer_auth(api_key);
        }

        debug!(model = %options.model, %url, messages = prompt.len(), "Sending completion request");

        let response = http_request.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::ProviderFailure(format!("failed to reach {url}: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::ProviderFailure(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(LlmError::ProviderFailure(format!(
                "status {status}: {}",
                truncate_detail(&body)
            )));
        }

        parse_completion(&body)
    }

    fn note_outcome(&self, result: &Result<String, LlmError>) {
        self.counters.total.fetch_add(1, Ordering::Relaxed);
        match result {
            Ok(_) => {
                self.counters.successful.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                *self
                    .counters
                    .last_error
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = Some(e.to_string());
            }
        }
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(
        &self,
        prompt: &[ChatMessage],
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        if prompt.iter().all(|m| m.content.trim().is_empty()) {
            return Err(LlmError::InvalidInput("prompt is empty".to_string()));
        }

        let attempts = u32::from(options.retries.min(MAX_RETRIES)) + 1;
        let mut attempt = 1;

        let result = loop {
            match self.attempt(prompt, options).await {
                Err(e) if e.is_retryable() && attempt < attempts => {
                    let delay = backoff_delay(attempt);
                    warn!(error = %e, attempt, ?delay, "LLM request failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => break other,
            }
        };

        self.note_outcome(&result);
        result
    }
}

/// Extracts the first choice's text from a chat-completion payload.
fn parse_completion(body: &str) -> Result<String, LlmError> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::ProviderFailure(format!("malformed response: {e}")))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        Err(LlmError::ProviderFailure("empty completion".to_string()))
    } else {
        Ok(content)
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let base = BACKOFF_BASE * 2u32.saturating_pow(attempt.saturating_sub(1));
    let jitter_ms = rand::rng().random_range(0..=base.as_millis() as u64 / 2);
    base + Duration::from_millis(jitter_ms)
}

fn truncate_detail(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
