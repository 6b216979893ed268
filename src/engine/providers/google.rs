// Kaori Engine — Google Gemini Client
// Non-streaming `generateContent` calls for both halves of the model
// boundary: sentiment scoring (kaori-core's `SentimentSource`) and replies
// (`ReplyGenerator`). Retry and circuit-breaking live here and only here.

use crate::atoms::constants::*;
use crate::atoms::error::{EngineError, EngineResult};
use crate::config::ProviderConfig;
use crate::engine::http::{parse_retry_after, Circuit, RetryPolicy};
use crate::engine::providers::{ReplyGenerator, ReplyRequest};
use async_trait::async_trait;
use kaori_core::{MoodError, MoodResult, SentimentSource};
use log::{error, info, warn};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const PROVIDER: &str = "gemini";

// ── Struct ─────────────────────────────────────────────────────────────────

pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    sentiment_temperature: f64,
    reply_temperature: f64,
    retry: RetryPolicy,
    circuit: Circuit,
}

impl GeminiClient {
    pub fn new(config: &ProviderConfig, api_key: impl Into<String>) -> EngineResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(PROVIDER_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(PROVIDER_REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(GeminiClient {
            client,
            base_url: config.base_url.clone().unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
            api_key: api_key.into(),
            model: config.model.clone(),
            sentiment_temperature: config.sentiment_temperature,
            reply_temperature: config.reply_temperature,
            retry: RetryPolicy::default(),
            circuit: Circuit::new(
                PROVIDER,
                PROVIDER_CIRCUIT_THRESHOLD,
                Duration::from_secs(PROVIDER_CIRCUIT_COOLDOWN_SECS),
            ),
        })
    }

    /// POST one `generateContent` request, retrying transient failures.
    async fn generate(&self, body: &Value) -> EngineResult<String> {
        self.circuit.check()?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        );
        info!("[gemini] Request model={}", self.model);

        let mut last_error = String::new();
        let mut retry_after: Option<Duration> = None;
        let max_retries = self.retry.max_retries;
        for attempt in 0..=max_retries {
            if attempt > 0 {
                let delay = self.retry.wait(attempt - 1, retry_after.take()).await;
                warn!("[gemini] Retry {}/{} after {}ms", attempt, max_retries, delay.as_millis());
            }

            let response = match self
                .client
                .post(&url)
                .header("Content-Type", "application/json")
                .json(body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    self.circuit.failed();
                    // reqwest errors can echo the URL, which carries the key.
                    last_error = format!("HTTP request failed: {}", e.without_url());
                    if attempt < max_retries {
                        continue;
                    }
                    return Err(EngineError::provider(PROVIDER, last_error));
                }
            };

            let status = response.status().as_u16();
            if !response.status().is_success() {
                retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(parse_retry_after);
                let body_text = response.text().await.unwrap_or_default();
                last_error = format!("API error {}: {}", status, truncate(&body_text, 200));
                error!("[gemini] Error {}: {}", status, truncate(&body_text, 500));

                self.circuit.failed();

                // 401/403 and other client errors are final
                if self.retry.should_retry(status, attempt) {
                    continue;
                }
                return Err(EngineError::provider(PROVIDER, last_error));
            }

            let payload: Value = response.json().await.map_err(|e| e.without_url())?;
            self.circuit.succeeded();
            return extract_text(&payload);
        }

        Err(EngineError::provider(PROVIDER, last_error))
    }
}

// ── Wire format ────────────────────────────────────────────────────────────

/// `generateContent` body: system instruction, turns, temperature.
fn request_body(system: &str, contents: Vec<Value>, temperature: f64) -> Value {
    json!({
        "systemInstruction": { "parts": [{ "text": system }] },
        "contents": contents,
        "generationConfig": { "temperature": temperature },
    })
}

fn turn(role: &str, text: &str) -> Value {
    json!({ "role": role, "parts": [{ "text": text }] })
}

/// Concatenated text parts of the first candidate.
fn extract_text(payload: &Value) -> EngineResult<String> {
    let candidate = payload
        .get("candidates")
        .and_then(|c| c.get(0))
        .ok_or_else(|| EngineError::provider(PROVIDER, "response has no candidates"))?;

    let text: String = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .map(|parts| parts.iter().filter_map(|p| p.get("text").and_then(Value::as_str)).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate
            .get("finishReason")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        return Err(EngineError::provider(
            PROVIDER,
            format!("empty response (reason: {})", reason),
        ));
    }
    Ok(text.trim().to_string())
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ── Trait impls ────────────────────────────────────────────────────────────

#[async_trait]
impl SentimentSource for GeminiClient {
    async fn sentiment(&self, previous: &str, user: &str) -> MoodResult<String> {
        let body = request_body(
            SENTIMENT_INSTRUCTION,
            vec![turn("model", previous), turn("user", user)],
            self.sentiment_temperature,
        );
        self.generate(&body).await.map_err(|e| MoodError::source(e.to_string()))
    }
}

#[async_trait]
impl ReplyGenerator for GeminiClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn reply(&self, request: &ReplyRequest) -> EngineResult<String> {
        let body = request_body(
            &request.system_prompt(),
            vec![turn("user", &request.user_text)],
            self.reply_temperature,
        );
        self.generate(&body).await
    }
}
