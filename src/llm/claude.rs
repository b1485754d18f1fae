//! Text-completion boundary: Anthropic messages API.
//!
//! One call is one attempt from the core's perspective; the bounded retry
//! here only covers transient transport faults, not a fallback policy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::CONFIG;
use crate::error::{GenerationError, Result};
use crate::llm::types::{TextCompletion, TextCompletionRequest};
use crate::utils::http::get_http_client;
use crate::utils::timing::log_model_timing;

const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_RETRY_ATTEMPTS: usize = 2;
const RETRY_BASE_DELAY_MS: u64 = 900;

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ClaudeContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ClaudeContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

fn redact_api_key(text: &str) -> String {
    let key = CONFIG.anthropic_api_key.trim();
    if key.is_empty() {
        return text.to_string();
    }
    text.replace(key, "[redacted]")
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

fn should_retry_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

fn retry_delay(attempt: usize) -> Duration {
    let attempt = attempt.max(1) as u64;
    Duration::from_millis(RETRY_BASE_DELAY_MS.saturating_mul(attempt))
}

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

fn summarize_error_body(body: &str) -> (Option<String>, String) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return (None, "empty response body".to_string());
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let message = value
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .map(|v| v.to_string());
        return (message, truncate_for_log(&value.to_string(), 2000));
    }

    (None, truncate_for_log(trimmed, 2000))
}

fn extract_text(response: ClaudeResponse) -> String {
    let mut parts = Vec::new();
    for block in response.content {
        if block.kind == "text" {
            if let Some(text) = block.text {
                if !text.trim().is_empty() {
                    parts.push(text);
                }
            }
        }
    }
    parts.join("\n")
}

async fn call_messages_api(payload: Value) -> Result<ClaudeResponse> {
    let client = get_http_client();

    let mut attempt = 0usize;
    loop {
        attempt += 1;
        let response = match client
            .post(ANTHROPIC_MESSAGES_URL)
            .header("x-api-key", &CONFIG.anthropic_api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                let err_text = redact_api_key(&err.to_string());
                let should_retry = should_retry_error(&err) && attempt < MAX_RETRY_ATTEMPTS;
                warn!(
                    "Claude request failed to send: {} (timeout={}, connect={}, retrying={})",
                    err_text,
                    err.is_timeout(),
                    err.is_connect(),
                    should_retry
                );
                if should_retry {
                    tokio::time::sleep(retry_delay(attempt)).await;
                    continue;
                }
                return Err(GenerationError::TextCompletion(format!(
                    "request failed: {err_text}"
                )));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let (message, body_summary) = summarize_error_body(&body);
            let should_retry = should_retry_status(status) && attempt < MAX_RETRY_ATTEMPTS;
            warn!(
                "Claude API error: status={}, body={}, retrying={}",
                status, body_summary, should_retry
            );
            if should_retry {
                tokio::time::sleep(retry_delay(attempt)).await;
                continue;
            }
            let detail = message.unwrap_or(body_summary);
            return Err(GenerationError::TextCompletion(format!(
                "status {status}: {detail}"
            )));
        }

        return response
            .json::<ClaudeResponse>()
            .await
            .map_err(|err| GenerationError::TextCompletion(redact_api_key(&err.to_string())));
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClaudeClient;

impl ClaudeClient {
    pub fn new() -> Result<Self> {
        if CONFIG.anthropic_api_key.trim().is_empty() {
            return Err(GenerationError::Configuration(
                "ANTHROPIC_API_KEY is not set".to_string(),
            ));
        }
        Ok(ClaudeClient)
    }
}

#[async_trait]
impl TextCompletion for ClaudeClient {
    async fn complete(&self, request: &TextCompletionRequest) -> Result<String> {
        let payload = json!({
            "model": CONFIG.claude_model,
            "max_tokens": request.max_output_tokens,
            "system": request.system_instruction,
            "messages": [
                { "role": "user", "content": request.user_instruction }
            ],
        });

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                target: "llm.claude",
                model = %CONFIG.claude_model,
                system_chars = request.system_instruction.chars().count(),
                user_chars = request.user_instruction.chars().count(),
                max_tokens = request.max_output_tokens,
            );
        }

        log_model_timing(
            "anthropic",
            &CONFIG.claude_model,
            "complete",
            None,
            || async {
                let response = call_messages_api(payload).await?;
                let text = extract_text(response);
                if text.trim().is_empty() {
                    return Err(GenerationError::TextCompletion(
                        "empty completion response".to_string(),
                    ));
                }
                Ok(text)
            },
        )
        .await
    }
}
