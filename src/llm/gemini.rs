//! Image-synthesis boundary: Gemini `generateContent` with inline reference
//! images. At most one image is used per call; any accompanying text parts
//! are surfaced as commentary.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::CONFIG;
use crate::error::{GenerationError, Result};
use crate::llm::types::{
    order_reference_images, ImageResult, ImageSynthesis, ImageSynthesisRequest,
    MAX_TRAINER_REFERENCES,
};
use crate::utils::http::get_http_client;
use crate::utils::timing::log_model_timing;

const GEMINI_MAX_RETRY_ATTEMPTS: usize = 2;
const GEMINI_RETRY_BASE_DELAY_MS: u64 = 900;

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

fn redact_gemini_api_key(text: &str) -> String {
    let key = CONFIG.gemini_api_key.trim();
    if key.is_empty() {
        return text.to_string();
    }
    text.replace(key, "[redacted]")
}

fn gemini_should_retry_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

fn gemini_should_retry_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

fn gemini_retry_delay(attempt: usize) -> Duration {
    let attempt = attempt.max(1) as u64;
    Duration::from_millis(GEMINI_RETRY_BASE_DELAY_MS.saturating_mul(attempt))
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

fn build_safety_settings() -> Vec<Value> {
    let profile = CONFIG.gemini_safety_settings.as_str();
    let threshold = match profile {
        "permissive" => "OFF",
        _ => "BLOCK_MEDIUM_AND_ABOVE",
    };

    vec![
        json!({ "category": "HARM_CATEGORY_HARASSMENT", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_CIVIC_INTEGRITY", "threshold": threshold }),
    ]
}

fn detect_image_mime(bytes: &[u8]) -> String {
    infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| "image/jpeg".to_string())
}

fn extract_result(response: GeminiResponse) -> ImageResult {
    let mut image = None;
    let mut commentary_parts = Vec::new();

    for candidate in response.candidates.unwrap_or_default() {
        let Some(content) = candidate.content else {
            continue;
        };
        for part in content.parts.unwrap_or_default() {
            match part {
                GeminiPart::Text { text } => {
                    if !text.trim().is_empty() {
                        commentary_parts.push(text);
                    }
                }
                GeminiPart::InlineData { inline_data } => {
                    if image.is_none() && inline_data.mime_type.starts_with("image/") {
                        if let Ok(bytes) = general_purpose::STANDARD.decode(inline_data.data) {
                            image = Some(bytes);
                        }
                    }
                }
            }
        }
    }

    let commentary = if commentary_parts.is_empty() {
        None
    } else {
        Some(commentary_parts.join("\n"))
    };
    ImageResult { image, commentary }
}

async fn call_gemini_api(model: &str, payload: Value) -> Result<GeminiResponse> {
    let client = get_http_client();
    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
        model, CONFIG.gemini_api_key
    );

    let mut attempt = 0usize;
    loop {
        attempt += 1;
        let response = match client.post(&url).json(&payload).send().await {
            Ok(response) => response,
            Err(err) => {
                let err_text = redact_gemini_api_key(&err.to_string());
                let should_retry =
                    gemini_should_retry_error(&err) && attempt < GEMINI_MAX_RETRY_ATTEMPTS;
                warn!(
                    "Gemini request failed to send: {} (timeout={}, connect={}, retrying={})",
                    err_text,
                    err.is_timeout(),
                    err.is_connect(),
                    should_retry
                );
                if should_retry {
                    tokio::time::sleep(gemini_retry_delay(attempt)).await;
                    continue;
                }
                return Err(GenerationError::ImageSynthesis(format!(
                    "request failed: {err_text}"
                )));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let (message, body_summary) = summarize_error_body(&body);
            let should_retry =
                gemini_should_retry_status(status) && attempt < GEMINI_MAX_RETRY_ATTEMPTS;
            warn!(
                "Gemini API error: status={}, body={}, retrying={}",
                status, body_summary, should_retry
            );
            if should_retry {
                tokio::time::sleep(gemini_retry_delay(attempt)).await;
                continue;
            }
            let detail = message.unwrap_or(body_summary);
            return Err(GenerationError::ImageSynthesis(format!(
                "status {status}: {detail}"
            )));
        }

        return response
            .json::<GeminiResponse>()
            .await
            .map_err(|err| GenerationError::ImageSynthesis(redact_gemini_api_key(&err.to_string())));
    }
}

#[derive(Debug, Clone, Default)]
pub struct GeminiImageClient;

impl GeminiImageClient {
    pub fn new() -> Result<Self> {
        if CONFIG.gemini_api_key.trim().is_empty() {
            return Err(GenerationError::Configuration(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }
        Ok(GeminiImageClient)
    }
}

#[async_trait]
impl ImageSynthesis for GeminiImageClient {
    async fn synthesize(&self, request: &ImageSynthesisRequest) -> Result<ImageResult> {
        let (ordered_refs, truncated) = order_reference_images(&request.reference_images);
        if truncated > 0 {
            warn!(
                "Dropping {} trainer reference image(s); forwarding the first {}",
                truncated, MAX_TRAINER_REFERENCES
            );
        }

        let mut parts = vec![json!({ "text": request.prompt })];
        for reference in &ordered_refs {
            let mime_type = detect_image_mime(&reference.bytes);
            let encoded = general_purpose::STANDARD.encode(&reference.bytes);
            parts.push(json!({
                "inlineData": {
                    "mimeType": mime_type,
                    "data": encoded
                }
            }));
        }

        let system_instruction = if ordered_refs.is_empty() {
            "Generate an image based on the prompt. CRITICAL: respond with an image, NOT text."
        } else {
            "Generate an image based on the prompt, using the attached reference images as described. CRITICAL: respond with an image, NOT text."
        };

        let payload = json!({
            "systemInstruction": { "parts": [{ "text": system_instruction }] },
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "temperature": CONFIG.gemini_temperature,
                "responseModalities": ["TEXT", "IMAGE"],
                "imageConfig": { "aspectRatio": request.aspect_ratio },
            },
            "safetySettings": build_safety_settings(),
        });

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                target: "llm.gemini",
                model = %CONFIG.gemini_image_model,
                reference_count = ordered_refs.len(),
                aspect_ratio = %request.aspect_ratio,
                prompt_preview = %truncate_for_log(&request.prompt, 200),
            );
        }

        let model = CONFIG.gemini_image_model.clone();
        log_model_timing("gemini", &model, "synthesize_image", None, || async {
            let response = call_gemini_api(&model, payload).await?;
            let mut result = extract_result(response);
            if truncated > 0 {
                let note = format!(
                    "note: {truncated} trainer reference image(s) beyond the first {MAX_TRAINER_REFERENCES} were not forwarded"
                );
                result.commentary = Some(match result.commentary.take() {
                    Some(existing) => format!("{existing}\n{note}"),
                    None => note,
                });
            }
            if result.image.is_none() {
                let commentary = result.commentary.unwrap_or_default();
                return Err(GenerationError::ImageSynthesis(format!(
                    "no image returned by {model}: {commentary}"
                )));
            }
            Ok(result)
        })
        .await
    }
}
