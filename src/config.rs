use std::env;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub anthropic_api_key: String,
    pub claude_model: String,
    pub claude_max_tokens: i32,
    pub gemini_api_key: String,
    pub gemini_image_model: String,
    pub gemini_temperature: f32,
    pub gemini_safety_settings: String,
    pub http_timeout_seconds: u64,
    pub assets_dir: PathBuf,
    pub output_dir: PathBuf,
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::load);

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_f32(name: &str, default: f32) -> f32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<f32>().ok())
        .unwrap_or(default)
}

fn env_i32(name: &str, default: i32) -> i32 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<i32>().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn normalize_gemini_safety_settings(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "standard".to_string();
    }

    match trimmed.to_lowercase().as_str() {
        "permissive" | "off" | "none" => "permissive".to_string(),
        "standard" => "standard".to_string(),
        other => {
            warn!(
                "Unknown GEMINI_SAFETY_SETTINGS value '{}'; defaulting to standard.",
                other
            );
            "standard".to_string()
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Config {
            log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
            anthropic_api_key: env_string("ANTHROPIC_API_KEY", ""),
            claude_model: env_string("CLAUDE_MODEL", "claude-sonnet-4-20250514"),
            claude_max_tokens: env_i32("CLAUDE_MAX_TOKENS", 1024),
            gemini_api_key: env_string("GEMINI_API_KEY", ""),
            gemini_image_model: env_string("GEMINI_IMAGE_MODEL", "gemini-3-pro-image-preview"),
            gemini_temperature: env_f32("GEMINI_TEMPERATURE", 0.7),
            gemini_safety_settings: normalize_gemini_safety_settings(env_string(
                "GEMINI_SAFETY_SETTINGS",
                "standard",
            )),
            http_timeout_seconds: env_u64("HTTP_TIMEOUT_SECONDS", 90),
            assets_dir: PathBuf::from(env_string("ASSETS_DIR", "assets")),
            output_dir: PathBuf::from(env_string("OUTPUT_DIR", "outputs")),
        }
    }

    /// Both credentials must be present before any generation starts; the
    /// caller reports this as a configuration failure, not a network one.
    pub fn require_api_keys(&self) -> crate::error::Result<()> {
        if self.anthropic_api_key.trim().is_empty() {
            return Err(crate::error::GenerationError::Configuration(
                "ANTHROPIC_API_KEY is not set".to_string(),
            ));
        }
        if self.gemini_api_key.trim().is_empty() {
            return Err(crate::error::GenerationError::Configuration(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }
        Ok(())
    }
}
