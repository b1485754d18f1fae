pub mod extract;
pub mod page;
pub mod photo;
pub mod sns;

pub use extract::parse_page_content;
pub use page::compose_page_content_request;
pub use photo::compose_photo_prompt;
pub use sns::{compose_sns_prompt, fallback_image_prompt};

use crate::catalog::options::{
    ClientType, MoodModifier, Situation, ASPECT_RATIOS, CLIENT_TYPES, MOODS, SITUATIONS,
};
use crate::error::{GenerationError, Result};

/// The (system instruction, user instruction) bundle sent to the
/// text-completion boundary. The composer never performs the call itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionPair {
    pub system: String,
    pub user: String,
}

impl InstructionPair {
    /// Concatenated view for whole-instruction assertions.
    #[cfg(test)]
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// Promotional-photo request. `trainer` and `client` are independently
/// optional; absence of both means a people-free scene.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub location: String,
    pub situation: String,
    pub trainer: Option<String>,
    pub client: Option<String>,
    pub aspect_ratio: String,
    pub additional_free_text: String,
    pub image_text: Option<String>,
    pub mood: String,
    /// Whether a store background reference image accompanies the request.
    pub background_selected: bool,
}

/// Accepts either the display label or the canonical token. Aspect ratio is
/// a required axis: an unknown value is a configuration error, never a
/// silent default.
pub fn resolve_aspect_ratio(value: &str) -> Result<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::Configuration(
            "aspect ratio is required".to_string(),
        ));
    }
    if let Some(token) = ASPECT_RATIOS.resolve(trimmed) {
        return Ok(token);
    }
    ASPECT_RATIOS
        .labels()
        .filter_map(|label| ASPECT_RATIOS.resolve(label))
        .copied()
        .find(|token| *token == trimmed)
        .ok_or_else(|| {
            GenerationError::Configuration(format!("unknown aspect ratio: '{trimmed}'"))
        })
}

/// Label-or-key lookup with the catalog default for unknown values.
pub(crate) fn resolve_situation(value: &str) -> &'static Situation {
    SITUATIONS.resolve(value).unwrap_or_else(|| {
        SITUATIONS
            .labels()
            .filter_map(|label| SITUATIONS.resolve(label))
            .find(|situation| situation.key == value)
            .unwrap_or_else(|| SITUATIONS.resolve_or_default(value))
    })
}

pub(crate) fn resolve_mood(value: &str) -> &'static MoodModifier {
    MOODS.resolve(value).unwrap_or_else(|| {
        MOODS
            .labels()
            .filter_map(|label| MOODS.resolve(label))
            .find(|mood| mood.key == value)
            .unwrap_or_else(|| MOODS.resolve_or_default(value))
    })
}

/// Unknown client values behave like an absent client: the scene simply
/// has no client in it.
pub(crate) fn resolve_client(value: &str) -> Option<&'static ClientType> {
    CLIENT_TYPES.resolve(value).or_else(|| {
        CLIENT_TYPES
            .labels()
            .filter_map(|label| CLIENT_TYPES.resolve(label))
            .find(|client| client.key == value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_accepts_labels_and_tokens() {
        assert_eq!(resolve_aspect_ratio("1:1（正方形）").unwrap(), "1:1");
        assert_eq!(resolve_aspect_ratio("1:1").unwrap(), "1:1");
        assert_eq!(resolve_aspect_ratio("21:9").unwrap(), "21:9");
    }

    #[test]
    fn aspect_ratio_rejects_missing_and_unknown() {
        assert!(resolve_aspect_ratio("").is_err());
        assert!(resolve_aspect_ratio("2:1").is_err());
    }

    #[test]
    fn situation_resolves_by_key_with_default_fallback() {
        assert_eq!(resolve_situation("posture_check").key, "posture_check");
        assert_eq!(resolve_situation("何か別のもの").key, "consultation");
    }

    #[test]
    fn client_resolves_by_key_or_none() {
        assert!(resolve_client("30s_female").is_some());
        assert!(resolve_client("unknown_type").is_none());
    }
}
