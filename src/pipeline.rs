//! Single-image end-to-end orchestration.
//!
//! Photo and SNS modes share the same shape: compose the instruction pair,
//! let the text model produce the final English prompt, then hand that
//! prompt plus any reference images to the image boundary. Unlike the
//! carousel sequencer these modes have no fallback path: a text or image
//! failure is the run's failure.

use crate::catalog::brand::ensure_nationality_clause;
use crate::compose::photo::{BACKGROUND_FIXED_FRAGMENT, TRAINER_IDENTITY_FRAGMENT};
use crate::compose::sns::{aspect_ratio_for_platform, SnsRequest};
use crate::compose::{compose_photo_prompt, compose_sns_prompt, GenerationRequest};
use crate::config::CONFIG;
use crate::error::{GenerationError, Result};
use crate::llm::types::{
    ImageSynthesis, ImageSynthesisRequest, ReferenceImage, ReferenceRole, TextCompletion,
    TextCompletionRequest,
};

#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub prompt: String,
    pub bytes: Vec<u8>,
    pub commentary: Option<String>,
}

/// Final prompt post-processing: the clause lands exactly once at the top
/// whatever the text model did with it, and reference handling fragments
/// are guaranteed present when the matching reference accompanies the
/// request (the model usually carries them through; this makes it certain).
fn finalize_prompt(raw: &str, references: &[ReferenceImage]) -> String {
    let mut prompt = ensure_nationality_clause(raw.trim());

    let has_background = references
        .iter()
        .any(|image| image.role == ReferenceRole::Background);
    let has_trainer = references
        .iter()
        .any(|image| image.role == ReferenceRole::Trainer);

    if has_background && !prompt.contains(BACKGROUND_FIXED_FRAGMENT) {
        prompt.push_str("\n\n");
        prompt.push_str(BACKGROUND_FIXED_FRAGMENT);
    }
    if has_trainer && !prompt.contains(TRAINER_IDENTITY_FRAGMENT) {
        prompt.push_str("\n\n");
        prompt.push_str(TRAINER_IDENTITY_FRAGMENT);
    }
    prompt
}

async fn complete_prompt(
    text: &dyn TextCompletion,
    system_instruction: String,
    user_instruction: String,
) -> Result<String> {
    let response = text
        .complete(&TextCompletionRequest {
            system_instruction,
            user_instruction,
            max_output_tokens: CONFIG.claude_max_tokens,
        })
        .await?;
    if response.trim().is_empty() {
        return Err(GenerationError::TextCompletion(
            "empty prompt from text model".to_string(),
        ));
    }
    Ok(response)
}

async fn synthesize(
    image: &dyn ImageSynthesis,
    prompt: String,
    references: Vec<ReferenceImage>,
    aspect_ratio: String,
) -> Result<GeneratedImage> {
    let result = image
        .synthesize(&ImageSynthesisRequest {
            prompt: prompt.clone(),
            reference_images: references,
            aspect_ratio,
        })
        .await?;
    let bytes = result.image.ok_or_else(|| {
        GenerationError::ImageSynthesis("no image in synthesis result".to_string())
    })?;
    Ok(GeneratedImage {
        prompt,
        bytes,
        commentary: result.commentary,
    })
}

pub async fn generate_photo(
    text: &dyn TextCompletion,
    image: &dyn ImageSynthesis,
    request: &GenerationRequest,
    references: Vec<ReferenceImage>,
) -> Result<GeneratedImage> {
    let pair = compose_photo_prompt(request)?;
    let aspect_ratio = crate::compose::resolve_aspect_ratio(&request.aspect_ratio)?.to_string();
    let raw = complete_prompt(text, pair.system, pair.user).await?;
    let prompt = finalize_prompt(&raw, &references);
    synthesize(image, prompt, references, aspect_ratio).await
}

pub async fn generate_sns(
    text: &dyn TextCompletion,
    image: &dyn ImageSynthesis,
    request: &SnsRequest,
    references: Vec<ReferenceImage>,
) -> Result<GeneratedImage> {
    let pair = compose_sns_prompt(request)?;
    let aspect_ratio = aspect_ratio_for_platform(&request.platform).to_string();
    let raw = complete_prompt(text, pair.system, pair.user).await?;
    let prompt = finalize_prompt(&raw, &references);
    synthesize(image, prompt, references, aspect_ratio).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::catalog::brand::NATIONALITY_CLAUSE;
    use crate::compose::sns::LogoSpec;
    use crate::llm::types::ImageResult;

    struct FixedText {
        response: Option<String>,
    }

    #[async_trait]
    impl TextCompletion for FixedText {
        async fn complete(&self, _request: &TextCompletionRequest) -> Result<String> {
            self.response
                .clone()
                .ok_or_else(|| GenerationError::TextCompletion("offline".to_string()))
        }
    }

    struct CapturingImage {
        requests: Mutex<Vec<ImageSynthesisRequest>>,
        succeed: bool,
    }

    impl CapturingImage {
        fn new(succeed: bool) -> Self {
            CapturingImage {
                requests: Mutex::new(Vec::new()),
                succeed,
            }
        }
    }

    #[async_trait]
    impl ImageSynthesis for CapturingImage {
        async fn synthesize(&self, request: &ImageSynthesisRequest) -> Result<ImageResult> {
            self.requests.lock().unwrap().push(request.clone());
            if self.succeed {
                Ok(ImageResult {
                    image: Some(vec![1, 2, 3]),
                    commentary: Some("done".to_string()),
                })
            } else {
                Err(GenerationError::ImageSynthesis("quota".to_string()))
            }
        }
    }

    fn photo_request() -> GenerationRequest {
        GenerationRequest {
            location: "StoreA".to_string(),
            situation: "consultation".to_string(),
            trainer: Some("Trainer1".to_string()),
            client: None,
            aspect_ratio: "1:1".to_string(),
            additional_free_text: String::new(),
            image_text: None,
            mood: "slightly_calm".to_string(),
            background_selected: true,
        }
    }

    fn reference(role: ReferenceRole) -> ReferenceImage {
        ReferenceImage {
            bytes: vec![0u8; 8],
            role,
            description: role.as_str().to_string(),
        }
    }

    #[tokio::test]
    async fn photo_prompt_carries_clause_once_and_both_fragments() {
        let text = FixedText {
            response: Some(format!(
                "{NATIONALITY_CLAUSE} A calm counseling scene in a bright gym."
            )),
        };
        let image = CapturingImage::new(true);

        let generated = generate_photo(
            &text,
            &image,
            &photo_request(),
            vec![
                reference(ReferenceRole::Trainer),
                reference(ReferenceRole::Background),
            ],
        )
        .await
        .unwrap();

        assert_eq!(generated.prompt.matches(NATIONALITY_CLAUSE).count(), 1);
        assert!(generated.prompt.starts_with(NATIONALITY_CLAUSE));
        assert!(generated.prompt.contains(TRAINER_IDENTITY_FRAGMENT));
        assert!(generated.prompt.contains(BACKGROUND_FIXED_FRAGMENT));
        assert_eq!(generated.bytes, vec![1, 2, 3]);

        let sent = image.requests.lock().unwrap();
        assert_eq!(sent[0].aspect_ratio, "1:1");
        assert_eq!(sent[0].reference_images.len(), 2);
    }

    #[tokio::test]
    async fn fragments_are_not_duplicated_when_model_kept_them() {
        let text = FixedText {
            response: Some(format!(
                "A scene. {TRAINER_IDENTITY_FRAGMENT} {BACKGROUND_FIXED_FRAGMENT}"
            )),
        };
        let image = CapturingImage::new(true);

        let generated = generate_photo(
            &text,
            &image,
            &photo_request(),
            vec![
                reference(ReferenceRole::Trainer),
                reference(ReferenceRole::Background),
            ],
        )
        .await
        .unwrap();
        assert_eq!(generated.prompt.matches(TRAINER_IDENTITY_FRAGMENT).count(), 1);
        assert_eq!(generated.prompt.matches(BACKGROUND_FIXED_FRAGMENT).count(), 1);
    }

    #[tokio::test]
    async fn text_failure_is_a_hard_failure() {
        let text = FixedText { response: None };
        let image = CapturingImage::new(true);

        let err = generate_photo(&text, &image, &photo_request(), vec![])
            .await
            .unwrap_err();
        assert_eq!(err.stage(), "text_completion");
        assert!(image.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn image_failure_is_a_hard_failure() {
        let text = FixedText {
            response: Some("A prompt.".to_string()),
        };
        let image = CapturingImage::new(false);

        let err = generate_photo(&text, &image, &photo_request(), vec![])
            .await
            .unwrap_err();
        assert_eq!(err.stage(), "image_synthesis");
    }

    #[tokio::test]
    async fn sns_mode_uses_platform_aspect_ratio() {
        let text = FixedText {
            response: Some("A clean SNS graphic.".to_string()),
        };
        let image = CapturingImage::new(true);

        let request = SnsRequest {
            platform: "instagram_story".to_string(),
            post_type: "tips".to_string(),
            layout_style: "headline_center".to_string(),
            background_style: "solid_navy".to_string(),
            headline: "見出し".to_string(),
            headline_color: "白".to_string(),
            headline_size: "大".to_string(),
            headline_position: "中央".to_string(),
            logo: LogoSpec::default(),
            font_style: "gothic".to_string(),
            border_style: "none".to_string(),
            mood: "slightly_calm".to_string(),
            ..SnsRequest::default()
        };

        generate_sns(&text, &image, &request, vec![]).await.unwrap();
        let sent = image.requests.lock().unwrap();
        assert_eq!(sent[0].aspect_ratio, "9:16");
    }
}
