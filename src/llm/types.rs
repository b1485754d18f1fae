use async_trait::async_trait;

use crate::error::Result;

/// Upstream service limit on identity reference photos. Extra trainer
/// images are dropped, never a hard failure, but the truncation must stay
/// observable to the caller.
pub const MAX_TRAINER_REFERENCES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceRole {
    Background,
    Trainer,
}

impl ReferenceRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceRole::Background => "background",
            ReferenceRole::Trainer => "trainer",
        }
    }
}

/// A conditioning image forwarded to the image boundary. Owned by the
/// caller; the core only reads the role and forwards the bytes.
#[derive(Debug, Clone)]
pub struct ReferenceImage {
    pub bytes: Vec<u8>,
    pub role: ReferenceRole,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct TextCompletionRequest {
    pub system_instruction: String,
    pub user_instruction: String,
    pub max_output_tokens: i32,
}

#[derive(Debug, Clone)]
pub struct ImageSynthesisRequest {
    pub prompt: String,
    pub reference_images: Vec<ReferenceImage>,
    pub aspect_ratio: String,
}

/// At most one image per call; commentary carries any accompanying text
/// from the model plus truncation notes.
#[derive(Debug, Clone, Default)]
pub struct ImageResult {
    pub image: Option<Vec<u8>>,
    pub commentary: Option<String>,
}

#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, request: &TextCompletionRequest) -> Result<String>;
}

#[async_trait]
pub trait ImageSynthesis: Send + Sync {
    async fn synthesize(&self, request: &ImageSynthesisRequest) -> Result<ImageResult>;
}

/// Orders reference images for the wire request: trainer references first
/// (capped at [`MAX_TRAINER_REFERENCES`], keeping input order), then
/// background references. Identity-fidelity instructions in the prompt
/// assume the model sees the face reference before the environment one.
/// Returns the ordered list and the number of trainer images dropped.
pub fn order_reference_images(images: &[ReferenceImage]) -> (Vec<&ReferenceImage>, usize) {
    let trainers: Vec<&ReferenceImage> = images
        .iter()
        .filter(|image| image.role == ReferenceRole::Trainer)
        .collect();
    let backgrounds = images
        .iter()
        .filter(|image| image.role == ReferenceRole::Background);

    let truncated = trainers.len().saturating_sub(MAX_TRAINER_REFERENCES);
    let ordered: Vec<&ReferenceImage> = trainers
        .into_iter()
        .take(MAX_TRAINER_REFERENCES)
        .chain(backgrounds)
        .collect();
    (ordered, truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(role: ReferenceRole, tag: &str) -> ReferenceImage {
        ReferenceImage {
            bytes: tag.as_bytes().to_vec(),
            role,
            description: tag.to_string(),
        }
    }

    #[test]
    fn trainers_come_first_and_are_capped_at_three() {
        let images = vec![
            reference(ReferenceRole::Trainer, "t1"),
            reference(ReferenceRole::Background, "bg"),
            reference(ReferenceRole::Trainer, "t2"),
            reference(ReferenceRole::Trainer, "t3"),
            reference(ReferenceRole::Trainer, "t4"),
            reference(ReferenceRole::Trainer, "t5"),
        ];

        let (ordered, truncated) = order_reference_images(&images);
        assert_eq!(truncated, 2);
        let tags: Vec<&str> = ordered.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(tags, vec!["t1", "t2", "t3", "bg"]);
    }

    #[test]
    fn background_only_passes_through_untruncated() {
        let images = vec![reference(ReferenceRole::Background, "bg")];
        let (ordered, truncated) = order_reference_images(&images);
        assert_eq!(truncated, 0);
        assert_eq!(ordered.len(), 1);
    }
}
