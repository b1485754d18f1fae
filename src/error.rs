use thiserror::Error;

/// Error taxonomy for the generation core.
///
/// Configuration problems are always raised before any external call is
/// attempted. Text-completion and parse failures are recoverable in
/// multi-page mode (static fallback content); image failures are recorded
/// per page and never cascade to sibling pages.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("text completion failed: {0}")]
    TextCompletion(String),

    #[error("no structured content found in model output: {0}")]
    ResponseParse(String),

    #[error("image synthesis failed: {0}")]
    ImageSynthesis(String),

    #[error("reference asset missing: {0}")]
    ReferenceAssetMissing(String),
}

impl GenerationError {
    /// Stage label used in user-facing failure reports.
    pub fn stage(&self) -> &'static str {
        match self {
            GenerationError::Configuration(_) => "configuration",
            GenerationError::TextCompletion(_) => "text_completion",
            GenerationError::ResponseParse(_) => "response_parse",
            GenerationError::ImageSynthesis(_) => "image_synthesis",
            GenerationError::ReferenceAssetMissing(_) => "reference_asset",
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
