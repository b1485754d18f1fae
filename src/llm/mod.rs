pub mod claude;
pub mod gemini;
pub mod types;

pub use claude::ClaudeClient;
pub use gemini::GeminiImageClient;
pub use types::{
    ImageResult, ImageSynthesis, ImageSynthesisRequest, ReferenceImage, ReferenceRole,
    TextCompletion, TextCompletionRequest,
};
