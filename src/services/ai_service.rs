use crate::error::{ImageGenerationError, RecipeGenerationError};

/// Text-to-image provider (Stability AI, mocks in tests).
#[async_trait::async_trait]
pub trait ImageBackend: Send + Sync {
    /// Returns the base64-encoded PNG of the first generated artifact.
    async fn text_to_image(&self, prompt: &str) -> Result<String, ImageGenerationError>;
}

/// Text-generation provider (Gemini, mocks in tests).
#[async_trait::async_trait]
pub trait TextModel: Send + Sync {
    /// Returns the raw reply text, untouched.
    async fn generate_text(&self, prompt: &str) -> Result<String, RecipeGenerationError>;

    fn model_name(&self) -> &str;
}
