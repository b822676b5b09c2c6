use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose, Engine};

use super::ai_service::ImageBackend;
use super::image_store::ImageStore;
use crate::error::ImageGenerationError;
use crate::models::ImageResult;

pub enum ImageOutput {
    Inline,
    Stored(Arc<ImageStore>),
}

/// Generates a dish photo and turns the returned payload into a URL the
/// browser can load.
pub struct ImageClient {
    backend: Arc<dyn ImageBackend>,
    output: ImageOutput,
    timeout: Duration,
}

impl ImageClient {
    pub fn new(backend: Arc<dyn ImageBackend>, output: ImageOutput, timeout: Duration) -> Self {
        Self {
            backend,
            output,
            timeout,
        }
    }

    pub async fn generate_image(&self, prompt: &str) -> Result<ImageResult, ImageGenerationError> {
        let payload = tokio::time::timeout(self.timeout, self.backend.text_to_image(prompt))
            .await
            .map_err(|_| ImageGenerationError::Timeout(self.timeout))??;

        log::debug!("🔄 Base64 image payload size: {} bytes", payload.len());

        let image_url = match &self.output {
            ImageOutput::Inline => format!("data:image/png;base64,{}", payload),
            ImageOutput::Stored(store) => {
                let bytes = general_purpose::STANDARD.decode(payload.trim()).map_err(|e| {
                    ImageGenerationError::MalformedResponse(format!("invalid base64 payload: {}", e))
                })?;
                store.save_png(&bytes).await?
            }
        };

        Ok(ImageResult { image_url })
    }
}
