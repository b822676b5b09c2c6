use serde::{Deserialize, Serialize};

use super::ai_service::ImageBackend;
use crate::config::StabilityConfig;
use crate::error::ImageGenerationError;

const CFG_SCALE: u32 = 7;
const IMAGE_SIZE: u32 = 1024;
const SAMPLES: u32 = 1;
const STEPS: u32 = 30;

#[derive(Debug, Serialize)]
struct TextPrompt {
    text: String,
}

#[derive(Debug, Serialize)]
struct TextToImageRequest {
    text_prompts: Vec<TextPrompt>,
    cfg_scale: u32,
    height: u32,
    width: u32,
    samples: u32,
    steps: u32,
}

impl TextToImageRequest {
    fn new(prompt: &str) -> Self {
        Self {
            text_prompts: vec![TextPrompt {
                text: prompt.to_string(),
            }],
            cfg_scale: CFG_SCALE,
            height: IMAGE_SIZE,
            width: IMAGE_SIZE,
            samples: SAMPLES,
            steps: STEPS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TextToImageResponse {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    base64: Option<String>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

/// Stability AI text-to-image REST client.
pub struct StabilityClient {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl StabilityClient {
    pub fn new(config: &StabilityConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            api_key: config.api_key.clone(),
            endpoint: format!(
                "{}/v1/generation/{}/text-to-image",
                config.api_host, config.engine_id
            ),
            client,
        })
    }
}

#[async_trait::async_trait]
impl ImageBackend for StabilityClient {
    async fn text_to_image(&self, prompt: &str) -> Result<String, ImageGenerationError> {
        let request = TextToImageRequest::new(prompt);

        log::info!("🎨 Sending text-to-image request to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        log::debug!("📥 Stability AI response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ Stability AI error response: {}", error_text);
            return Err(ImageGenerationError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body = response.text().await?;
        log::debug!("📄 Raw Stability AI response size: {} bytes", body.len());

        first_artifact(&body)
    }
}

/// Pull the base64 payload of the first artifact out of a response body.
fn first_artifact(body: &str) -> Result<String, ImageGenerationError> {
    let parsed: TextToImageResponse = serde_json::from_str(body)
        .map_err(|e| ImageGenerationError::MalformedResponse(e.to_string()))?;

    let artifact = parsed.artifacts.into_iter().next().ok_or_else(|| {
        ImageGenerationError::MalformedResponse("response contained no artifacts".to_string())
    })?;

    if let Some(reason) = artifact.finish_reason.as_deref() {
        if reason != "SUCCESS" {
            log::warn!("⚠️ Stability AI artifact finished with reason {}", reason);
        }
    }

    artifact
        .base64
        .filter(|payload| !payload.is_empty())
        .ok_or_else(|| {
            ImageGenerationError::MalformedResponse("artifact has no base64 payload".to_string())
        })
}
