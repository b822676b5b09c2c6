use std::sync::Arc;

use crate::config::GenerationMode;
use crate::error::{ApiError, ImageGenerationError};
use crate::models::{CreationRequest, CreationResponse, ImageResult, RecipeResult};
use crate::services::prompts::build_image_prompt;
use crate::services::{ImageClient, RecipeClient};

/// Request orchestration for the combined and split generation endpoints.
///
/// The image is load-bearing: if it fails the whole combined request fails.
/// The recipe is not: a failed recipe folds into the response as a sentinel.
pub struct CreationHandler {
    images: Arc<ImageClient>,
    recipes: Arc<RecipeClient>,
    mode: GenerationMode,
}

impl CreationHandler {
    pub fn new(images: Arc<ImageClient>, recipes: Arc<RecipeClient>, mode: GenerationMode) -> Self {
        Self {
            images,
            recipes,
            mode,
        }
    }

    pub async fn generate_creation(
        &self,
        request: &CreationRequest,
    ) -> Result<CreationResponse, ApiError> {
        let (ingredients, quantity) = match (request.ingredients(), request.quantity()) {
            (Some(ingredients), Some(quantity)) => (ingredients, quantity),
            _ => {
                log::warn!("⚠️ Creation request rejected: missing ingredients or quantity");
                return Err(ApiError::ClientInput(
                    "Ingredients and quantity are required".to_string(),
                ));
            }
        };
        let style = request.style();

        log::info!(
            "📨 Creation request - ingredients: '{}' | quantity: '{}' | style: '{}'",
            ingredients,
            quantity,
            style
        );

        let image_prompt = build_image_prompt(ingredients, style);

        let (image, outcome) = match self.mode {
            GenerationMode::Sequential => {
                let image = self.images.generate_image(&image_prompt).await.map_err(|e| {
                    log::error!("❌ Stability AI Error: {}", e);
                    e
                })?;
                let outcome = self.recipes.generate_recipe(ingredients, quantity, style).await;
                (image, outcome)
            }
            GenerationMode::Concurrent => {
                // An image error returns early and drops the in-flight recipe call.
                tokio::try_join!(
                    async {
                        self.images.generate_image(&image_prompt).await.map_err(|e| {
                            log::error!("❌ Stability AI Error: {}", e);
                            e
                        })
                    },
                    async {
                        Ok::<_, ImageGenerationError>(
                            self.recipes.generate_recipe(ingredients, quantity, style).await,
                        )
                    },
                )?
            }
        };

        if let Some(error) = outcome.error() {
            log::warn!("⚠️ Returning creation with fallback recipe: {}", error);
        }

        Ok(CreationResponse {
            image_url: image.image_url,
            recipe: outcome.recipe().to_json_string(),
        })
    }

    pub async fn generate_image(&self, request: &CreationRequest) -> Result<ImageResult, ApiError> {
        let ingredients = request.ingredients().ok_or_else(|| {
            log::warn!("⚠️ Image request rejected: missing ingredients");
            ApiError::ClientInput("Ingredients are required".to_string())
        })?;

        log::info!("📨 Image request - ingredients: '{}'", ingredients);

        let prompt = build_image_prompt(ingredients, request.style());
        self.images.generate_image(&prompt).await.map_err(|e| {
            log::error!("❌ Stability AI Error: {}", e);
            ApiError::from(e)
        })
    }

    /// Unlike the combined endpoint, a failed recipe is reported as an error
    /// (with the sentinel as its body).
    pub async fn generate_recipe(
        &self,
        request: &CreationRequest,
    ) -> Result<RecipeResult, ApiError> {
        let ingredients = request.ingredients().ok_or_else(|| {
            log::warn!("⚠️ Recipe request rejected: missing ingredients");
            ApiError::ClientInput("Ingredients are required".to_string())
        })?;
        let quantity = request.quantity().unwrap_or("");

        log::info!("📨 Recipe request - ingredients: '{}'", ingredients);

        let outcome = self
            .recipes
            .generate_recipe(ingredients, quantity, request.style())
            .await;

        match outcome.error() {
            None => Ok(outcome.into_recipe()),
            Some(error) => {
                log::error!("❌ Recipe generation failed: {}", error);
                Err(ApiError::RecipeGeneration(outcome.into_recipe()))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::time::Duration;

    use crate::services::ai_service::mock::{MockImageBackend, MockTextModel, PNG_FIXTURE_BASE64};
    use crate::services::prompts::RecipeLanguage;
    use crate::services::ImageOutput;

    pub(crate) const GOOD_REPLY: &str = "```json\n{\"menu_name\":\"A\",\"instructions\":\"B\"}\n```";

    pub(crate) fn handler(
        image: Arc<MockImageBackend>,
        text: Arc<MockTextModel>,
        mode: GenerationMode,
    ) -> CreationHandler {
        let images = ImageClient::new(image, ImageOutput::Inline, Duration::from_millis(200));
        let recipes = RecipeClient::new(text, RecipeLanguage::Thai, Duration::from_secs(5));
        CreationHandler::new(Arc::new(images), Arc::new(recipes), mode)
    }

    fn request(ingredients: Option<&str>, quantity: Option<&str>) -> CreationRequest {
        CreationRequest {
            ingredients: ingredients.map(str::to_string),
            quantity: quantity.map(str::to_string),
            style: Some("อาหารสตรีทฟู้ดเยาวราช".to_string()),
        }
    }

    #[tokio::test]
    async fn test_combined_success() {
        for mode in [GenerationMode::Sequential, GenerationMode::Concurrent] {
            let image = Arc::new(MockImageBackend::succeeding());
            let text = Arc::new(MockTextModel::replying(GOOD_REPLY));
            let response = handler(image.clone(), text.clone(), mode)
                .generate_creation(&request(Some("ไข่"), Some("2 คน")))
                .await
                .unwrap();

            assert_eq!(
                response.image_url,
                format!("data:image/png;base64,{}", PNG_FIXTURE_BASE64)
            );
            assert_eq!(response.recipe, r#"{"menu_name":"A","instructions":"B"}"#);
            assert_eq!(image.call_count(), 1);
            assert_eq!(text.call_count(), 1);
        }
    }

    #[tokio::test]
    async fn test_combined_recipe_failure_is_degraded_not_absent() {
        let image = Arc::new(MockImageBackend::succeeding());
        let text = Arc::new(MockTextModel::replying("not json at all"));
        let response = handler(image, text, GenerationMode::Sequential)
            .generate_creation(&request(Some("ไข่"), Some("2 คน")))
            .await
            .unwrap();

        let recipe: RecipeResult = serde_json::from_str(&response.recipe).unwrap();
        assert_eq!(recipe.menu_name, "เกิดข้อผิดพลาด");
        assert!(recipe.instructions.starts_with("Error generating recipe with Gemini:"));
    }

    #[tokio::test]
    async fn test_missing_fields_make_no_external_calls() {
        let image = Arc::new(MockImageBackend::succeeding());
        let text = Arc::new(MockTextModel::replying(GOOD_REPLY));
        let handler = handler(image.clone(), text.clone(), GenerationMode::Sequential);

        for req in [
            request(None, Some("2 คน")),
            request(Some("ไข่"), None),
            request(Some("  "), Some("2 คน")),
        ] {
            let err = handler.generate_creation(&req).await.unwrap_err();
            assert!(matches!(err, ApiError::ClientInput(_)));
        }

        let err = handler.generate_image(&request(None, None)).await.unwrap_err();
        assert!(matches!(err, ApiError::ClientInput(_)));
        let err = handler.generate_recipe(&request(None, None)).await.unwrap_err();
        assert!(matches!(err, ApiError::ClientInput(_)));

        assert_eq!(image.call_count(), 0);
        assert_eq!(text.call_count(), 0);
    }

    #[tokio::test]
    async fn test_image_timeout_short_circuits_recipe() {
        let image = Arc::new(MockImageBackend::hanging());
        let text = Arc::new(MockTextModel::replying(GOOD_REPLY));
        let err = handler(image.clone(), text.clone(), GenerationMode::Sequential)
            .generate_creation(&request(Some("ไข่"), Some("2 คน")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::ImageGeneration(ImageGenerationError::Timeout(_))
        ));
        assert!(err.to_string().starts_with("Failed to generate image:"));
        assert_eq!(image.call_count(), 1);
        assert_eq!(text.call_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_image_failure_still_fails_request() {
        let image = Arc::new(MockImageBackend::failing("503 Service Unavailable"));
        let text = Arc::new(MockTextModel::replying(GOOD_REPLY));
        let err = handler(image, text, GenerationMode::Concurrent)
            .generate_creation(&request(Some("ไข่"), Some("2 คน")))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to generate image: request failed: 503 Service Unavailable"
        );
    }

    #[tokio::test]
    async fn test_split_recipe_surfaces_failure() {
        let image = Arc::new(MockImageBackend::succeeding());
        let text = Arc::new(MockTextModel::failing("quota exceeded"));
        let err = handler(image.clone(), text, GenerationMode::Sequential)
            .generate_recipe(&request(Some("ไข่"), None))
            .await
            .unwrap_err();

        match err {
            ApiError::RecipeGeneration(sentinel) => {
                assert_eq!(sentinel.menu_name, "เกิดข้อผิดพลาด");
                assert!(sentinel.instructions.contains("quota exceeded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(image.call_count(), 0);
    }

    #[tokio::test]
    async fn test_split_recipe_quantity_is_optional() {
        let image = Arc::new(MockImageBackend::succeeding());
        let text = Arc::new(MockTextModel::replying(GOOD_REPLY));
        let recipe = handler(image, text, GenerationMode::Sequential)
            .generate_recipe(&request(Some("ไข่"), None))
            .await
            .unwrap();

        assert_eq!(recipe.menu_name, "A");
    }

    #[tokio::test]
    async fn test_split_image_does_not_call_text_model() {
        let image = Arc::new(MockImageBackend::succeeding());
        let text = Arc::new(MockTextModel::replying(GOOD_REPLY));
        let result = handler(image, text.clone(), GenerationMode::Sequential)
            .generate_image(&request(Some("ไข่"), None))
            .await
            .unwrap();

        assert!(result.image_url.starts_with("data:image/png;base64,"));
        assert_eq!(text.call_count(), 0);
    }
}
