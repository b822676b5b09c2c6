use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::ai_service::TextModel;
use super::prompts::{build_recipe_prompt, RecipeLanguage};
use crate::error::RecipeGenerationError;
use crate::models::RecipeResult;

/// Result of a recipe request. Always carries a displayable recipe; a failed
/// generation carries the sentinel recipe plus the cause.
#[derive(Debug)]
pub enum RecipeOutcome {
    Generated(RecipeResult),
    Fallback {
        recipe: RecipeResult,
        error: RecipeGenerationError,
    },
}

impl RecipeOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, RecipeOutcome::Generated(_))
    }

    /// Cause of a fallback; `None` for a generated recipe.
    pub fn error(&self) -> Option<&RecipeGenerationError> {
        match self {
            RecipeOutcome::Generated(_) => None,
            RecipeOutcome::Fallback { error, .. } => Some(error),
        }
    }

    pub fn recipe(&self) -> &RecipeResult {
        match self {
            RecipeOutcome::Generated(recipe) => recipe,
            RecipeOutcome::Fallback { recipe, .. } => recipe,
        }
    }

    pub fn into_recipe(self) -> RecipeResult {
        match self {
            RecipeOutcome::Generated(recipe) => recipe,
            RecipeOutcome::Fallback { recipe, .. } => recipe,
        }
    }
}

/// The model sometimes hands back `instructions` as a list of steps.
#[derive(Deserialize)]
#[serde(untagged)]
enum Instructions {
    Text(String),
    Steps(Vec<String>),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRecipe {
    menu_name: String,
    instructions: Instructions,
}

/// Trim the reply and drop any ```` ```json ```` / ```` ``` ```` fences.
/// Applying it twice gives the same result as applying it once.
pub fn clean_reply(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse a cleaned reply into a recipe with exactly `menu_name` and
/// `instructions`.
pub fn parse_recipe(cleaned: &str) -> Result<RecipeResult, RecipeGenerationError> {
    let raw: RawRecipe =
        serde_json::from_str(cleaned).map_err(|e| RecipeGenerationError::Parse(e.to_string()))?;

    let instructions = match raw.instructions {
        Instructions::Text(text) => text,
        Instructions::Steps(steps) => steps.join("\n"),
    };

    Ok(RecipeResult {
        menu_name: raw.menu_name,
        instructions,
    })
}

pub struct RecipeClient {
    model: Arc<dyn TextModel>,
    language: RecipeLanguage,
    timeout: Duration,
}

impl RecipeClient {
    pub fn new(model: Arc<dyn TextModel>, language: RecipeLanguage, timeout: Duration) -> Self {
        Self {
            model,
            language,
            timeout,
        }
    }

    /// Never fails: every error becomes a sentinel recipe.
    pub async fn generate_recipe(
        &self,
        ingredients: &str,
        quantity: &str,
        style: &str,
    ) -> RecipeOutcome {
        match self.try_generate(ingredients, quantity, style).await {
            Ok(recipe) => {
                log::info!("🍳 Recipe generated: {}", recipe.menu_name);
                RecipeOutcome::Generated(recipe)
            }
            Err(error) => {
                let recipe = self.sentinel(&error);
                log::warn!("⚠️ {}", recipe.instructions);
                RecipeOutcome::Fallback { recipe, error }
            }
        }
    }

    async fn try_generate(
        &self,
        ingredients: &str,
        quantity: &str,
        style: &str,
    ) -> Result<RecipeResult, RecipeGenerationError> {
        let prompt = build_recipe_prompt(ingredients, quantity, style, self.language);

        let reply = tokio::time::timeout(self.timeout, self.model.generate_text(&prompt))
            .await
            .map_err(|_| RecipeGenerationError::Timeout(self.timeout))??;

        log::debug!("💬 {} reply: {}", self.model.model_name(), reply);

        parse_recipe(&clean_reply(&reply))
    }

    fn sentinel(&self, error: &RecipeGenerationError) -> RecipeResult {
        RecipeResult {
            menu_name: self.language.error_sentinel().to_string(),
            instructions: format!("Error generating recipe with Gemini: {}", error),
        }
    }
}
