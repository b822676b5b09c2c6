pub mod ai_service; // Provider traits
pub mod gemini; // Google Gemini text generation
pub mod image_client;
pub mod image_store; // Stored-mode files and retention
pub mod prompts;
pub mod recipe_client;
pub mod stability; // Stability AI text-to-image

pub use gemini::GeminiClient;
pub use image_client::{ImageClient, ImageOutput};
pub use image_store::ImageStore;
pub use recipe_client::RecipeClient;
pub use stability::StabilityClient;
