use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::error::ApiError;
use crate::handlers::CreationHandler;
use crate::models::{CreationRequest, CreationResponse, ImageResult, RecipeResult};

pub struct AppState {
    pub creation_handler: Arc<CreationHandler>,
}

/// Build the HTTP surface. `images_dir` is only passed in stored mode, and
/// mounts `/images/<filename>` over that directory.
pub fn create_router(creation_handler: Arc<CreationHandler>, images_dir: Option<&Path>) -> Router {
    let state = Arc::new(AppState { creation_handler });

    let mut router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/api/generate-creation", post(generate_creation))
        .route("/api/generate-image", post(generate_image))
        .route("/api/generate-recipe", post(generate_recipe))
        .with_state(state);

    if let Some(dir) = images_dir {
        router = router.nest_service("/images", ServeDir::new(dir));
    }

    router.layer(CorsLayer::permissive())
}

/// Parse the raw body ourselves so malformed JSON gets the same 400 shape as
/// a missing field.
fn parse_request(body: &str) -> Result<CreationRequest, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        log::warn!("⚠️ Failed to parse request body: {}", e);
        ApiError::ClientInput(format!("Invalid JSON body: {}", e))
    })
}

async fn generate_creation(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<CreationResponse>, ApiError> {
    let request = parse_request(&body)?;
    let response = state.creation_handler.generate_creation(&request).await?;
    log::info!("✅ Creation generated");
    Ok(Json(response))
}

async fn generate_image(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<ImageResult>, ApiError> {
    let request = parse_request(&body)?;
    let image = state.creation_handler.generate_image(&request).await?;
    Ok(Json(image))
}

async fn generate_recipe(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<RecipeResult>, ApiError> {
    let request = parse_request(&body)?;
    let recipe = state.creation_handler.generate_recipe(&request).await?;
    Ok(Json(recipe))
}

async fn root_handler() -> &'static str {
    "Dream Chef backend - POST /api/generate-creation"
}

async fn health_check() -> &'static str {
    "OK"
}
