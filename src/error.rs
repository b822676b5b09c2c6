use std::time::Duration;

use crate::models::RecipeResult;

/// Failure of the image-generation call. Any of these is fatal to a combined
/// request.
#[derive(thiserror::Error, Debug)]
pub enum ImageGenerationError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Stability AI error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("could not store image: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for ImageGenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ImageGenerationError::MalformedResponse(e.to_string())
        } else {
            ImageGenerationError::Transport(e.to_string())
        }
    }
}

/// Failure of the text-generation call or of validating its reply.
#[derive(thiserror::Error, Debug)]
pub enum RecipeGenerationError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Gemini error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("prompt was blocked: {0}")]
    Blocked(String),

    #[error("model returned no text")]
    EmptyReply,

    #[error("reply is not a valid recipe object: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RecipeGenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RecipeGenerationError::Parse(e.to_string())
        } else {
            RecipeGenerationError::Transport(e.to_string())
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// What a handler hands back to the HTTP layer when a request does not succeed.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    ClientInput(String),

    #[error("Failed to generate image: {0}")]
    ImageGeneration(#[from] ImageGenerationError),

    /// Split recipe endpoint only; the body is the sentinel recipe.
    #[error("{}", .0.instructions)]
    RecipeGeneration(RecipeResult),
}

#[cfg(feature = "http-server")]
mod http {
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
        Json,
    };

    use super::ApiError;
    use crate::models::ErrorBody;

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            let display = self.to_string();
            match self {
                ApiError::ClientInput(_) => {
                    (StatusCode::BAD_REQUEST, Json(ErrorBody { error: display })).into_response()
                }
                ApiError::ImageGeneration(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody { error: display }),
                )
                    .into_response(),
                ApiError::RecipeGeneration(sentinel) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(sentinel)).into_response()
                }
            }
        }
    }
}
