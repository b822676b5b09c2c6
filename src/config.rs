use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::services::prompts::RecipeLanguage;

/// How generated images reach the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutputMode {
    /// `data:image/png;base64,...` URL, no disk I/O.
    Inline,
    /// PNG written under `GENERATED_IMAGES_DIR`, served from `/images/`.
    Stored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Sequential,
    Concurrent,
}

#[derive(Debug, Clone)]
pub struct StabilityConfig {
    pub api_key: String,
    pub api_host: String,
    pub engine_id: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub images_dir: PathBuf,
    pub public_base_url: String,
    /// `None` disables the sweeper.
    pub retention: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub stability: StabilityConfig,
    pub gemini: GeminiConfig,
    pub image_output: ImageOutputMode,
    pub storage: StorageConfig,
    pub generation_mode: GenerationMode,
    pub recipe_language: RecipeLanguage,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let number = |key: &'static str, default: u64| -> Result<u64, ConfigError> {
            match get(key) {
                None => Ok(default),
                Some(value) => value
                    .parse::<u64>()
                    .map_err(|_| ConfigError::Invalid { key, value }),
            }
        };

        let stability_api_key = required("STABILITY_API_KEY")?;
        let gemini_api_key = required("GEMINI_API_KEY")?;

        let image_output = match get("IMAGE_OUTPUT_MODE").as_deref() {
            None | Some("inline") => ImageOutputMode::Inline,
            Some("stored") => ImageOutputMode::Stored,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "IMAGE_OUTPUT_MODE",
                    value: other.to_string(),
                })
            }
        };

        let generation_mode = match get("GENERATION_MODE").as_deref() {
            None | Some("sequential") => GenerationMode::Sequential,
            Some("concurrent") => GenerationMode::Concurrent,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "GENERATION_MODE",
                    value: other.to_string(),
                })
            }
        };

        let recipe_language = match get("RECIPE_LANGUAGE") {
            None => RecipeLanguage::Thai,
            Some(value) => RecipeLanguage::from_string(&value).ok_or(ConfigError::Invalid {
                key: "RECIPE_LANGUAGE",
                value,
            })?,
        };

        let retention = match number("IMAGE_RETENTION_HOURS", 24)? {
            0 => None,
            hours => {
                let secs = hours.checked_mul(3600).ok_or(ConfigError::Invalid {
                    key: "IMAGE_RETENTION_HOURS",
                    value: hours.to_string(),
                })?;
                Some(Duration::from_secs(secs))
            }
        };

        Ok(Self {
            bind_addr: or_default("BIND_ADDR", "0.0.0.0:5000"),
            stability: StabilityConfig {
                api_key: stability_api_key,
                api_host: or_default("STABILITY_API_HOST", "https://api.stability.ai")
                    .trim_end_matches('/')
                    .to_string(),
                engine_id: or_default("STABILITY_ENGINE_ID", "stable-diffusion-xl-1024-v1-0"),
                timeout: Duration::from_secs(number("IMAGE_TIMEOUT_SECS", 20)?),
            },
            gemini: GeminiConfig {
                api_key: gemini_api_key,
                api_base: or_default(
                    "GEMINI_API_BASE",
                    "https://generativelanguage.googleapis.com/v1beta",
                )
                .trim_end_matches('/')
                .to_string(),
                model: or_default("GEMINI_MODEL", "gemini-1.5-flash"),
                timeout: Duration::from_secs(number("RECIPE_TIMEOUT_SECS", 60)?),
            },
            image_output,
            storage: StorageConfig {
                images_dir: PathBuf::from(or_default("GENERATED_IMAGES_DIR", "generated_images")),
                public_base_url: or_default("PUBLIC_BASE_URL", "http://127.0.0.1:5000")
                    .trim_end_matches('/')
                    .to_string(),
                retention,
            },
            generation_mode,
            recipe_language,
        })
    }
}
