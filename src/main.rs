mod config;
mod error;
mod handlers;
mod models;
mod services;

#[cfg(feature = "http-server")]
mod server;

use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;

use config::{Config, ImageOutputMode};
use handlers::{CreationHandler, ImageSweeper};
use services::{GeminiClient, ImageClient, ImageOutput, ImageStore, RecipeClient, StabilityClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables (before the logger so RUST_LOG can come from .env)
    dotenv().ok();

    env_logger::init();

    log::info!("🚀 Starting Dream Chef backend...");

    let config = Config::from_env().map_err(|e| {
        log::error!("❌ Configuration error: {}", e);
        e
    })?;

    let stability = Arc::new(StabilityClient::new(&config.stability)?);
    log::info!(
        "✅ Stability AI client initialized with engine: {}",
        config.stability.engine_id
    );

    let gemini = Arc::new(GeminiClient::new(&config.gemini)?);
    log::info!("✅ Gemini client initialized with model: {}", config.gemini.model);

    let store = match config.image_output {
        ImageOutputMode::Stored => {
            let store = Arc::new(ImageStore::new(
                config.storage.images_dir.clone(),
                &config.storage.public_base_url,
            ));
            store.ensure_dir().await?;
            log::info!("📁 Storing generated images in {}", store.dir().display());
            Some(store)
        }
        ImageOutputMode::Inline => {
            log::info!("🖼️ Returning generated images as inline data URLs");
            None
        }
    };

    let mut sweeper = match (&store, config.storage.retention) {
        (Some(store), Some(retention)) => {
            let mut sweeper = ImageSweeper::new(store.clone(), retention).await?;
            sweeper.start().await?;
            Some(sweeper)
        }
        _ => None,
    };

    let output = match &store {
        Some(store) => ImageOutput::Stored(store.clone()),
        None => ImageOutput::Inline,
    };
    let image_client = Arc::new(ImageClient::new(stability, output, config.stability.timeout));
    let recipe_client = Arc::new(RecipeClient::new(
        gemini,
        config.recipe_language,
        config.gemini.timeout,
    ));

    let creation_handler = Arc::new(CreationHandler::new(
        image_client,
        recipe_client,
        config.generation_mode,
    ));
    log::info!(
        "✅ Creation handler initialized ({:?} generation)",
        config.generation_mode
    );

    #[cfg(feature = "http-server")]
    {
        let app = server::create_router(
            creation_handler.clone(),
            store.as_ref().map(|store| store.dir()),
        );

        let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
        log::info!("🌐 HTTP server listening on {}", config.bind_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    }

    #[cfg(not(feature = "http-server"))]
    {
        let _ = creation_handler;
        tokio::signal::ctrl_c().await?;
    }

    log::info!("🛑 Shutting down...");
    if let Some(sweeper) = sweeper.as_mut() {
        sweeper.stop().await?;
    }

    Ok(())
}

/// Resolves on Ctrl+C. If the handler cannot be installed, never resolves, so
/// the server keeps running instead of shutting down right after binding.
#[cfg(feature = "http-server")]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("❌ Failed to listen for Ctrl+C, graceful shutdown disabled: {}", e);
        std::future::pending::<()>().await;
    }
}
