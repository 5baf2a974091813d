//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, OpenAiAnalysisAdapter, OpenAiImageAdapter, OpenAiSstAdapter},
    config::Config,
    error::ApiError,
    web::{rate_limit::RateLimiter, rest::ApiDoc, router, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let openai_config = match config.openai_api_key.as_deref() {
        Some(key) => OpenAIConfig::new().with_api_key(key),
        None => {
            warn!("OPENAI_API_KEY is not set; AI features will fail and /health/ready reports not ready");
            OpenAIConfig::new().with_api_key("")
        }
    };
    let openai_client = Client::with_config(openai_config);

    let sst_adapter = Arc::new(OpenAiSstAdapter::new(
        openai_client.clone(),
        config.whisper_model.clone(),
    ));
    let analysis_adapter = Arc::new(OpenAiAnalysisAdapter::new(
        openai_client.clone(),
        config.analysis_model.clone(),
    ));
    let image_adapter = Arc::new(OpenAiImageAdapter::new(
        openai_client,
        config.image_model.clone(),
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db: db_adapter,
        config: config.clone(),
        sst_adapter,
        analysis_adapter,
        image_adapter,
        rate_limiter: Arc::new(RateLimiter::per_minute(config.ai_rate_limit_per_minute)),
    });

    // --- 5. Create the Web Router ---
    let app = Router::new()
        .merge(router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
