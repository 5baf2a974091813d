pub mod ai;
pub mod cards;
pub mod entries;
pub mod health;
pub mod middleware;
pub mod prompts;
pub mod rate_limit;
pub mod rest;
pub mod state;
pub mod statistics;

use crate::config::Config;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

pub use middleware::rate_limit_ai;
pub use state::AppState;

/// Builds the CORS layer from the configured origin list.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// The complete HTTP surface, minus the Swagger UI.
pub fn router(app_state: Arc<AppState>) -> Router {
    // The POST /ai endpoints share one per-client quota.
    let metered_routes = Router::new()
        .route("/ai/speech-to-text", post(ai::speech_to_text_handler))
        .route("/ai/analyze-dream", post(ai::analyze_dream_handler))
        .route("/ai/generate-image", post(ai::generate_image_handler))
        .route("/ai/enhance-prompt", post(ai::enhance_prompt_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            rate_limit_ai,
        ));

    let open_routes = Router::new()
        .route(
            "/entries",
            get(entries::list_entries_handler).post(entries::create_entry_handler),
        )
        .route(
            "/entries/{id}",
            get(entries::get_entry_handler).put(entries::update_entry_handler),
        )
        .route("/entries/{id}/enhance", post(entries::enhance_entry_handler))
        .route("/prompts/generate", post(prompts::generate_prompts_handler))
        .route("/prompts", post(prompts::create_prompt_response_handler))
        .route("/cards/{id}", post(cards::create_card_handler))
        .route("/statistics/{user_id}", get(statistics::get_statistics_handler))
        .route("/ai/styles", get(ai::list_styles_handler))
        .route("/ai/costs", get(ai::list_costs_handler))
        .route("/health", get(health::health_handler))
        .route("/health/live", get(health::liveness_handler))
        .route("/health/ready", get(health::readiness_handler));

    let config = app_state.config.clone();
    Router::new()
        .merge(open_routes)
        .merge(metered_routes)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
