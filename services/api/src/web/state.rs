//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::web::rate_limit::RateLimiter;
use dream_journal_core::ports::{
    DatabaseService, DreamAnalysisService, ImageGenerationService, SpeechToTextService,
};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
/// Every collaborator is injected here; handlers never construct their own clients.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    pub sst_adapter: Arc<dyn SpeechToTextService>,
    pub analysis_adapter: Arc<dyn DreamAnalysisService>,
    pub image_adapter: Arc<dyn ImageGenerationService>,
    pub rate_limiter: Arc<RateLimiter>,
}
