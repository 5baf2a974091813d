//! In-memory stand-ins for the database and AI collaborators, and helpers for
//! driving the router without a network socket.

#![allow(dead_code)]

use api_lib::config::Config;
use api_lib::web::{rate_limit::RateLimiter, router, state::AppState};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use dream_journal_core::{
    pricing::{analysis_cost, image_cost, transcription_cost},
    AnalysisOptions, AnalysisOutcome, DatabaseService, DateRange, DreamAnalysis,
    DreamAnalysisService, DreamEntry, DreamEntryPatch, GeneratedImage, ImageGenerationService,
    ImageRequest, JournalPromptResponse, NewDreamEntry, NewPromptResponse, PortError, PortResult,
    SpeechToTextService, Transcription,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use tracing::Level;
use uuid::Uuid;

//=========================================================================================
// Fake Database
//=========================================================================================

#[derive(Default)]
pub struct InMemoryDb {
    entries: Mutex<Vec<DreamEntry>>,
    prompts: Mutex<Vec<JournalPromptResponse>>,
    pub offline: bool,
}

fn not_found(entry_id: Uuid) -> PortError {
    PortError::NotFound(format!("Dream entry {} not found", entry_id))
}

#[async_trait]
impl DatabaseService for InMemoryDb {
    async fn ping(&self) -> PortResult<()> {
        if self.offline {
            return Err(PortError::Unexpected("connection refused".into()));
        }
        Ok(())
    }

    async fn create_entry(&self, entry: NewDreamEntry) -> PortResult<DreamEntry> {
        let now = Utc::now();
        let stored = DreamEntry {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            entry_date: entry.entry_date,
            created_at: now,
            updated_at: now,
            original_transcription: entry.original_transcription,
            enhanced_description: entry.enhanced_description,
            dream_title: entry.dream_title,
            emotions: entry.emotions,
            themes: entry.themes,
            symbols: entry.symbols,
            lucidity_level: entry.lucidity_level,
            vividness_level: entry.vividness_level,
            ai_prompt: entry.ai_prompt,
            art_style: entry.art_style,
            image_url: entry.image_url,
            card_design: entry.card_design,
        };
        self.entries.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn get_entry(&self, entry_id: Uuid) -> PortResult<DreamEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|entry| entry.id == entry_id)
            .cloned()
            .ok_or_else(|| not_found(entry_id))
    }

    async fn list_entries(
        &self,
        user_id: &str,
        range: &DateRange,
        limit: Option<u32>,
    ) -> PortResult<Vec<DreamEntry>> {
        let mut entries: Vec<DreamEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.user_id == user_id && range.contains(entry.entry_date))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
        if let Some(limit) = limit {
            entries.truncate(limit as usize);
        }
        Ok(entries)
    }

    async fn update_entry(&self, entry_id: Uuid, patch: DreamEntryPatch) -> PortResult<DreamEntry> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id == entry_id)
            .ok_or_else(|| not_found(entry_id))?;
        entry.apply(patch);
        entry.updated_at = Utc::now().max(entry.updated_at + chrono::Duration::microseconds(1));
        Ok(entry.clone())
    }

    async fn create_prompt_response(
        &self,
        response: NewPromptResponse,
    ) -> PortResult<JournalPromptResponse> {
        let stored = JournalPromptResponse {
            id: Uuid::new_v4(),
            dream_entry_id: response.dream_entry_id,
            prompt_text: response.prompt_text,
            response_transcription: response.response_transcription,
            prompt_order: response.prompt_order,
            created_at: Utc::now(),
        };
        self.prompts.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn get_prompt_responses(&self, entry_id: Uuid) -> PortResult<Vec<JournalPromptResponse>> {
        let mut prompts: Vec<JournalPromptResponse> = self
            .prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|prompt| prompt.dream_entry_id == entry_id)
            .cloned()
            .collect();
        prompts.sort_by_key(|prompt| prompt.prompt_order);
        Ok(prompts)
    }
}

//=========================================================================================
// Fake AI Collaborators
//=========================================================================================

pub struct FakeTranscriber;

#[async_trait]
impl SpeechToTextService for FakeTranscriber {
    async fn transcribe_audio(&self, _file_name: &str, audio_data: Vec<u8>) -> PortResult<Transcription> {
        let duration_seconds = audio_data.len() as f64;
        Ok(Transcription {
            text: "I was walking through a forest of glass".into(),
            duration_seconds,
            cost: transcription_cost(duration_seconds),
        })
    }
}

pub struct FakeAnalyzer {
    pub fail: bool,
}

#[async_trait]
impl DreamAnalysisService for FakeAnalyzer {
    async fn analyze_dream(
        &self,
        _dream_text: &str,
        _options: AnalysisOptions,
    ) -> PortResult<AnalysisOutcome> {
        if self.fail {
            return Err(PortError::Upstream("analysis provider timed out".into()));
        }
        Ok(AnalysisOutcome {
            analysis: DreamAnalysis {
                mood: "wonder".into(),
                themes: vec!["flying".into(), "freedom".into()],
                symbols: vec!["feather".into()],
                interpretation: "A wish to rise above daily limits.".into(),
                emotional_tone: "uplifting".into(),
                personal_growth: "Trust your momentum.".into(),
            },
            tokens_used: 300,
            cost: analysis_cost(200, 100),
        })
    }
}

pub struct FakeImager {
    pub fail: bool,
}

#[async_trait]
impl ImageGenerationService for FakeImager {
    async fn generate_image(&self, request: &ImageRequest) -> PortResult<GeneratedImage> {
        if self.fail {
            return Err(PortError::Upstream("image provider rejected the prompt".into()));
        }
        Ok(GeneratedImage {
            image_url: format!("https://images.test/{}.png", request.style),
            revised_prompt: request.prompt.clone(),
            cost: image_cost(request.quality),
            generation_time_seconds: 0.5,
        })
    }
}

//=========================================================================================
// Test Application
//=========================================================================================

pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://unused".into(),
        db_max_connections: 1,
        log_level: Level::INFO,
        openai_api_key: Some("sk-test".into()),
        whisper_model: "whisper-1".into(),
        analysis_model: "gpt-4-turbo-preview".into(),
        image_model: "dall-e-3".into(),
        allowed_origins: vec!["*".into()],
        max_upload_bytes: 16 * 1024 * 1024,
        ai_rate_limit_per_minute: 100,
        track_api_costs: false,
    }
}

pub struct TestAppBuilder {
    config: Config,
    db: InMemoryDb,
    analysis_fails: bool,
    image_fails: bool,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            config: test_config(),
            db: InMemoryDb::default(),
            analysis_fails: false,
            image_fails: false,
        }
    }

    pub fn rate_limit(mut self, per_minute: u32) -> Self {
        self.config.ai_rate_limit_per_minute = per_minute;
        self
    }

    pub fn without_api_key(mut self) -> Self {
        self.config.openai_api_key = None;
        self
    }

    pub fn database_offline(mut self) -> Self {
        self.db.offline = true;
        self
    }

    pub fn failing_analysis(mut self) -> Self {
        self.analysis_fails = true;
        self
    }

    pub fn failing_images(mut self) -> Self {
        self.image_fails = true;
        self
    }

    pub fn build(self) -> Router {
        let state = AppState {
            db: Arc::new(self.db),
            rate_limiter: Arc::new(RateLimiter::per_minute(self.config.ai_rate_limit_per_minute)),
            config: Arc::new(self.config),
            sst_adapter: Arc::new(FakeTranscriber),
            analysis_adapter: Arc::new(FakeAnalyzer {
                fail: self.analysis_fails,
            }),
            image_adapter: Arc::new(FakeImager {
                fail: self.image_fails,
            }),
        };
        router(Arc::new(state))
    }
}

pub fn test_app() -> Router {
    TestAppBuilder::new().build()
}

//=========================================================================================
// Request Helpers
//=========================================================================================

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send_json(app, Method::POST, uri, body).await
}

/// Creates an entry and returns its id.
pub async fn create_entry(app: &Router, body: Value) -> String {
    let (status, body) = post_json(app, "/entries", body).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body["entry"]["id"].as_str().unwrap().to_string()
}
