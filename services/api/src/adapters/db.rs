//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dream_journal_core::{
    domain::{
        DateRange, DreamEntry, DreamEntryPatch, JournalPromptResponse, NewDreamEntry,
        NewPromptResponse,
    },
    ports::{DatabaseService, PortError, PortResult},
    tags::{decode_tags, encode_tags, TagKind},
    ArtStyle, CardDesign, Rating,
};
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

const ENTRY_COLUMNS: &str = "id, user_id, entry_date, created_at, updated_at, \
     original_transcription, enhanced_description, dream_title, emotions, themes, symbols, \
     lucidity_level, vividness_level, ai_prompt, art_style, image_url, card_design";

const PROMPT_COLUMNS: &str =
    "id, dream_entry_id, prompt_text, response_transcription, prompt_order, created_at";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn entry_not_found(entry_id: Uuid) -> impl FnOnce(sqlx::Error) -> PortError {
    move |e| match e {
        sqlx::Error::RowNotFound => PortError::NotFound(format!("Dream entry {} not found", entry_id)),
        _ => PortError::Unexpected(e.to_string()),
    }
}

fn encode_card(card: &CardDesign) -> PortResult<String> {
    serde_json::to_string(card).map_err(|e| PortError::Unexpected(e.to_string()))
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct DreamEntryRecord {
    id: Uuid,
    user_id: String,
    entry_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    original_transcription: Option<String>,
    enhanced_description: Option<String>,
    dream_title: Option<String>,
    emotions: Option<String>,
    themes: Option<String>,
    symbols: Option<String>,
    lucidity_level: i32,
    vividness_level: i32,
    ai_prompt: Option<String>,
    art_style: Option<String>,
    image_url: Option<String>,
    card_design: Option<String>,
}

impl DreamEntryRecord {
    /// Stored text that no longer decodes is isolated to the one field of the
    /// one entry it belongs to.
    fn to_domain(self) -> DreamEntry {
        let emotions = self.labels(TagKind::Emotions, self.emotions.as_deref());
        let themes = self.labels(TagKind::Themes, self.themes.as_deref());
        let symbols = self.labels(TagKind::Symbols, self.symbols.as_deref());

        let card_design = self.card_design.as_deref().and_then(|raw| {
            serde_json::from_str::<CardDesign>(raw)
                .map_err(|e| warn!("Ignoring malformed card design on entry {}: {}", self.id, e))
                .ok()
        });

        DreamEntry {
            id: self.id,
            lucidity_level: stored_rating(self.id, "lucidity_level", self.lucidity_level),
            vividness_level: stored_rating(self.id, "vividness_level", self.vividness_level),
            art_style: ArtStyle::parse_or_default(self.art_style.as_deref()),
            user_id: self.user_id,
            entry_date: self.entry_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
            original_transcription: self.original_transcription,
            enhanced_description: self.enhanced_description,
            dream_title: self.dream_title,
            emotions,
            themes,
            symbols,
            ai_prompt: self.ai_prompt,
            image_url: self.image_url,
            card_design,
        }
    }

    fn labels(&self, kind: TagKind, raw: Option<&str>) -> Vec<String> {
        decode_tags(raw).unwrap_or_else(|e| {
            warn!("Treating {} of entry {} as empty: {}", kind, self.id, e);
            Vec::new()
        })
    }
}

/// The table carries a CHECK constraint, so this only trips on hand-edited rows.
fn stored_rating(entry_id: Uuid, field: &'static str, value: i32) -> Rating {
    Rating::parse(field, i64::from(value)).unwrap_or_else(|e| {
        warn!("Entry {} has an invalid stored rating: {}", entry_id, e);
        Rating::default()
    })
}

#[derive(FromRow)]
struct PromptResponseRecord {
    id: Uuid,
    dream_entry_id: Uuid,
    prompt_text: String,
    response_transcription: Option<String>,
    prompt_order: i32,
    created_at: DateTime<Utc>,
}
impl PromptResponseRecord {
    fn to_domain(self) -> JournalPromptResponse {
        JournalPromptResponse {
            id: self.id,
            dream_entry_id: self.dream_entry_id,
            prompt_text: self.prompt_text,
            response_transcription: self.response_transcription,
            prompt_order: self.prompt_order,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn ping(&self) -> PortResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn create_entry(&self, entry: NewDreamEntry) -> PortResult<DreamEntry> {
        let card_design = entry.card_design.as_ref().map(encode_card).transpose()?;
        let sql = format!(
            "INSERT INTO dream_entries (id, user_id, entry_date, original_transcription, \
             enhanced_description, dream_title, emotions, themes, symbols, lucidity_level, \
             vividness_level, ai_prompt, art_style, image_url, card_design) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {ENTRY_COLUMNS}"
        );

        let record = sqlx::query_as::<_, DreamEntryRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(&entry.user_id)
            .bind(entry.entry_date)
            .bind(&entry.original_transcription)
            .bind(&entry.enhanced_description)
            .bind(&entry.dream_title)
            .bind(encode_tags(&entry.emotions))
            .bind(encode_tags(&entry.themes))
            .bind(encode_tags(&entry.symbols))
            .bind(i32::from(entry.lucidity_level.get()))
            .bind(i32::from(entry.vividness_level.get()))
            .bind(&entry.ai_prompt)
            .bind(entry.art_style.as_str())
            .bind(&entry.image_url)
            .bind(card_design)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;

        Ok(record.to_domain())
    }

    async fn get_entry(&self, entry_id: Uuid) -> PortResult<DreamEntry> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM dream_entries WHERE id = $1");
        let record = sqlx::query_as::<_, DreamEntryRecord>(&sql)
            .bind(entry_id)
            .fetch_one(&self.pool)
            .await
            .map_err(entry_not_found(entry_id))?;
        Ok(record.to_domain())
    }

    async fn list_entries(
        &self,
        user_id: &str,
        range: &DateRange,
        limit: Option<u32>,
    ) -> PortResult<Vec<DreamEntry>> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM dream_entries \
             WHERE user_id = $1 \
               AND ($2::date IS NULL OR entry_date >= $2) \
               AND ($3::date IS NULL OR entry_date <= $3) \
             ORDER BY entry_date DESC, created_at DESC \
             LIMIT $4"
        );
        let records = sqlx::query_as::<_, DreamEntryRecord>(&sql)
            .bind(user_id)
            .bind(range.start)
            .bind(range.end)
            .bind(limit.map(i64::from))
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        Ok(records.into_iter().map(DreamEntryRecord::to_domain).collect())
    }

    async fn update_entry(&self, entry_id: Uuid, patch: DreamEntryPatch) -> PortResult<DreamEntry> {
        let card_design = patch.card_design.as_ref().map(encode_card).transpose()?;
        // updated_at is bumped by at least a microsecond so it strictly increases.
        let sql = format!(
            "UPDATE dream_entries SET \
               enhanced_description = COALESCE($2, enhanced_description), \
               dream_title = COALESCE($3, dream_title), \
               emotions = COALESCE($4, emotions), \
               themes = COALESCE($5, themes), \
               symbols = COALESCE($6, symbols), \
               lucidity_level = COALESCE($7, lucidity_level), \
               vividness_level = COALESCE($8, vividness_level), \
               ai_prompt = COALESCE($9, ai_prompt), \
               art_style = COALESCE($10, art_style), \
               image_url = COALESCE($11, image_url), \
               card_design = COALESCE($12, card_design), \
               updated_at = GREATEST(now(), updated_at + interval '1 microsecond') \
             WHERE id = $1 \
             RETURNING {ENTRY_COLUMNS}"
        );

        let record = sqlx::query_as::<_, DreamEntryRecord>(&sql)
            .bind(entry_id)
            .bind(patch.enhanced_description)
            .bind(patch.dream_title)
            .bind(patch.emotions.as_deref().map(encode_tags))
            .bind(patch.themes.as_deref().map(encode_tags))
            .bind(patch.symbols.as_deref().map(encode_tags))
            .bind(patch.lucidity_level.map(|r| i32::from(r.get())))
            .bind(patch.vividness_level.map(|r| i32::from(r.get())))
            .bind(patch.ai_prompt)
            .bind(patch.art_style.map(ArtStyle::as_str))
            .bind(patch.image_url)
            .bind(card_design)
            .fetch_one(&self.pool)
            .await
            .map_err(entry_not_found(entry_id))?;

        Ok(record.to_domain())
    }

    async fn create_prompt_response(
        &self,
        response: NewPromptResponse,
    ) -> PortResult<JournalPromptResponse> {
        let sql = format!(
            "INSERT INTO journal_prompts (id, dream_entry_id, prompt_text, response_transcription, prompt_order) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {PROMPT_COLUMNS}"
        );
        let record = sqlx::query_as::<_, PromptResponseRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(response.dream_entry_id)
            .bind(&response.prompt_text)
            .bind(&response.response_transcription)
            .bind(response.prompt_order)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e {
                    if db.is_foreign_key_violation() {
                        return PortError::NotFound(format!(
                            "Dream entry {} not found",
                            response.dream_entry_id
                        ));
                    }
                }
                unexpected(e)
            })?;
        Ok(record.to_domain())
    }

    async fn get_prompt_responses(&self, entry_id: Uuid) -> PortResult<Vec<JournalPromptResponse>> {
        let sql = format!(
            "SELECT {PROMPT_COLUMNS} FROM journal_prompts \
             WHERE dream_entry_id = $1 ORDER BY prompt_order ASC, created_at ASC"
        );
        let records = sqlx::query_as::<_, PromptResponseRecord>(&sql)
            .bind(entry_id)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        Ok(records.into_iter().map(PromptResponseRecord::to_domain).collect())
    }
}
