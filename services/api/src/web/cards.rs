//! services/api/src/web/cards.rs

use crate::error::ApiError;
use crate::web::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::IntoResponse,
    Json,
};
use dream_journal_core::{CardDesign, DreamEntryPatch};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, ToSchema)]
pub struct CardResponse {
    success: bool,
    #[schema(value_type = Object)]
    card_design: CardDesign,
}

/// Build the collectible card for an entry and store it on the entry.
#[utoipa::path(
    post,
    path = "/cards/{id}",
    params(("id" = Uuid, Path, description = "Dream entry id")),
    responses(
        (status = 200, description = "Card design", body = CardResponse),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn create_card_handler(
    State(app_state): State<Arc<AppState>>,
    entry_id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(entry_id) = entry_id?;
    let entry = app_state.db.get_entry(entry_id).await?;
    let card_design = CardDesign::for_entry(&entry);

    app_state
        .db
        .update_entry(
            entry_id,
            DreamEntryPatch {
                card_design: Some(card_design.clone()),
                ..Default::default()
            },
        )
        .await?;
    info!("Stored card design for entry {}", entry_id);

    Ok(Json(CardResponse {
        success: true,
        card_design,
    }))
}
