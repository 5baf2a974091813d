//! services/api/src/web/statistics.rs
//!
//! Journal statistics for one user over an optional date window.

use crate::error::ApiError;
use crate::web::state::AppState;
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    Json,
};
use dream_journal_core::{
    compute_statistics, validation::parse_optional_date, DateRange, LabelCount, StatisticsReport,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatisticsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DateRangeBody {
    start: String,
    end: String,
}

/// Top lists are `[label, count]` pairs.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatisticsBody {
    total_dreams: usize,
    average_lucidity: f64,
    average_vividness: f64,
    #[schema(value_type = Vec<Object>)]
    most_common_themes: Vec<(String, usize)>,
    #[schema(value_type = Vec<Object>)]
    most_common_emotions: Vec<(String, usize)>,
    #[schema(value_type = Vec<Object>)]
    most_common_symbols: Vec<(String, usize)>,
    dreams_with_images: usize,
    date_range: DateRangeBody,
}

#[derive(Serialize, ToSchema)]
pub struct StatisticsResponse {
    success: bool,
    statistics: StatisticsBody,
}

fn pairs(labels: Vec<LabelCount>) -> Vec<(String, usize)> {
    labels
        .into_iter()
        .map(|LabelCount { label, count }| (label, count))
        .collect()
}

impl From<StatisticsReport> for StatisticsBody {
    fn from(report: StatisticsReport) -> Self {
        Self {
            total_dreams: report.total_dreams,
            average_lucidity: report.average_lucidity,
            average_vividness: report.average_vividness,
            most_common_themes: pairs(report.most_common_themes),
            most_common_emotions: pairs(report.most_common_emotions),
            most_common_symbols: pairs(report.most_common_symbols),
            dreams_with_images: report.dreams_with_images,
            date_range: DateRangeBody {
                start: report.date_range.start_label(),
                end: report.date_range.end_label(),
            },
        }
    }
}

/// Summarise a user's journal.
#[utoipa::path(
    get,
    path = "/statistics/{user_id}",
    params(
        ("user_id" = String, Path, description = "Journal owner"),
        StatisticsQuery
    ),
    responses(
        (status = 200, description = "Statistics report", body = StatisticsResponse),
        (status = 400, description = "Invalid date")
    )
)]
pub async fn get_statistics_handler(
    State(app_state): State<Arc<AppState>>,
    user_id: Result<Path<String>, PathRejection>,
    query: Result<Query<StatisticsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(user_id) = user_id?;
    let Query(query) = query?;
    let range = DateRange::new(
        parse_optional_date("start_date", query.start_date.as_deref())?,
        parse_optional_date("end_date", query.end_date.as_deref())?,
    );

    let entries = app_state.db.list_entries(&user_id, &range, None).await?;
    let report = compute_statistics(&entries, &range);

    Ok(Json(StatisticsResponse {
        success: true,
        statistics: report.into(),
    }))
}
