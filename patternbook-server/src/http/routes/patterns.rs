//! Pattern endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use patternbook_core::models::{NewPattern, PatternUpdate};

use crate::db::repos::{PatternRecord, PatternRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ValidJson;
use crate::http::server::AppState;

/// Mutation confirmation envelope
#[derive(Serialize)]
pub struct PatternMutation {
    pub message: String,
    pub amigurumi_id: i64,
}

/// GET /foundation_list - all patterns in insertion order
async fn list_patterns(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PatternRecord>>, ApiError> {
    let patterns = PatternRepo::new(&state.pool).list().await?;
    Ok(Json(patterns))
}

/// POST /foundation_list - register a new pattern
async fn create_pattern(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<NewPattern>,
) -> Result<Json<PatternMutation>, ApiError> {
    body.validate()?;
    let record = PatternRepo::new(&state.pool).create(body).await?;

    Ok(Json(PatternMutation {
        message: format!("Amigurumi {} added successfully!", record.name),
        amigurumi_id: record.amigurumi_id,
    }))
}

/// PUT /foundation_list/{amigurumi_id} - partial update
async fn update_pattern(
    State(state): State<Arc<AppState>>,
    Path(amigurumi_id): Path<i64>,
    ValidJson(body): ValidJson<PatternUpdate>,
) -> Result<Json<PatternMutation>, ApiError> {
    body.validate()?;
    let record = PatternRepo::new(&state.pool)
        .update(amigurumi_id, body)
        .await?;

    Ok(Json(PatternMutation {
        message: format!("Amigurumi {} updated successfully!", record.name),
        amigurumi_id: record.amigurumi_id,
    }))
}

/// DELETE /foundation_list/{amigurumi_id} - remove a pattern and, through
/// the cascade, everything that belongs to it
async fn delete_pattern(
    State(state): State<Arc<AppState>>,
    Path(amigurumi_id): Path<i64>,
) -> Result<Json<PatternMutation>, ApiError> {
    let record = PatternRepo::new(&state.pool).delete(amigurumi_id).await?;

    Ok(Json(PatternMutation {
        message: format!("Amigurumi {} removed successfully!", record.name),
        amigurumi_id: record.amigurumi_id,
    }))
}

/// Pattern routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/foundation_list", get(list_patterns).post(create_pattern))
        .route(
            "/foundation_list/{amigurumi_id}",
            put(update_pattern).delete(delete_pattern),
        )
}
