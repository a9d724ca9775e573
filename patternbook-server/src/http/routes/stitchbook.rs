//! Stitch row endpoints, including the composed stitchbook read

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Json, Router,
};
use serde::Serialize;

use patternbook_core::models::{NewStitchRow, StitchRowUpdate};

use crate::db::repos::{StitchRowRepo, StitchbookEntry};
use crate::http::error::ApiError;
use crate::http::extractors::ValidJson;
use crate::http::server::AppState;

/// Mutation confirmation envelope
#[derive(Serialize)]
pub struct StitchRowMutation {
    pub message: String,
    pub line_id: i64,
}

/// Bulk delete confirmation
#[derive(Serialize)]
pub struct StitchRowBulkDelete {
    pub message: String,
    pub amigurumi_id: i64,
    pub removed: u64,
}

/// GET /stitchbook - the composed read: every construction part merged
/// with its stitch rows, parts without rows included once
async fn get_stitchbook(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StitchbookEntry>>, ApiError> {
    let entries = StitchRowRepo::new(&state.pool).stitchbook().await?;
    Ok(Json(entries))
}

/// POST /stitchbook - add a stitch row to a construction part
async fn create_row(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<NewStitchRow>,
) -> Result<Json<StitchRowMutation>, ApiError> {
    body.validate()?;
    let record = StitchRowRepo::new(&state.pool).create(body).await?;

    Ok(Json(StitchRowMutation {
        message: format!(
            "Row added successfully to amigurumi {}!",
            record.amigurumi_id
        ),
        line_id: record.line_id,
    }))
}

/// PUT /stitchbook/{line_id} - partial update
async fn update_row(
    State(state): State<Arc<AppState>>,
    Path(line_id): Path<i64>,
    ValidJson(body): ValidJson<StitchRowUpdate>,
) -> Result<Json<StitchRowMutation>, ApiError> {
    body.validate()?;
    let record = StitchRowRepo::new(&state.pool).update(line_id, body).await?;

    Ok(Json(StitchRowMutation {
        message: format!("Row {} updated successfully!", record.line_id),
        line_id: record.line_id,
    }))
}

/// DELETE /stitchbook/{line_id} - remove one stitch row
async fn delete_row(
    State(state): State<Arc<AppState>>,
    Path(line_id): Path<i64>,
) -> Result<Json<StitchRowMutation>, ApiError> {
    StitchRowRepo::new(&state.pool).delete(line_id).await?;

    Ok(Json(StitchRowMutation {
        message: format!("Row {} removed successfully!", line_id),
        line_id,
    }))
}

/// DELETE /stitchbook/amigurumi/{amigurumi_id} - drop every stitch row of
/// a pattern
async fn delete_rows_of_pattern(
    State(state): State<Arc<AppState>>,
    Path(amigurumi_id): Path<i64>,
) -> Result<Json<StitchRowBulkDelete>, ApiError> {
    let removed = StitchRowRepo::new(&state.pool)
        .delete_by_pattern(amigurumi_id)
        .await?;

    Ok(Json(StitchRowBulkDelete {
        message: format!("Rows of amigurumi {} removed successfully!", amigurumi_id),
        amigurumi_id,
        removed,
    }))
}

/// Stitch row routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stitchbook", get(get_stitchbook).post(create_row))
        .route("/stitchbook/{line_id}", put(update_row).delete(delete_row))
        .route(
            "/stitchbook/amigurumi/{amigurumi_id}",
            delete(delete_rows_of_pattern),
        )
}
