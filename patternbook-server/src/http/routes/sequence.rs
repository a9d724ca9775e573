//! Sequence element endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Json, Router,
};
use serde::Serialize;

use patternbook_core::models::{NewSequenceElement, SequenceElementUpdate};

use crate::db::repos::{SequenceElementRecord, SequenceRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ValidJson;
use crate::http::server::AppState;

/// Mutation confirmation envelope
#[derive(Serialize)]
pub struct SequenceMutation {
    pub message: String,
    pub element_id: i64,
}

/// Bulk delete confirmation
#[derive(Serialize)]
pub struct SequenceBulkDelete {
    pub message: String,
    pub amigurumi_id: i64,
    pub removed: u64,
}

/// GET /stitchbook_sequence - all construction parts in build order
async fn list_elements(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SequenceElementRecord>>, ApiError> {
    let elements = SequenceRepo::new(&state.pool).list().await?;
    Ok(Json(elements))
}

/// POST /stitchbook_sequence - add a construction part to a pattern
async fn create_element(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<NewSequenceElement>,
) -> Result<Json<SequenceMutation>, ApiError> {
    body.validate()?;
    let record = SequenceRepo::new(&state.pool).create(body).await?;

    Ok(Json(SequenceMutation {
        message: format!(
            "Element {} added successfully to amigurumi {}!",
            record.element_name, record.amigurumi_id
        ),
        element_id: record.element_id,
    }))
}

/// PUT /stitchbook_sequence/{element_id} - partial update
async fn update_element(
    State(state): State<Arc<AppState>>,
    Path(element_id): Path<i64>,
    ValidJson(body): ValidJson<SequenceElementUpdate>,
) -> Result<Json<SequenceMutation>, ApiError> {
    body.validate()?;
    let record = SequenceRepo::new(&state.pool)
        .update(element_id, body)
        .await?;

    Ok(Json(SequenceMutation {
        message: format!("Element {} updated successfully!", record.element_id),
        element_id: record.element_id,
    }))
}

/// DELETE /stitchbook_sequence/{element_id} - remove one construction part
async fn delete_element(
    State(state): State<Arc<AppState>>,
    Path(element_id): Path<i64>,
) -> Result<Json<SequenceMutation>, ApiError> {
    SequenceRepo::new(&state.pool).delete(element_id).await?;

    Ok(Json(SequenceMutation {
        message: format!("Element {} removed successfully!", element_id),
        element_id,
    }))
}

/// DELETE /stitchbook_sequence/amigurumi/{amigurumi_id} - drop every part
/// of a pattern
async fn delete_elements_of_pattern(
    State(state): State<Arc<AppState>>,
    Path(amigurumi_id): Path<i64>,
) -> Result<Json<SequenceBulkDelete>, ApiError> {
    let removed = SequenceRepo::new(&state.pool)
        .delete_by_pattern(amigurumi_id)
        .await?;

    Ok(Json(SequenceBulkDelete {
        message: format!(
            "Elements of amigurumi {} removed successfully!",
            amigurumi_id
        ),
        amigurumi_id,
        removed,
    }))
}

/// Sequence element routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/stitchbook_sequence",
            get(list_elements).post(create_element),
        )
        .route(
            "/stitchbook_sequence/{element_id}",
            put(update_element).delete(delete_element),
        )
        .route(
            "/stitchbook_sequence/amigurumi/{amigurumi_id}",
            delete(delete_elements_of_pattern),
        )
}
