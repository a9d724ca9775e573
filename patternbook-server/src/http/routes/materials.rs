//! Material endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Json, Router,
};
use serde::Serialize;

use patternbook_core::models::{MaterialUpdate, NewMaterial};

use crate::db::repos::{MaterialRecord, MaterialRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ValidJson;
use crate::http::server::AppState;

/// Mutation confirmation envelope
#[derive(Serialize)]
pub struct MaterialMutation {
    pub message: String,
    pub material_list_id: i64,
}

/// Bulk delete confirmation
#[derive(Serialize)]
pub struct MaterialBulkDelete {
    pub message: String,
    pub amigurumi_id: i64,
    pub removed: u64,
}

/// GET /material_list - all material lines, grouped by pattern and set
async fn list_materials(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MaterialRecord>>, ApiError> {
    let materials = MaterialRepo::new(&state.pool).list().await?;
    Ok(Json(materials))
}

/// POST /material_list - add a material line to an existing pattern
async fn create_material(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<NewMaterial>,
) -> Result<Json<MaterialMutation>, ApiError> {
    body.validate()?;
    let record = MaterialRepo::new(&state.pool).create(body).await?;

    Ok(Json(MaterialMutation {
        message: format!(
            "Material added successfully to amigurumi {}!",
            record.amigurumi_id
        ),
        material_list_id: record.material_list_id,
    }))
}

/// PUT /material_list/{material_list_id} - partial update
async fn update_material(
    State(state): State<Arc<AppState>>,
    Path(material_list_id): Path<i64>,
    ValidJson(body): ValidJson<MaterialUpdate>,
) -> Result<Json<MaterialMutation>, ApiError> {
    body.validate()?;
    let record = MaterialRepo::new(&state.pool)
        .update(material_list_id, body)
        .await?;

    Ok(Json(MaterialMutation {
        message: format!("Material {} updated successfully!", record.material_list_id),
        material_list_id: record.material_list_id,
    }))
}

/// DELETE /material_list/{material_list_id} - remove one material line
async fn delete_material(
    State(state): State<Arc<AppState>>,
    Path(material_list_id): Path<i64>,
) -> Result<Json<MaterialMutation>, ApiError> {
    MaterialRepo::new(&state.pool).delete(material_list_id).await?;

    Ok(Json(MaterialMutation {
        message: format!("Material {} removed successfully!", material_list_id),
        material_list_id,
    }))
}

/// DELETE /material_list/amigurumi/{amigurumi_id} - drop every material
/// line of a pattern
async fn delete_materials_of_pattern(
    State(state): State<Arc<AppState>>,
    Path(amigurumi_id): Path<i64>,
) -> Result<Json<MaterialBulkDelete>, ApiError> {
    let removed = MaterialRepo::new(&state.pool)
        .delete_by_pattern(amigurumi_id)
        .await?;

    Ok(Json(MaterialBulkDelete {
        message: format!(
            "Materials of amigurumi {} removed successfully!",
            amigurumi_id
        ),
        amigurumi_id,
        removed,
    }))
}

/// Material routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/material_list", get(list_materials).post(create_material))
        .route(
            "/material_list/{material_list_id}",
            put(update_material).delete(delete_material),
        )
        .route(
            "/material_list/amigurumi/{amigurumi_id}",
            delete(delete_materials_of_pattern),
        )
}
