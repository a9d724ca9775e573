//! Image endpoints
//!
//! Creation is a multipart upload: the file lands in the uploads
//! directory under a name derived from the generated row id, and the row
//! records that name. Everything else is plain JSON CRUD.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use patternbook_core::models::{
    parse_main_image_flag, FieldError, ImageUpdate, ValidationError,
};

use crate::db::repos::{ImageRecord, ImageRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ValidJson;
use crate::http::server::AppState;
use crate::store::ImageStore;

/// Mutation confirmation envelope
#[derive(Serialize)]
pub struct ImageMutation {
    pub message: String,
    pub image_id: i64,
}

/// Collected multipart upload form
struct UploadForm {
    amigurumi_id: i64,
    main_image: bool,
    recipe_id: i64,
    observation: Option<String>,
    file_name: String,
    data: Vec<u8>,
}

fn form_error(field: &'static str, msg: &str) -> ApiError {
    ApiError::Validation(ValidationError::single(FieldError::invalid(field, msg)))
}

fn form_missing(field: &str) -> ApiError {
    ApiError::Validation(ValidationError::single(FieldError::missing(field)))
}

/// Pull the known parts out of the multipart stream, ignoring extras.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut amigurumi_id: Option<i64> = None;
    let mut main_image = false;
    let mut recipe_id: i64 = 1;
    let mut observation: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::Validation(ValidationError::single(FieldError::body(
            e.to_string(),
            "value_error.malformed",
        )))
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "amigurumi_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| form_error("amigurumi_id", "unreadable form field"))?;
                amigurumi_id = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| form_error("amigurumi_id", "must be an integer"))?,
                );
            }
            "main_image" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| form_error("main_image", "unreadable form field"))?;
                main_image = parse_main_image_flag(&text);
            }
            "recipe_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| form_error("recipe_id", "unreadable form field"))?;
                recipe_id = text
                    .trim()
                    .parse()
                    .map_err(|_| form_error("recipe_id", "must be an integer"))?;
            }
            "observation" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| form_error("observation", "unreadable form field"))?;
                observation = Some(text);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| form_error("file", "unreadable file part"))?;
                file = Some((file_name, data.to_vec()));
            }
            _ => {}
        }
    }

    let amigurumi_id = amigurumi_id.ok_or_else(|| form_missing("amigurumi_id"))?;
    let (file_name, data) = file.ok_or_else(|| form_missing("file"))?;
    if data.is_empty() {
        return Err(ApiError::Validation(ValidationError::single(
            FieldError::empty("file"),
        )));
    }

    Ok(UploadForm {
        amigurumi_id,
        main_image,
        recipe_id,
        observation,
        file_name,
        data,
    })
}

/// GET /image - all image records, primary images first
async fn list_images(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ImageRecord>>, ApiError> {
    let images = ImageRepo::new(&state.pool).list().await?;
    Ok(Json(images))
}

/// POST /image - multipart upload of a new image
///
/// The file is staged to a temp name first; the row is inserted (demoting
/// other primaries in the same transaction when the main flag is set),
/// the stored name derived from the new id is written back, and only then
/// is the temp file renamed into place. Failures discard the temp file.
async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ImageMutation>, ApiError> {
    let form = read_upload_form(multipart).await?;

    let repo = ImageRepo::new(&state.pool);
    let store = ImageStore::new(&state.config.uploads_dir);

    let tmp = store.stage(&form.data).await?;

    let record = match repo
        .create(
            form.amigurumi_id,
            form.main_image,
            form.recipe_id,
            form.observation.as_deref(),
        )
        .await
    {
        Ok(record) => record,
        Err(e) => {
            store.discard(&tmp).await;
            return Err(e.into());
        }
    };

    let stored_name = ImageStore::file_name(
        form.amigurumi_id,
        record.image_id,
        &ImageStore::extension_of(&form.file_name),
    );

    if let Err(e) = repo.set_route(record.image_id, &stored_name).await {
        store.discard(&tmp).await;
        return Err(e.into());
    }
    if let Err(e) = store.commit(&tmp, &stored_name).await {
        store.discard(&tmp).await;
        return Err(e.into());
    }

    tracing::info!(
        amigurumi_id = form.amigurumi_id,
        image_id = record.image_id,
        file = %stored_name,
        "image stored"
    );

    Ok(Json(ImageMutation {
        message: "Image saved successfully!".to_string(),
        image_id: record.image_id,
    }))
}

/// PUT /image/{image_id} - metadata update; promoting to primary demotes
/// the pattern's other images
async fn update_image(
    State(state): State<Arc<AppState>>,
    Path(image_id): Path<i64>,
    ValidJson(body): ValidJson<ImageUpdate>,
) -> Result<Json<ImageMutation>, ApiError> {
    body.validate()?;
    let record = ImageRepo::new(&state.pool).update(image_id, body).await?;

    Ok(Json(ImageMutation {
        message: "Image updated successfully!".to_string(),
        image_id: record.image_id,
    }))
}

/// DELETE /image/{image_id} - remove the stored file, then the row.
/// A row pointing at a missing file is surfaced as a storage error.
async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(image_id): Path<i64>,
) -> Result<Json<ImageMutation>, ApiError> {
    let repo = ImageRepo::new(&state.pool);
    let record = repo.get(image_id).await?;

    if let Some(route) = &record.image_route {
        ImageStore::new(&state.config.uploads_dir)
            .remove(route)
            .await?;
    }

    repo.delete_row(image_id).await?;

    Ok(Json(ImageMutation {
        message: format!("Image {} removed successfully!", image_id),
        image_id,
    }))
}

/// Image routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/image", get(list_images).post(upload_image))
        .route("/image/{image_id}", put(update_image).delete(delete_image))
}
