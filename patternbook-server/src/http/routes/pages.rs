//! Documentation pages
//!
//! Serves static HTML pages from the configured pages directory and
//! redirects `/openapi?doc=...` to the chosen viewer page.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::http::server::AppState;

/// Viewers a client may ask for by name
const KNOWN_DOCS: &[&str] = &["swagger", "redoc", "rapidoc", "scalar", "rapipdf", "elements"];

#[derive(Deserialize)]
struct OpenApiQuery {
    doc: Option<String>,
}

/// GET /openapi - redirect to the requested documentation viewer,
/// defaulting to swagger
async fn openapi_redirect(Query(query): Query<OpenApiQuery>) -> Response {
    let doc = query.doc.as_deref().unwrap_or("swagger");
    if !KNOWN_DOCS.contains(&doc) {
        return (
            StatusCode::NOT_FOUND,
            format!("unknown documentation viewer: {}", doc),
        )
            .into_response();
    }
    Redirect::to(&format!("/pages/{}", doc)).into_response()
}

/// GET /pages/{page} - serve `{pages_dir}/{page}.html`
async fn serve_page(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
) -> Response {
    // Page names are bare identifiers; anything path-like is rejected.
    if page.is_empty()
        || !page
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return (StatusCode::NOT_FOUND, "page not found").into_response();
    }

    let path = state.config.pages_dir.join(format!("{}.html", page));
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            bytes,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "page not found").into_response(),
    }
}

/// Documentation routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/openapi", get(openapi_redirect))
        .route("/pages/{page}", get(serve_page))
}
