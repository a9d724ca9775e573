//! patternbook-server: HTTP backend for the amigurumi pattern catalog
//!
//! Exposes CRUD endpoints for the five catalog tables, a composed
//! stitchbook read joining construction sequence and stitch rows, multipart
//! image upload, and a static asset server for uploaded images.

pub mod db;
pub mod http;
pub mod store;

pub use db::pool::{create_pool, memory_pool};
pub use http::server::{build_router, run_server, AppState};
