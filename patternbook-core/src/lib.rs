//! patternbook-core: domain models and configuration for the pattern catalog
//!
//! Holds everything the HTTP layer validates against: per-entity create and
//! update payloads, the field-level validation error shape, and the server
//! configuration. No database or framework types leak in here.

pub mod config;
pub mod error;
pub mod models;

pub use config::ServerConfig;
pub use error::{CoreError, Result};
pub use models::ValidationError;
