//! HTTP layer: router assembly, error mapping, extractors, and route modules.

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;
