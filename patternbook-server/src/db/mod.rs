//! Database layer: pool setup, schema migrations, and per-entity repositories.

pub mod migrations;
pub mod pool;
pub mod repos;
