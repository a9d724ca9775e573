//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - One repository per catalog table, borrowing the pool
//! - Partial updates are read-overlay-write inside a transaction
//! - Multi-step invariants (single primary image) stay in one transaction

pub mod images;
pub mod materials;
pub mod patterns;
pub mod sequence;
pub mod stitch_rows;

pub use images::{ImageRecord, ImageRepo};
pub use materials::{MaterialRecord, MaterialRepo};
pub use patterns::{PatternRecord, PatternRepo};
pub use sequence::{SequenceElementRecord, SequenceRepo};
pub use stitch_rows::{StitchRowRecord, StitchRowRepo, StitchbookEntry};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} {id}")]
    NotFound { resource: &'static str, id: i64 },
}

/// Check that a pattern row exists. Works on a pool or an open transaction.
pub(crate) async fn pattern_exists<'e, E>(executor: E, amigurumi_id: i64) -> Result<bool, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM foundation_list WHERE amigurumi_id = ?)")
            .bind(amigurumi_id)
            .fetch_one(executor)
            .await?;
    Ok(exists.0)
}
