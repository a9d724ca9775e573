//! Stitch row repository
//!
//! Holds the row-by-row crochet instructions and the composed stitchbook
//! read: sequence elements outer-joined to their rows so parts without
//! rows still show up once.

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use patternbook_core::models::{NewStitchRow, StitchRowUpdate};

use super::{pattern_exists, DbError};

/// Stitch row record from the database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StitchRowRecord {
    pub line_id: i64,
    pub amigurumi_id: i64,
    pub observation: String,
    pub element_id: i64,
    pub number_row: i64,
    pub colour_id: i64,
    pub stich_sequence: String,
}

/// One entry of the composed stitchbook read: a sequence element merged
/// with one of its stitch rows. The stitch fields are null for elements
/// that have no rows yet.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StitchbookEntry {
    pub amigurumi_id: i64,
    pub element_id: i64,
    pub element_order: i64,
    pub element_name: String,
    pub repetition: i64,
    pub line_id: Option<i64>,
    pub number_row: Option<i64>,
    pub colour_id: Option<i64>,
    pub stich_sequence: Option<String>,
    pub observation: Option<String>,
}

/// Stitch row repository
pub struct StitchRowRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StitchRowRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// The composed stitchbook: every sequence element, outer-joined to its
    /// rows, ordered by pattern, build order, then row number.
    pub async fn stitchbook(&self) -> Result<Vec<StitchbookEntry>, DbError> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                s.amigurumi_id,
                s.element_id,
                s.element_order,
                s.element_name,
                s.repetition,
                b.line_id,
                b.number_row,
                b.colour_id,
                b.stich_sequence,
                b.observation
            FROM stitchbook_sequence s
            LEFT JOIN stitchbook b
                ON b.amigurumi_id = s.amigurumi_id
               AND b.element_id = s.element_id
            ORDER BY s.amigurumi_id ASC, s.element_order ASC, b.number_row ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Create a stitch row for an existing pattern.
    pub async fn create(&self, new: NewStitchRow) -> Result<StitchRowRecord, DbError> {
        if !pattern_exists(self.pool, new.amigurumi_id).await? {
            return Err(DbError::NotFound {
                resource: "amigurumi",
                id: new.amigurumi_id,
            });
        }

        let element_exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM stitchbook_sequence WHERE element_id = ?)")
                .bind(new.element_id)
                .fetch_one(self.pool)
                .await?;
        if !element_exists.0 {
            return Err(DbError::NotFound {
                resource: "element",
                id: new.element_id,
            });
        }

        let record = sqlx::query_as(
            r#"
            INSERT INTO stitchbook
                (amigurumi_id, observation, element_id, number_row, colour_id, stich_sequence)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING line_id, amigurumi_id, observation, element_id, number_row,
                      colour_id, stich_sequence
            "#,
        )
        .bind(new.amigurumi_id)
        .bind(&new.observation)
        .bind(new.element_id)
        .bind(new.number_row)
        .bind(new.colour_id)
        .bind(&new.stich_sequence)
        .fetch_one(self.pool)
        .await?;

        Ok(record)
    }

    /// Apply a partial update: only fields present in the payload change.
    pub async fn update(
        &self,
        line_id: i64,
        update: StitchRowUpdate,
    ) -> Result<StitchRowRecord, DbError> {
        let mut tx = self.pool.begin().await?;

        let mut current: StitchRowRecord = sqlx::query_as(
            r#"
            SELECT line_id, amigurumi_id, observation, element_id, number_row,
                   colour_id, stich_sequence
            FROM stitchbook
            WHERE line_id = ?
            "#,
        )
        .bind(line_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::NotFound {
            resource: "line",
            id: line_id,
        })?;

        if let Some(element_id) = update.element_id {
            current.element_id = element_id;
        }
        if let Some(number_row) = update.number_row {
            current.number_row = number_row;
        }
        if let Some(colour_id) = update.colour_id {
            current.colour_id = colour_id;
        }
        if let Some(seq) = update.stich_sequence {
            current.stich_sequence = seq;
        }
        if let Some(observation) = update.observation {
            current.observation = observation;
        }

        sqlx::query(
            r#"
            UPDATE stitchbook
            SET observation = ?, element_id = ?, number_row = ?, colour_id = ?,
                stich_sequence = ?
            WHERE line_id = ?
            "#,
        )
        .bind(&current.observation)
        .bind(current.element_id)
        .bind(current.number_row)
        .bind(current.colour_id)
        .bind(&current.stich_sequence)
        .bind(line_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(current)
    }

    /// Delete a single stitch row.
    pub async fn delete(&self, line_id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM stitchbook WHERE line_id = ?")
            .bind(line_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "line",
                id: line_id,
            });
        }
        Ok(())
    }

    /// Bulk-delete every stitch row of a pattern.
    pub async fn delete_by_pattern(&self, amigurumi_id: i64) -> Result<u64, DbError> {
        if !pattern_exists(self.pool, amigurumi_id).await? {
            return Err(DbError::NotFound {
                resource: "amigurumi",
                id: amigurumi_id,
            });
        }

        let result = sqlx::query("DELETE FROM stitchbook WHERE amigurumi_id = ?")
            .bind(amigurumi_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::{PatternRepo, SequenceRepo};
    use crate::db::{migrations, pool::memory_pool};
    use patternbook_core::models::{NewPattern, NewSequenceElement};

    async fn setup() -> (SqlitePool, i64) {
        let pool = memory_pool().await.expect("pool");
        migrations::run(&pool).await.expect("migrations");
        let pattern = PatternRepo::new(&pool)
            .create(NewPattern {
                name: "Bear".into(),
                size: 20.0,
                autor: "Ana".into(),
                date: None,
                link: None,
                amigurumi_id_of_linked_amigurumi: None,
                note: None,
            })
            .await
            .expect("pattern");
        (pool, pattern.amigurumi_id)
    }

    async fn element(pool: &SqlitePool, amigurumi_id: i64, order: i64, name: &str) -> i64 {
        SequenceRepo::new(pool)
            .create(NewSequenceElement {
                amigurumi_id,
                element_order: order,
                element_name: name.into(),
                repetition: 1,
            })
            .await
            .expect("element")
            .element_id
    }

    fn row(amigurumi_id: i64, element_id: i64, number_row: i64, seq: &str) -> NewStitchRow {
        NewStitchRow {
            amigurumi_id,
            element_id,
            number_row,
            colour_id: 2,
            stich_sequence: seq.into(),
            observation: "ring".into(),
        }
    }

    #[tokio::test]
    async fn create_requires_pattern_and_element() {
        let (pool, id) = setup().await;
        let repo = StitchRowRepo::new(&pool);

        let err = repo.create(row(77, 1, 1, "6sc")).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { id: 77, .. }));

        let err = repo.create(row(id, 9, 1, "6sc")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::NotFound {
                resource: "element",
                id: 9
            }
        ));
    }

    #[tokio::test]
    async fn stitchbook_orders_and_merges() {
        let (pool, id) = setup().await;
        let head = element(&pool, id, 1, "Head").await;
        let body = element(&pool, id, 2, "Body").await;
        let repo = StitchRowRepo::new(&pool);

        // Insert out of order; the read must sort by build order then row.
        repo.create(row(id, body, 1, "8sc")).await.expect("body r1");
        repo.create(row(id, head, 2, "inc x6")).await.expect("head r2");
        repo.create(row(id, head, 1, "6sc")).await.expect("head r1");

        let entries = repo.stitchbook().await.expect("stitchbook");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].element_name, "Head");
        assert_eq!(entries[0].number_row, Some(1));
        assert_eq!(entries[1].element_name, "Head");
        assert_eq!(entries[1].number_row, Some(2));
        assert_eq!(entries[2].element_name, "Body");
    }

    #[tokio::test]
    async fn element_without_rows_appears_once_with_empty_stitch_fields() {
        let (pool, id) = setup().await;
        let head = element(&pool, id, 1, "Head").await;
        element(&pool, id, 2, "Body").await;
        let repo = StitchRowRepo::new(&pool);

        repo.create(row(id, head, 1, "6sc")).await.expect("head r1");

        let entries = repo.stitchbook().await.expect("stitchbook");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].element_name, "Body");
        assert_eq!(entries[1].line_id, None);
        assert_eq!(entries[1].stich_sequence, None);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let (pool, id) = setup().await;
        let head = element(&pool, id, 1, "Head").await;
        let repo = StitchRowRepo::new(&pool);
        let record = repo.create(row(id, head, 1, "6sc")).await.expect("create");

        let updated = repo
            .update(
                record.line_id,
                StitchRowUpdate {
                    stich_sequence: Some("inc x6".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.stich_sequence, "inc x6");
        assert_eq!(updated.number_row, 1);
        assert_eq!(updated.observation, "ring");
    }
}
