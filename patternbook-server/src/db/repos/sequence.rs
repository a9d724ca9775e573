//! Sequence element repository
//!
//! Sequence elements are the named construction parts of a pattern,
//! ordered by `element_order`.

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use patternbook_core::models::{NewSequenceElement, SequenceElementUpdate};

use super::{pattern_exists, DbError};

/// Sequence element record from the database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SequenceElementRecord {
    pub element_id: i64,
    pub amigurumi_id: i64,
    pub element_order: i64,
    pub element_name: String,
    pub repetition: i64,
}

/// Sequence element repository
pub struct SequenceRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SequenceRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all sequence elements ordered by pattern, then build order.
    pub async fn list(&self) -> Result<Vec<SequenceElementRecord>, DbError> {
        let rows = sqlx::query_as(
            r#"
            SELECT element_id, amigurumi_id, element_order, element_name, repetition
            FROM stitchbook_sequence
            ORDER BY amigurumi_id ASC, element_order ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Create a sequence element for an existing pattern.
    pub async fn create(&self, new: NewSequenceElement) -> Result<SequenceElementRecord, DbError> {
        if !pattern_exists(self.pool, new.amigurumi_id).await? {
            return Err(DbError::NotFound {
                resource: "amigurumi",
                id: new.amigurumi_id,
            });
        }

        let record = sqlx::query_as(
            r#"
            INSERT INTO stitchbook_sequence
                (amigurumi_id, element_order, element_name, repetition)
            VALUES (?, ?, ?, ?)
            RETURNING element_id, amigurumi_id, element_order, element_name, repetition
            "#,
        )
        .bind(new.amigurumi_id)
        .bind(new.element_order)
        .bind(&new.element_name)
        .bind(new.repetition)
        .fetch_one(self.pool)
        .await?;

        Ok(record)
    }

    /// Apply a partial update: only fields present in the payload change.
    pub async fn update(
        &self,
        element_id: i64,
        update: SequenceElementUpdate,
    ) -> Result<SequenceElementRecord, DbError> {
        let mut tx = self.pool.begin().await?;

        let mut current: SequenceElementRecord = sqlx::query_as(
            r#"
            SELECT element_id, amigurumi_id, element_order, element_name, repetition
            FROM stitchbook_sequence
            WHERE element_id = ?
            "#,
        )
        .bind(element_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::NotFound {
            resource: "element",
            id: element_id,
        })?;

        if let Some(order) = update.element_order {
            current.element_order = order;
        }
        if let Some(name) = update.element_name {
            current.element_name = name;
        }
        if let Some(repetition) = update.repetition {
            current.repetition = repetition;
        }

        sqlx::query(
            r#"
            UPDATE stitchbook_sequence
            SET element_order = ?, element_name = ?, repetition = ?
            WHERE element_id = ?
            "#,
        )
        .bind(current.element_order)
        .bind(&current.element_name)
        .bind(current.repetition)
        .bind(element_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(current)
    }

    /// Delete a single sequence element.
    pub async fn delete(&self, element_id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM stitchbook_sequence WHERE element_id = ?")
            .bind(element_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "element",
                id: element_id,
            });
        }
        Ok(())
    }

    /// Bulk-delete every sequence element of a pattern.
    pub async fn delete_by_pattern(&self, amigurumi_id: i64) -> Result<u64, DbError> {
        if !pattern_exists(self.pool, amigurumi_id).await? {
            return Err(DbError::NotFound {
                resource: "amigurumi",
                id: amigurumi_id,
            });
        }

        let result = sqlx::query("DELETE FROM stitchbook_sequence WHERE amigurumi_id = ?")
            .bind(amigurumi_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::PatternRepo;
    use crate::db::{migrations, pool::memory_pool};
    use patternbook_core::models::NewPattern;

    async fn setup_with_pattern() -> (SqlitePool, i64) {
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

    fn part(amigurumi_id: i64, order: i64, name: &str) -> NewSequenceElement {
        NewSequenceElement {
            amigurumi_id,
            element_order: order,
            element_name: name.into(),
            repetition: 1,
        }
    }

    #[tokio::test]
    async fn list_orders_by_build_order() {
        let (pool, id) = setup_with_pattern().await;
        let repo = SequenceRepo::new(&pool);

        repo.create(part(id, 2, "Body")).await.expect("body");
        repo.create(part(id, 1, "Head")).await.expect("head");

        let rows = repo.list().await.expect("list");
        assert_eq!(rows[0].element_name, "Head");
        assert_eq!(rows[1].element_name, "Body");
    }

    #[tokio::test]
    async fn create_requires_existing_pattern() {
        let (pool, _) = setup_with_pattern().await;
        let err = SequenceRepo::new(&pool)
            .create(part(55, 1, "Head"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { id: 55, .. }));
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let (pool, id) = setup_with_pattern().await;
        let repo = SequenceRepo::new(&pool);
        let record = repo.create(part(id, 1, "Head")).await.expect("create");

        let updated = repo
            .update(
                record.element_id,
                SequenceElementUpdate {
                    repetition: Some(2),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.repetition, 2);
        assert_eq!(updated.element_name, "Head");
        assert_eq!(updated.element_order, 1);
    }
}
