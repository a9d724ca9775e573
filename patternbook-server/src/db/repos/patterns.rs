//! Pattern repository
//!
//! The pattern row is the root of the catalog: deleting it cascades to
//! materials, images, stitch rows and sequence elements through the
//! foreign keys declared in the schema.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use patternbook_core::models::{NewPattern, PatternUpdate};

use super::{pattern_exists, DbError};

/// Pattern record from the database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PatternRecord {
    pub amigurumi_id: i64,
    pub date: Option<NaiveDate>,
    pub name: String,
    pub size: f64,
    pub autor: String,
    pub link: Option<String>,
    pub amigurumi_id_of_linked_amigurumi: Option<i64>,
    pub note: Option<String>,
}

/// Pattern repository
pub struct PatternRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PatternRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all patterns in insertion order.
    pub async fn list(&self) -> Result<Vec<PatternRecord>, DbError> {
        let rows = sqlx::query_as(
            r#"
            SELECT amigurumi_id, date, name, size, autor, link,
                   amigurumi_id_of_linked_amigurumi, note
            FROM foundation_list
            ORDER BY amigurumi_id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Create a pattern. When no date is supplied the current date is
    /// recorded, matching the column default of the original schema.
    pub async fn create(&self, new: NewPattern) -> Result<PatternRecord, DbError> {
        if let Some(linked) = new.amigurumi_id_of_linked_amigurumi {
            if !pattern_exists(self.pool, linked).await? {
                return Err(DbError::NotFound {
                    resource: "amigurumi",
                    id: linked,
                });
            }
        }

        let date = new.date.unwrap_or_else(|| Local::now().date_naive());

        let record = sqlx::query_as(
            r#"
            INSERT INTO foundation_list
                (date, name, size, autor, link, amigurumi_id_of_linked_amigurumi, note)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING amigurumi_id, date, name, size, autor, link,
                      amigurumi_id_of_linked_amigurumi, note
            "#,
        )
        .bind(date)
        .bind(&new.name)
        .bind(new.size)
        .bind(&new.autor)
        .bind(&new.link)
        .bind(new.amigurumi_id_of_linked_amigurumi)
        .bind(&new.note)
        .fetch_one(self.pool)
        .await?;

        Ok(record)
    }

    /// Get a single pattern by id.
    pub async fn get(&self, amigurumi_id: i64) -> Result<PatternRecord, DbError> {
        let record = sqlx::query_as(
            r#"
            SELECT amigurumi_id, date, name, size, autor, link,
                   amigurumi_id_of_linked_amigurumi, note
            FROM foundation_list
            WHERE amigurumi_id = ?
            "#,
        )
        .bind(amigurumi_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(DbError::NotFound {
            resource: "amigurumi",
            id: amigurumi_id,
        })?;

        Ok(record)
    }

    /// Apply a partial update: only fields present in the payload change.
    pub async fn update(
        &self,
        amigurumi_id: i64,
        update: PatternUpdate,
    ) -> Result<PatternRecord, DbError> {
        let mut tx = self.pool.begin().await?;

        let mut current: PatternRecord = sqlx::query_as(
            r#"
            SELECT amigurumi_id, date, name, size, autor, link,
                   amigurumi_id_of_linked_amigurumi, note
            FROM foundation_list
            WHERE amigurumi_id = ?
            "#,
        )
        .bind(amigurumi_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::NotFound {
            resource: "amigurumi",
            id: amigurumi_id,
        })?;

        if let Some(name) = update.name {
            current.name = name;
        }
        if let Some(size) = update.size {
            current.size = size;
        }
        if let Some(autor) = update.autor {
            current.autor = autor;
        }
        if let Some(date) = update.date {
            current.date = Some(date);
        }
        if let Some(link) = update.link {
            current.link = Some(link);
        }
        if let Some(linked) = update.amigurumi_id_of_linked_amigurumi {
            if !pattern_exists(&mut *tx, linked).await? {
                return Err(DbError::NotFound {
                    resource: "amigurumi",
                    id: linked,
                });
            }
            current.amigurumi_id_of_linked_amigurumi = Some(linked);
        }
        if let Some(note) = update.note {
            current.note = Some(note);
        }

        sqlx::query(
            r#"
            UPDATE foundation_list
            SET date = ?, name = ?, size = ?, autor = ?, link = ?,
                amigurumi_id_of_linked_amigurumi = ?, note = ?
            WHERE amigurumi_id = ?
            "#,
        )
        .bind(current.date)
        .bind(&current.name)
        .bind(current.size)
        .bind(&current.autor)
        .bind(&current.link)
        .bind(current.amigurumi_id_of_linked_amigurumi)
        .bind(&current.note)
        .bind(amigurumi_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(current)
    }

    /// Delete a pattern. Dependents go with it via FK cascade; patterns
    /// linking here as their principal get the link nulled.
    pub async fn delete(&self, amigurumi_id: i64) -> Result<PatternRecord, DbError> {
        let record = self.get(amigurumi_id).await?;

        sqlx::query("DELETE FROM foundation_list WHERE amigurumi_id = ?")
            .bind(amigurumi_id)
            .execute(self.pool)
            .await?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, pool::memory_pool};

    fn bear() -> NewPattern {
        NewPattern {
            name: "Bear".into(),
            size: 20.0,
            autor: "Ana".into(),
            date: None,
            link: None,
            amigurumi_id_of_linked_amigurumi: None,
            note: None,
        }
    }

    async fn setup() -> SqlitePool {
        let pool = memory_pool().await.expect("pool");
        migrations::run(&pool).await.expect("migrations");
        pool
    }

    #[tokio::test]
    async fn create_assigns_id_and_date() {
        let pool = setup().await;
        let repo = PatternRepo::new(&pool);

        let record = repo.create(bear()).await.expect("create");
        assert_eq!(record.amigurumi_id, 1);
        assert!(record.date.is_some());

        let listed = repo.list().await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].amigurumi_id, record.amigurumi_id);
    }

    #[tokio::test]
    async fn ids_are_monotonic() {
        let pool = setup().await;
        let repo = PatternRepo::new(&pool);

        let first = repo.create(bear()).await.expect("create");
        let second = repo.create(bear()).await.expect("create");
        assert!(second.amigurumi_id > first.amigurumi_id);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let pool = setup().await;
        let repo = PatternRepo::new(&pool);
        let record = repo.create(bear()).await.expect("create");

        let updated = repo
            .update(
                record.amigurumi_id,
                PatternUpdate {
                    size: Some(25.0),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.size, 25.0);
        assert_eq!(updated.name, "Bear");
        assert_eq!(updated.autor, "Ana");
        assert_eq!(updated.date, record.date);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let pool = setup().await;
        let repo = PatternRepo::new(&pool);

        let err = repo.update(99, PatternUpdate::default()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { id: 99, .. }));
    }

    #[tokio::test]
    async fn linked_pattern_must_exist() {
        let pool = setup().await;
        let repo = PatternRepo::new(&pool);

        let mut variant = bear();
        variant.amigurumi_id_of_linked_amigurumi = Some(42);
        let err = repo.create(variant).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { id: 42, .. }));
    }

    #[tokio::test]
    async fn deleting_principal_detaches_variants() {
        let pool = setup().await;
        let repo = PatternRepo::new(&pool);

        let principal = repo.create(bear()).await.expect("create");
        let mut variant = bear();
        variant.name = "Bear (small)".into();
        variant.amigurumi_id_of_linked_amigurumi = Some(principal.amigurumi_id);
        let variant = repo.create(variant).await.expect("create variant");

        repo.delete(principal.amigurumi_id).await.expect("delete");

        let survivor = repo.get(variant.amigurumi_id).await.expect("variant kept");
        assert_eq!(survivor.amigurumi_id_of_linked_amigurumi, None);
    }
}
