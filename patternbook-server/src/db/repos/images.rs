//! Image repository
//!
//! Owns the single-primary invariant: at most one image per pattern may
//! carry `main_image`. Every write that sets the flag clears the other
//! primaries of that pattern inside the same transaction, so two
//! concurrent requests cannot both win.

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use patternbook_core::models::ImageUpdate;

use super::{pattern_exists, DbError};

/// Image record from the database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImageRecord {
    pub image_id: i64,
    pub amigurumi_id: i64,
    pub main_image: bool,
    pub recipe_id: i64,
    pub image_route: Option<String>,
    pub observation: Option<String>,
}

/// Image repository
pub struct ImageRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ImageRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all image records, primary images first.
    pub async fn list(&self) -> Result<Vec<ImageRecord>, DbError> {
        let rows = sqlx::query_as(
            r#"
            SELECT image_id, amigurumi_id, main_image, recipe_id, image_route, observation
            FROM image
            ORDER BY main_image DESC, image_id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Get a single image record by id.
    pub async fn get(&self, image_id: i64) -> Result<ImageRecord, DbError> {
        let record = sqlx::query_as(
            r#"
            SELECT image_id, amigurumi_id, main_image, recipe_id, image_route, observation
            FROM image
            WHERE image_id = ?
            "#,
        )
        .bind(image_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(DbError::NotFound {
            resource: "image",
            id: image_id,
        })?;

        Ok(record)
    }

    /// Insert a new image record for an upload. The stored file name is
    /// not known until the id is generated; `set_route` fills it in.
    ///
    /// When `main_image` is set, the demotion of the pattern's other
    /// primaries happens in the same transaction as the insert.
    pub async fn create(
        &self,
        amigurumi_id: i64,
        main_image: bool,
        recipe_id: i64,
        observation: Option<&str>,
    ) -> Result<ImageRecord, DbError> {
        let mut tx = self.pool.begin().await?;

        if !pattern_exists(&mut *tx, amigurumi_id).await? {
            return Err(DbError::NotFound {
                resource: "amigurumi",
                id: amigurumi_id,
            });
        }

        if main_image {
            sqlx::query("UPDATE image SET main_image = FALSE WHERE amigurumi_id = ? AND main_image")
                .bind(amigurumi_id)
                .execute(&mut *tx)
                .await?;
        }

        let record: ImageRecord = sqlx::query_as(
            r#"
            INSERT INTO image (amigurumi_id, main_image, recipe_id, observation)
            VALUES (?, ?, ?, ?)
            RETURNING image_id, amigurumi_id, main_image, recipe_id, image_route, observation
            "#,
        )
        .bind(amigurumi_id)
        .bind(main_image)
        .bind(recipe_id)
        .bind(observation)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record)
    }

    /// Record the stored file name once it has been derived from the id.
    pub async fn set_route(&self, image_id: i64, route: &str) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE image SET image_route = ? WHERE image_id = ?")
            .bind(route)
            .bind(image_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "image",
                id: image_id,
            });
        }
        Ok(())
    }

    /// Apply a partial metadata update. Promoting an image to primary
    /// demotes the others of the same pattern in the same transaction.
    pub async fn update(&self, image_id: i64, update: ImageUpdate) -> Result<ImageRecord, DbError> {
        let mut tx = self.pool.begin().await?;

        let mut current: ImageRecord = sqlx::query_as(
            r#"
            SELECT image_id, amigurumi_id, main_image, recipe_id, image_route, observation
            FROM image
            WHERE image_id = ?
            "#,
        )
        .bind(image_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::NotFound {
            resource: "image",
            id: image_id,
        })?;

        if let Some(main_image) = update.main_image {
            if main_image {
                sqlx::query(
                    "UPDATE image SET main_image = FALSE WHERE amigurumi_id = ? AND main_image",
                )
                .bind(current.amigurumi_id)
                .execute(&mut *tx)
                .await?;
            }
            current.main_image = main_image;
        }
        if let Some(recipe_id) = update.recipe_id {
            current.recipe_id = recipe_id;
        }
        if let Some(observation) = update.observation {
            current.observation = Some(observation);
        }

        sqlx::query(
            r#"
            UPDATE image
            SET main_image = ?, recipe_id = ?, observation = ?
            WHERE image_id = ?
            "#,
        )
        .bind(current.main_image)
        .bind(current.recipe_id)
        .bind(&current.observation)
        .bind(image_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(current)
    }

    /// Delete the database row. The caller removes the stored file first.
    pub async fn delete_row(&self, image_id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM image WHERE image_id = ?")
            .bind(image_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "image",
                id: image_id,
            });
        }
        Ok(())
    }

    /// Count the primary images of a pattern. Test support for the
    /// single-primary invariant.
    pub async fn primary_count(&self, amigurumi_id: i64) -> Result<i64, DbError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM image WHERE amigurumi_id = ? AND main_image")
                .bind(amigurumi_id)
                .fetch_one(self.pool)
                .await?;
        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::PatternRepo;
    use crate::db::{migrations, pool::memory_pool};
    use patternbook_core::models::NewPattern;

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

    #[tokio::test]
    async fn create_requires_existing_pattern() {
        let (pool, _) = setup().await;
        let err = ImageRepo::new(&pool)
            .create(42, false, 1, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { id: 42, .. }));
    }

    #[tokio::test]
    async fn new_primary_demotes_previous() {
        let (pool, id) = setup().await;
        let repo = ImageRepo::new(&pool);

        let first = repo.create(id, true, 1, None).await.expect("first");
        assert!(first.main_image);

        let second = repo.create(id, true, 1, None).await.expect("second");
        assert!(second.main_image);

        assert_eq!(repo.primary_count(id).await.expect("count"), 1);
        assert!(!repo.get(first.image_id).await.expect("first").main_image);
    }

    #[tokio::test]
    async fn promoting_by_update_demotes_previous() {
        let (pool, id) = setup().await;
        let repo = ImageRepo::new(&pool);

        let first = repo.create(id, true, 1, None).await.expect("first");
        let second = repo.create(id, false, 1, None).await.expect("second");

        repo.update(
            second.image_id,
            ImageUpdate {
                main_image: Some(true),
                ..Default::default()
            },
        )
        .await
        .expect("promote");

        assert_eq!(repo.primary_count(id).await.expect("count"), 1);
        assert!(repo.get(second.image_id).await.expect("second").main_image);
        assert!(!repo.get(first.image_id).await.expect("first").main_image);
    }

    #[tokio::test]
    async fn primaries_list_first() {
        let (pool, id) = setup().await;
        let repo = ImageRepo::new(&pool);

        repo.create(id, false, 1, None).await.expect("plain");
        let primary = repo.create(id, true, 1, None).await.expect("primary");

        let listed = repo.list().await.expect("list");
        assert_eq!(listed[0].image_id, primary.image_id);
    }

    #[tokio::test]
    async fn set_route_persists() {
        let (pool, id) = setup().await;
        let repo = ImageRepo::new(&pool);

        let record = repo.create(id, false, 1, None).await.expect("create");
        repo.set_route(record.image_id, "amigurumi_1_image_1.png")
            .await
            .expect("set route");

        let fetched = repo.get(record.image_id).await.expect("get");
        assert_eq!(fetched.image_route.as_deref(), Some("amigurumi_1_image_1.png"));
    }
}
