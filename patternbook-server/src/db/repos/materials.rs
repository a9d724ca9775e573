//! Material repository
//!
//! Material lines are grouped into alternative sets per pattern by
//! `recipe_id`; listing keeps lines of the same set together.

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use patternbook_core::models::{MaterialUpdate, NewMaterial};

use super::{pattern_exists, DbError};

/// Material record from the database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaterialRecord {
    pub material_list_id: i64,
    pub amigurumi_id: i64,
    pub material_name: String,
    pub quantity: String,
    pub recipe_id: i64,
    pub colour_id: Option<i64>,
}

/// Material repository
pub struct MaterialRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MaterialRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all material lines, ordered by pattern, set, then colour.
    pub async fn list(&self) -> Result<Vec<MaterialRecord>, DbError> {
        let rows = sqlx::query_as(
            r#"
            SELECT material_list_id, amigurumi_id, material_name, quantity,
                   recipe_id, colour_id
            FROM material_list
            ORDER BY amigurumi_id ASC, recipe_id ASC, colour_id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Create a material line for an existing pattern.
    pub async fn create(&self, new: NewMaterial) -> Result<MaterialRecord, DbError> {
        if !pattern_exists(self.pool, new.amigurumi_id).await? {
            return Err(DbError::NotFound {
                resource: "amigurumi",
                id: new.amigurumi_id,
            });
        }

        let record = sqlx::query_as(
            r#"
            INSERT INTO material_list
                (amigurumi_id, material_name, quantity, recipe_id, colour_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING material_list_id, amigurumi_id, material_name, quantity,
                      recipe_id, colour_id
            "#,
        )
        .bind(new.amigurumi_id)
        .bind(&new.material_name)
        .bind(&new.quantity)
        .bind(new.recipe_id)
        .bind(new.colour_id)
        .fetch_one(self.pool)
        .await?;

        Ok(record)
    }

    /// Apply a partial update: only fields present in the payload change.
    pub async fn update(
        &self,
        material_list_id: i64,
        update: MaterialUpdate,
    ) -> Result<MaterialRecord, DbError> {
        let mut tx = self.pool.begin().await?;

        let mut current: MaterialRecord = sqlx::query_as(
            r#"
            SELECT material_list_id, amigurumi_id, material_name, quantity,
                   recipe_id, colour_id
            FROM material_list
            WHERE material_list_id = ?
            "#,
        )
        .bind(material_list_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::NotFound {
            resource: "material",
            id: material_list_id,
        })?;

        if let Some(name) = update.material_name {
            current.material_name = name;
        }
        if let Some(quantity) = update.quantity {
            current.quantity = quantity;
        }
        if let Some(recipe_id) = update.recipe_id {
            current.recipe_id = recipe_id;
        }
        if let Some(colour_id) = update.colour_id {
            current.colour_id = Some(colour_id);
        }

        sqlx::query(
            r#"
            UPDATE material_list
            SET material_name = ?, quantity = ?, recipe_id = ?, colour_id = ?
            WHERE material_list_id = ?
            "#,
        )
        .bind(&current.material_name)
        .bind(&current.quantity)
        .bind(current.recipe_id)
        .bind(current.colour_id)
        .bind(material_list_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(current)
    }

    /// Delete a single material line.
    pub async fn delete(&self, material_list_id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM material_list WHERE material_list_id = ?")
            .bind(material_list_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "material",
                id: material_list_id,
            });
        }
        Ok(())
    }

    /// Bulk-delete every material line of a pattern. Returns how many went.
    pub async fn delete_by_pattern(&self, amigurumi_id: i64) -> Result<u64, DbError> {
        if !pattern_exists(self.pool, amigurumi_id).await? {
            return Err(DbError::NotFound {
                resource: "amigurumi",
                id: amigurumi_id,
            });
        }

        let result = sqlx::query("DELETE FROM material_list WHERE amigurumi_id = ?")
            .bind(amigurumi_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
