//! Schema migrations for the catalog tables
//!
//! Run at startup; every statement is idempotent. Deleting a pattern
//! cascades to its materials, images, stitch rows and sequence elements.
//! The self-reference between patterns is SET NULL so removing a principal
//! pattern only detaches its variants.

use sqlx::SqlitePool;

/// Run all catalog migrations
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running catalog migrations...");

    // Patterns
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS foundation_list (
            amigurumi_id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT,
            name TEXT NOT NULL,
            size REAL NOT NULL,
            autor TEXT NOT NULL,
            link TEXT,
            amigurumi_id_of_linked_amigurumi INTEGER
                REFERENCES foundation_list(amigurumi_id) ON DELETE SET NULL,
            note TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Material lines, grouped into alternative sets by recipe_id
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS material_list (
            material_list_id INTEGER PRIMARY KEY AUTOINCREMENT,
            amigurumi_id INTEGER NOT NULL
                REFERENCES foundation_list(amigurumi_id) ON DELETE CASCADE,
            material_name TEXT NOT NULL,
            quantity TEXT NOT NULL,
            recipe_id INTEGER NOT NULL,
            colour_id INTEGER
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Construction parts in build order
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS stitchbook_sequence (
            element_id INTEGER PRIMARY KEY AUTOINCREMENT,
            amigurumi_id INTEGER NOT NULL
                REFERENCES foundation_list(amigurumi_id) ON DELETE CASCADE,
            element_order INTEGER NOT NULL,
            element_name TEXT NOT NULL,
            repetition INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Stitch rows within a construction part
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS stitchbook (
            line_id INTEGER PRIMARY KEY AUTOINCREMENT,
            amigurumi_id INTEGER NOT NULL
                REFERENCES foundation_list(amigurumi_id) ON DELETE CASCADE,
            observation TEXT NOT NULL,
            element_id INTEGER NOT NULL
                REFERENCES stitchbook_sequence(element_id),
            number_row INTEGER NOT NULL,
            colour_id INTEGER NOT NULL,
            stich_sequence TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Image records; the file itself lives in the uploads directory
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS image (
            image_id INTEGER PRIMARY KEY AUTOINCREMENT,
            amigurumi_id INTEGER NOT NULL
                REFERENCES foundation_list(amigurumi_id) ON DELETE CASCADE,
            main_image BOOLEAN NOT NULL DEFAULT FALSE,
            recipe_id INTEGER NOT NULL DEFAULT 1,
            image_route TEXT,
            observation TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("Catalog migrations complete");
    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_material_list_amigurumi ON material_list(amigurumi_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_stitchbook_amigurumi ON stitchbook(amigurumi_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_stitchbook_element ON stitchbook(element_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_sequence_amigurumi ON stitchbook_sequence(amigurumi_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_image_amigurumi ON image(amigurumi_id)")
        .execute(pool)
        .await?;
    // Partial index backing the one-primary-per-pattern rule
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_image_main ON image(amigurumi_id) WHERE main_image",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::memory_pool;

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = memory_pool().await.expect("pool");
        run(&pool).await.expect("first run");
        run(&pool).await.expect("second run");
    }

    #[tokio::test]
    async fn cascade_rules_are_declared() {
        let pool = memory_pool().await.expect("pool");
        run(&pool).await.expect("migrations");

        let ddl: (String,) = sqlx::query_as(
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'material_list'",
        )
        .fetch_one(&pool)
        .await
        .expect("ddl lookup");

        assert!(ddl.0.contains("ON DELETE CASCADE"));
    }
}
