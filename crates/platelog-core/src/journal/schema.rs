//! Table creation for the journal database.
//!
//! Every statement is idempotent so opening an existing journal is safe.

use sqlx::SqlitePool;

use crate::error::JournalError;

/// Create all journal tables if they do not exist yet.
pub(crate) async fn create_tables(pool: &SqlitePool) -> Result<(), JournalError> {
    create_habits_table(pool).await?;
    create_habit_logs_table(pool).await?;
    create_meal_logs_table(pool).await?;
    Ok(())
}

async fn create_habits_table(pool: &SqlitePool) -> Result<(), JournalError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS habits (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_habit_logs_table(pool: &SqlitePool) -> Result<(), JournalError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS habit_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
            timestamp TEXT NOT NULL,
            note TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_habit_logs_timestamp ON habit_logs(timestamp)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_meal_logs_table(pool: &SqlitePool) -> Result<(), JournalError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meal_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            food TEXT NOT NULL,
            grams REAL NOT NULL,
            kcal REAL NOT NULL,
            carbs_g REAL NOT NULL,
            protein_g REAL NOT NULL,
            fat_g REAL NOT NULL,
            timestamp TEXT NOT NULL,
            source TEXT NOT NULL DEFAULT 'image_estimate',
            note TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_meal_logs_timestamp ON meal_logs(timestamp)")
        .execute(pool)
        .await?;

    Ok(())
}
