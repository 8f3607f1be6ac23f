//! Meal and habit journal backed by SQLite.
//!
//! The journal only stores what the pipeline and CLI hand it; timestamps and
//! ids are assigned here on insert.
//!
//! # Usage
//!
//! ```rust,ignore
//! use platelog_core::journal::Journal;
//!
//! let journal = Journal::open(&config.journal_path()).await?;
//! let habit = journal.add_habit("drink water").await?;
//! journal.log_habit(habit.id, "two glasses").await?;
//! ```

mod records;
mod schema;

pub use records::{Habit, HabitLog, MealRecord};

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::{SubsecRound, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::JournalError;
use crate::types::NewMeal;

/// Default row count for [`Journal::recent_meals`].
pub const DEFAULT_RECENT_MEALS: u32 = 20;

/// Default row count for [`Journal::recent_habit_logs`].
pub const DEFAULT_RECENT_HABIT_LOGS: u32 = 50;

/// How long a writer waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the journal database.
#[derive(Debug, Clone)]
pub struct Journal {
    pool: SqlitePool,
}

impl Journal {
    /// Open (or create) the journal at `path`.
    ///
    /// WAL mode, a busy timeout, and foreign keys are set on every pooled
    /// connection.
    pub async fn open(path: &Path) -> Result<Self, JournalError> {
        let newly_created = !path.exists();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        if newly_created {
            tracing::info!("Initialized new journal: {}", path.display());
        } else {
            tracing::debug!("Opened existing journal: {}", path.display());
        }

        Self::with_pool(pool).await
    }

    /// Open a private in-memory journal.
    ///
    /// Uses a single connection that never expires, since each SQLite
    /// in-memory connection is its own database.
    pub async fn in_memory() -> Result<Self, JournalError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, JournalError> {
        schema::create_tables(&pool).await?;
        Ok(Self { pool })
    }

    /// Add a habit. Surrounding whitespace is trimmed.
    pub async fn add_habit(&self, name: &str) -> Result<Habit, JournalError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(JournalError::EmptyHabitName);
        }

        let created_at = Utc::now().trunc_subsecs(6);
        let result = sqlx::query("INSERT INTO habits (name, created_at) VALUES (?, ?)")
            .bind(name)
            .bind(created_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Added habit {:?}", name);
        Ok(Habit {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            created_at,
        })
    }

    /// All habits in creation order.
    pub async fn list_habits(&self) -> Result<Vec<Habit>, JournalError> {
        let habits =
            sqlx::query_as::<_, Habit>("SELECT id, name, created_at FROM habits ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(habits)
    }

    /// Record a completion of habit `habit_id`.
    pub async fn log_habit(&self, habit_id: i64, note: &str) -> Result<HabitLog, JournalError> {
        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM habits WHERE id = ?")
            .bind(habit_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(JournalError::UnknownHabit(habit_id));
        }

        let timestamp = Utc::now().trunc_subsecs(6);
        let result =
            sqlx::query("INSERT INTO habit_logs (habit_id, timestamp, note) VALUES (?, ?, ?)")
                .bind(habit_id)
                .bind(timestamp)
                .bind(note)
                .execute(&self.pool)
                .await?;

        Ok(HabitLog {
            id: result.last_insert_rowid(),
            habit_id,
            timestamp,
            note: note.to_string(),
        })
    }

    /// Store a meal estimate (or manual entry).
    pub async fn log_meal(&self, meal: &NewMeal) -> Result<MealRecord, JournalError> {
        let timestamp = Utc::now().trunc_subsecs(6);
        let result = sqlx::query(
            r#"
            INSERT INTO meal_logs
                (food, grams, kcal, carbs_g, protein_g, fat_g, timestamp, source, note)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&meal.food)
        .bind(meal.grams)
        .bind(meal.kcal)
        .bind(meal.carbs_g)
        .bind(meal.protein_g)
        .bind(meal.fat_g)
        .bind(timestamp)
        .bind(&meal.source)
        .bind(&meal.note)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Logged meal {:?} ({} kcal)", meal.food, meal.kcal);
        Ok(MealRecord {
            id: result.last_insert_rowid(),
            food: meal.food.clone(),
            grams: meal.grams,
            kcal: meal.kcal,
            carbs_g: meal.carbs_g,
            protein_g: meal.protein_g,
            fat_g: meal.fat_g,
            timestamp,
            source: meal.source.clone(),
            note: meal.note.clone(),
        })
    }

    /// Most recent meals, newest first.
    pub async fn recent_meals(&self, limit: u32) -> Result<Vec<MealRecord>, JournalError> {
        let meals = sqlx::query_as::<_, MealRecord>(
            r#"
            SELECT id, food, grams, kcal, carbs_g, protein_g, fat_g, timestamp, source, note
            FROM meal_logs
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(meals)
    }

    /// Most recent habit completions, newest first.
    pub async fn recent_habit_logs(&self, limit: u32) -> Result<Vec<HabitLog>, JournalError> {
        let logs = sqlx::query_as::<_, HabitLog>(
            r#"
            SELECT id, habit_id, timestamp, note
            FROM habit_logs
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }

    /// Close the underlying pool, flushing pending writes.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
