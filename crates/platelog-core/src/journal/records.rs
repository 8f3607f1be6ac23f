//! Rows stored in the journal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One completion of a habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HabitLog {
    pub id: i64,
    pub habit_id: i64,
    pub timestamp: DateTime<Utc>,
    pub note: String,
}

/// A stored meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MealRecord {
    pub id: i64,
    pub food: String,
    pub grams: f64,
    pub kcal: f64,
    pub carbs_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub note: String,
}
