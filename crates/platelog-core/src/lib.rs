//! Platelog Core - meal photo → nutrition estimation library.
//!
//! Platelog turns a meal photo and a portion mass into a calorie and
//! macro-nutrient estimate, and keeps a small journal of meals and habits.
//!
//! # Architecture
//!
//! The estimation core is a one-way pipeline with no database dependencies:
//!
//! ```text
//! Image bytes → Classify (ONNX) → Resolve food → Estimate nutrients → MealEstimate
//! ```
//!
//! The journal (SQLite) and the coach (chat completion API) sit beside the
//! pipeline and only consume its output.
//!
//! # Usage
//!
//! ```rust,ignore
//! use platelog_core::{Config, Device, MealPipeline};
//!
//! let config = Config::load()?;
//! let pipeline = MealPipeline::new(&config);
//!
//! let bytes = std::fs::read("lunch.jpg")?;
//! let estimate = pipeline.run(&bytes, 250.0, Device::Cpu)?;
//! println!("{}: {} kcal", estimate.food.food, estimate.nutrients.kcal);
//! ```

// Module declarations
pub mod classifier;
pub mod coach;
pub mod config;
pub mod error;
pub mod journal;
pub mod math;
pub mod nutrition;
pub mod output;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use classifier::{ClassModel, ClassifierHandle, LabelClassifier};
pub use coach::{ChatMessage, Coach, CoachReply};
pub use config::{Config, Device};
pub use error::{CoachError, ConfigError, EstimateError, JournalError};
pub use journal::{Habit, HabitLog, Journal, MealRecord};
pub use nutrition::{estimate, resolve_food};
pub use output::{OutputFormat, OutputWriter, Render};
pub use pipeline::MealPipeline;
pub use types::{FoodInfo, LabelPrediction, MealEstimate, NewMeal, NutrientEstimate};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
