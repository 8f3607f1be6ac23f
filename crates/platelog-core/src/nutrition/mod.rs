//! Food resolution and nutrient estimation.
//!
//! Both stages are pure functions over static, ordered tables:
//! - **resolver**: ranked labels → [`FoodInfo`](crate::types::FoodInfo)
//! - **estimator**: food + portion → [`NutrientEstimate`](crate::types::NutrientEstimate)
//! - **tables**: the keyword and macro-rule priority lists

pub mod estimator;
pub mod resolver;
pub mod tables;

pub use estimator::{estimate, macro_ratio};
pub use resolver::resolve_food;
pub use tables::{FoodKeyword, MacroRatio, MacroRule, FOOD_KEYWORDS, MACRO_RULES};
