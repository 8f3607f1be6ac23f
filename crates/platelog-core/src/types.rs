//! Core data types for the meal estimation pipeline.
//!
//! These types flow one way: ranked labels → resolved food → nutrient
//! breakdown, bundled into a [`MealEstimate`] for display and persistence.

use serde::{Deserialize, Serialize};

/// Macro-nutrient energy densities in kcal per gram.
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// One ranked classifier output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPrediction {
    /// Label from the model vocabulary (e.g., "cheeseburger")
    pub label: String,

    /// Probability from 0.0 to 1.0
    pub score: f32,
}

impl LabelPrediction {
    /// Create a new prediction.
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// The food a set of predictions resolved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodInfo {
    /// Canonical display name ("cheeseburger", "mixed meal", ...)
    pub food: String,

    /// Score of the matching prediction, or the mean score on fallback
    pub confidence: f32,

    /// Reference calorie density
    pub kcal_per_100g: f64,
}

/// Calories and macro grams for one portion, rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientEstimate {
    pub kcal: f64,
    pub carbs_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,

    /// Human-readable provenance of the numbers
    pub notes: String,
}

impl NutrientEstimate {
    /// Calories implied by the macro grams (4/4/9 kcal per gram).
    pub fn macro_kcal(&self) -> f64 {
        self.carbs_g * KCAL_PER_GRAM_CARBS
            + self.protein_g * KCAL_PER_GRAM_PROTEIN
            + self.fat_g * KCAL_PER_GRAM_FAT
    }
}

/// The full result of running the pipeline on one photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEstimate {
    /// Resolved food identity
    pub food: FoodInfo,

    /// Nutrient breakdown for `portion_grams`
    pub nutrients: NutrientEstimate,

    /// Ranked classifier output the food was resolved from
    pub predictions: Vec<LabelPrediction>,

    /// Portion mass the estimate was computed for
    pub portion_grams: f64,

    /// BLAKE3 hash of the photo bytes
    pub content_hash: String,
}

impl MealEstimate {
    /// Shape the estimate into the record the journal stores.
    pub fn to_new_meal(&self, source: impl Into<String>, note: impl Into<String>) -> NewMeal {
        NewMeal {
            food: self.food.food.clone(),
            grams: self.portion_grams,
            kcal: self.nutrients.kcal,
            carbs_g: self.nutrients.carbs_g,
            protein_g: self.nutrients.protein_g,
            fat_g: self.nutrients.fat_g,
            source: source.into(),
            note: note.into(),
        }
    }
}

/// Meal fields supplied to the journal; id and timestamp are assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMeal {
    pub food: String,
    pub grams: f64,
    pub kcal: f64,
    pub carbs_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub source: String,
    pub note: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_estimate() -> MealEstimate {
        MealEstimate {
            food: FoodInfo {
                food: "pizza".to_string(),
                confidence: 0.7,
                kcal_per_100g: 266.0,
            },
            nutrients: NutrientEstimate {
                kcal: 532.0,
                carbs_g: 53.2,
                protein_g: 20.0,
                fat_g: 26.6,
                notes: "Estimates based on heuristic for 'pizza'.".to_string(),
            },
            predictions: vec![LabelPrediction::new("pizza", 0.7)],
            portion_grams: 200.0,
            content_hash: "abc".to_string(),
        }
    }

    #[test]
    fn test_to_new_meal_copies_numbers() {
        let meal = sample_estimate().to_new_meal("image_estimate", "lunch");
        assert_eq!(meal.food, "pizza");
        assert_eq!(meal.grams, 200.0);
        assert_eq!(meal.kcal, 532.0);
        assert_eq!(meal.fat_g, 26.6);
        assert_eq!(meal.source, "image_estimate");
        assert_eq!(meal.note, "lunch");
    }

    #[test]
    fn test_macro_kcal() {
        let nutrients = sample_estimate().nutrients;
        let expected = 53.2 * 4.0 + 20.0 * 4.0 + 26.6 * 9.0;
        assert!((nutrients.macro_kcal() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_serializes_nested_food() {
        let json = serde_json::to_string(&sample_estimate()).unwrap();
        assert!(json.contains("\"food\":{\"food\":\"pizza\""));
        assert!(json.contains("\"kcal_per_100g\":266.0"));
    }
}
