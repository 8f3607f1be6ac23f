//! Food + portion → calories and macro grams.

use crate::error::EstimateError;
use crate::math::round1;
use crate::types::{
    NutrientEstimate, KCAL_PER_GRAM_CARBS, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN,
};

use super::tables::{MacroRatio, MacroRule, DEFAULT_RATIO, MACRO_RULES};

/// Estimate nutrients for `mass_grams` of `food_name`.
///
/// Total calories scale linearly with mass; the macro split comes from the
/// first category rule whose keyword occurs in the lowercased name. Outputs
/// are rounded to one decimal.
pub fn estimate(
    food_name: &str,
    mass_grams: f64,
    kcal_per_100g: f64,
) -> Result<NutrientEstimate, EstimateError> {
    if !mass_grams.is_finite() || mass_grams <= 0.0 {
        return Err(EstimateError::InvalidPortion { grams: mass_grams });
    }
    if !kcal_per_100g.is_finite() || kcal_per_100g < 0.0 {
        return Err(EstimateError::InvalidDensity { kcal_per_100g });
    }

    let kcal = kcal_per_100g * mass_grams / 100.0;
    let ratio = macro_ratio(food_name);

    let carbs_g = kcal * ratio.carbs / KCAL_PER_GRAM_CARBS;
    let protein_g = kcal * ratio.protein / KCAL_PER_GRAM_PROTEIN;
    let fat_g = kcal * ratio.fat / KCAL_PER_GRAM_FAT;

    Ok(NutrientEstimate {
        kcal: round1(kcal),
        carbs_g: round1(carbs_g),
        protein_g: round1(protein_g),
        fat_g: round1(fat_g),
        notes: format!("Estimates based on heuristic for '{food_name}'."),
    })
}

/// Macro ratio for a food name, using the built-in category rules.
pub fn macro_ratio(food_name: &str) -> MacroRatio {
    macro_ratio_with(food_name, MACRO_RULES)
}

/// Macro ratio for a food name against an explicit rule list.
pub fn macro_ratio_with(food_name: &str, rules: &[MacroRule]) -> MacroRatio {
    let food = food_name.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| food.contains(kw)))
        .map(|rule| rule.ratio)
        .unwrap_or(DEFAULT_RATIO)
}
