//! Ranked labels → canonical food identity.

use crate::error::EstimateError;
use crate::types::{FoodInfo, LabelPrediction};

use super::tables::{FoodKeyword, FALLBACK_FOOD, FALLBACK_KCAL_PER_100G, FOOD_KEYWORDS};

/// Resolve predictions against the built-in keyword table.
pub fn resolve_food(predictions: &[LabelPrediction]) -> Result<FoodInfo, EstimateError> {
    resolve_food_with(predictions, FOOD_KEYWORDS)
}

/// Resolve predictions against an explicit keyword table.
///
/// The first prediction in rank order that contains any keyword wins, with
/// its own score as confidence. Table order only decides between keywords
/// that match the same prediction. With no match, falls back to
/// "mixed meal" scored at the mean of all prediction scores.
pub fn resolve_food_with(
    predictions: &[LabelPrediction],
    table: &[FoodKeyword],
) -> Result<FoodInfo, EstimateError> {
    if predictions.is_empty() {
        return Err(EstimateError::EmptyInput);
    }

    for prediction in predictions {
        if let Some(entry) = match_keyword(&prediction.label, table) {
            tracing::debug!(
                "Label {:?} matched keyword {:?} -> {}",
                prediction.label,
                entry.keyword,
                entry.food
            );
            return Ok(FoodInfo {
                food: entry.food.to_string(),
                confidence: clamp_unit(prediction.score),
                kcal_per_100g: entry.kcal_per_100g,
            });
        }
    }

    let mean = predictions.iter().map(|p| p.score).sum::<f32>() / predictions.len() as f32;
    tracing::debug!(
        "No keyword matched {} labels; falling back to {:?}",
        predictions.len(),
        FALLBACK_FOOD
    );

    Ok(FoodInfo {
        food: FALLBACK_FOOD.to_string(),
        confidence: clamp_unit(mean),
        kcal_per_100g: FALLBACK_KCAL_PER_100G,
    })
}

/// First table entry whose keyword occurs in the label.
///
/// Checks both the normalized label (lowercase, spaces → `_`) and the plain
/// lowercased label; they differ for labels whose spacing the keyword
/// depends on.
fn match_keyword<'a>(label: &str, table: &'a [FoodKeyword]) -> Option<&'a FoodKeyword> {
    let lowered = label.to_lowercase();
    let normalized = lowered.replace(' ', "_");
    table
        .iter()
        .find(|entry| normalized.contains(entry.keyword) || lowered.contains(entry.keyword))
}

fn clamp_unit(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preds(items: &[(&str, f32)]) -> Vec<LabelPrediction> {
        items
            .iter()
            .map(|(label, score)| LabelPrediction::new(*label, *score))
            .collect()
    }

    #[test]
    fn test_cheeseburger_among_five() {
        let predictions = preds(&[
            ("cheeseburger", 0.82),
            ("plate", 0.07),
            ("bagel", 0.05),
            ("soup bowl", 0.04),
            ("lemon", 0.02),
        ]);
        let info = resolve_food(&predictions).unwrap();
        assert_eq!(info.food, "cheeseburger");
        assert_eq!(info.confidence, 0.82);
        assert_eq!(info.kcal_per_100g, 295.0);
    }

    #[test]
    fn test_no_match_falls_back_to_mean() {
        let predictions = preds(&[
            ("lemon", 0.3),
            ("guava", 0.2),
            ("plate", 0.25),
            ("soup_bowl", 0.15),
            ("pretzel", 0.1),
        ]);
        let info = resolve_food(&predictions).unwrap();
        assert_eq!(info.food, "mixed meal");
        assert!((info.confidence - 0.2).abs() < 1e-6);
        assert_eq!(info.kcal_per_100g, 180.0);
    }

    #[test]
    fn test_fallback_with_all_zero_scores() {
        let predictions = preds(&[("plate", 0.0), ("lemon", 0.0)]);
        let info = resolve_food(&predictions).unwrap();
        assert_eq!(info.food, "mixed meal");
        assert_eq!(info.confidence, 0.0);
    }

    #[test]
    fn test_empty_input() {
        let err = resolve_food(&[]).unwrap_err();
        assert!(matches!(err, EstimateError::EmptyInput));
    }

    #[test]
    fn test_rank_order_beats_table_order() {
        // "taco" is last in the table but ranked first, so it wins over pizza.
        let predictions = preds(&[("taco", 0.4), ("pizza", 0.35)]);
        let info = resolve_food(&predictions).unwrap();
        assert_eq!(info.food, "taco");
        assert_eq!(info.confidence, 0.4);
    }

    #[test]
    fn test_first_match_may_be_lower_ranked() {
        let predictions = preds(&[("plate", 0.5), ("lemon", 0.3), ("pizza", 0.2)]);
        let info = resolve_food(&predictions).unwrap();
        assert_eq!(info.food, "pizza");
        assert_eq!(info.confidence, 0.2);
    }

    #[test]
    fn test_table_order_breaks_ties_within_a_label() {
        // Both "egg" and "sandwich" occur; "egg" comes first in the table.
        let predictions = preds(&[("egg sandwich", 0.6)]);
        let info = resolve_food(&predictions).unwrap();
        assert_eq!(info.food, "egg");
    }

    #[test]
    fn test_spaces_normalized_to_underscores() {
        let predictions = preds(&[("Ice Cream", 0.7)]);
        let info = resolve_food(&predictions).unwrap();
        assert_eq!(info.food, "ice cream");
        assert_eq!(info.kcal_per_100g, 207.0);

        let predictions = preds(&[("mashed potato", 0.5)]);
        assert_eq!(resolve_food(&predictions).unwrap().food, "potato");
    }

    #[test]
    fn test_raw_label_checked_as_well_as_normalized() {
        let table = [FoodKeyword {
            keyword: "hot pot",
            food: "hot pot",
            kcal_per_100g: 110.0,
        }];
        // Normalized label is "hot_pot"; only the raw lowercased label contains "hot pot".
        let predictions = preds(&[("Hot Pot", 0.9)]);
        let info = resolve_food_with(&predictions, &table).unwrap();
        assert_eq!(info.food, "hot pot");
    }

    #[test]
    fn test_confidence_clamped_to_unit_range() {
        let info = resolve_food(&preds(&[("pizza", 1.7)])).unwrap();
        assert_eq!(info.confidence, 1.0);
        let info = resolve_food(&preds(&[("plate", -0.5), ("lemon", -0.5)])).unwrap();
        assert_eq!(info.confidence, 0.0);
    }
}
