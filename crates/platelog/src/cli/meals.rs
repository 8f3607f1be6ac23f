//! The `platelog meals` command: view and add journal meals.

use clap::{Args, Subcommand};
use platelog_core::journal::DEFAULT_RECENT_MEALS;
use platelog_core::{estimate, resolve_food, Config, Journal, LabelPrediction, NewMeal};

use super::{stdout_writer, FormatArg};

/// Source tag for meals entered by hand.
const MANUAL_SOURCE: &str = "manual";

/// Arguments for the `meals` command.
#[derive(Args, Debug)]
pub struct MealsArgs {
    #[command(subcommand)]
    pub command: MealsCommand,

    /// Output format [default: output.format]
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<FormatArg>,
}

/// Subcommands for meal logs.
#[derive(Subcommand, Debug)]
pub enum MealsCommand {
    /// Show the most recent meals, newest first
    Recent {
        /// Number of meals to show
        #[arg(short, long, default_value_t = DEFAULT_RECENT_MEALS)]
        limit: u32,
    },

    /// Log a meal by hand, estimating macros from its name
    Add {
        /// What you ate
        #[arg(long)]
        food: String,

        /// Portion mass in grams
        #[arg(long)]
        grams: f64,

        /// Calorie density; looked up from the food name when omitted
        #[arg(long)]
        kcal_per_100g: Option<f64>,

        /// Free-form note
        #[arg(long, default_value = "")]
        note: String,
    },
}

/// Execute the meals command.
pub async fn execute(args: MealsArgs, config: &Config) -> anyhow::Result<()> {
    let journal = Journal::open(&config.journal_path()).await?;

    match args.command {
        MealsCommand::Recent { limit } => {
            let meals = journal.recent_meals(limit).await?;
            if meals.is_empty() {
                eprintln!("No meals logged yet.");
            }
            let mut out = stdout_writer(config, args.format)?;
            out.write_all(&meals)?;
            out.flush()?;
        }

        MealsCommand::Add {
            food,
            grams,
            kcal_per_100g,
            note,
        } => {
            let meal = manual_meal(&food, grams, kcal_per_100g, note)?;
            let record = journal.log_meal(&meal).await?;
            let mut out = stdout_writer(config, args.format)?;
            out.write(&record)?;
            out.flush()?;
        }
    }

    journal.close().await;
    Ok(())
}

/// Build a manual journal entry, keeping the user's wording for the food.
fn manual_meal(
    food: &str,
    grams: f64,
    kcal_per_100g: Option<f64>,
    note: String,
) -> anyhow::Result<NewMeal> {
    let density = match kcal_per_100g {
        Some(density) => density,
        None => resolve_food(&[LabelPrediction::new(food, 1.0)])?.kcal_per_100g,
    };
    let nutrients = estimate(food, grams, density)?;

    Ok(NewMeal {
        food: food.to_string(),
        grams,
        kcal: nutrients.kcal,
        carbs_g: nutrients.carbs_g,
        protein_g: nutrients.protein_g,
        fat_g: nutrients.fat_g,
        source: MANUAL_SOURCE.to_string(),
        note,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_meal_looks_up_density() {
        let meal = manual_meal("Chicken Curry", 100.0, None, String::new()).unwrap();
        assert_eq!(meal.food, "Chicken Curry");
        assert_eq!(meal.kcal, 239.0);
        assert_eq!(meal.source, "manual");
    }

    #[test]
    fn test_manual_meal_unknown_food_uses_fallback_density() {
        let meal = manual_meal("lentil soup", 100.0, None, "homemade".to_string()).unwrap();
        assert_eq!(meal.kcal, 180.0);
        assert_eq!(meal.note, "homemade");
    }

    #[test]
    fn test_manual_meal_explicit_density() {
        let meal = manual_meal("pizza", 50.0, Some(300.0), String::new()).unwrap();
        assert_eq!(meal.kcal, 150.0);
    }

    #[test]
    fn test_manual_meal_rejects_bad_portion() {
        assert!(manual_meal("pizza", 0.0, None, String::new()).is_err());
    }
}
