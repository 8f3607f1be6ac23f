//! Static lookup tables for food resolution and macro estimation.
//!
//! Both tables are priority lists: order is part of their meaning.

/// A classifier-label keyword and the food it stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodKeyword {
    /// Substring searched for in the (lowercased) label
    pub keyword: &'static str,
    /// Canonical display name
    pub food: &'static str,
    /// Reference calorie density
    pub kcal_per_100g: f64,
}

const fn kw(keyword: &'static str, food: &'static str, kcal_per_100g: f64) -> FoodKeyword {
    FoodKeyword {
        keyword,
        food,
        kcal_per_100g,
    }
}

/// Keyword table, checked in order for each prediction.
pub static FOOD_KEYWORDS: &[FoodKeyword] = &[
    kw("pizza", "pizza", 266.0),
    kw("hotdog", "hot dog", 290.0),
    kw("hamburger", "burger", 295.0),
    kw("cheeseburger", "cheeseburger", 295.0),
    kw("bagel", "bagel", 250.0),
    kw("banana", "banana", 89.0),
    kw("apple", "apple", 52.0),
    kw("orange", "orange", 47.0),
    kw("sushi", "sushi", 130.0),
    kw("spaghetti", "pasta", 158.0),
    kw("ice_cream", "ice cream", 207.0),
    kw("espresso", "coffee", 2.0),
    kw("coffee", "coffee", 2.0),
    kw("egg", "egg", 155.0),
    kw("salad", "salad", 20.0),
    kw("sandwich", "sandwich", 250.0),
    kw("baguette", "bread", 265.0),
    kw("bread", "bread", 265.0),
    kw("french_fries", "fries", 312.0),
    kw("mashed_potato", "potato", 88.0),
    kw("steak", "steak", 271.0),
    kw("beef", "beef", 250.0),
    kw("chicken", "chicken", 239.0),
    kw("fried_rice", "fried rice", 163.0),
    kw("taco", "taco", 226.0),
];

/// Identity used when no prediction matches a keyword.
pub const FALLBACK_FOOD: &str = "mixed meal";

/// Calorie density of the fallback identity.
pub const FALLBACK_KCAL_PER_100G: f64 = 180.0;

/// Split of total calories among carbohydrate, protein, and fat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroRatio {
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

/// A food category: any keyword contained in the food name selects its ratio.
#[derive(Debug, Clone, Copy)]
pub struct MacroRule {
    pub category: &'static str,
    pub keywords: &'static [&'static str],
    pub ratio: MacroRatio,
}

const fn ratio(carbs: f64, protein: f64, fat: f64) -> MacroRatio {
    MacroRatio {
        carbs,
        protein,
        fat,
    }
}

/// Category rules; the first rule with a matching keyword wins.
pub static MACRO_RULES: &[MacroRule] = &[
    MacroRule {
        category: "produce",
        keywords: &["salad", "vegetable", "apple", "banana"],
        ratio: ratio(0.60, 0.10, 0.30),
    },
    MacroRule {
        category: "meat",
        keywords: &["chicken", "beef", "steak"],
        ratio: ratio(0.10, 0.60, 0.30),
    },
    MacroRule {
        category: "indulgent",
        keywords: &["ice cream", "pizza", "fries", "burger"],
        ratio: ratio(0.40, 0.15, 0.45),
    },
    MacroRule {
        category: "beverage",
        keywords: &["coffee", "espresso"],
        ratio: ratio(0.05, 0.05, 0.90),
    },
];

/// Ratio applied when no category rule matches.
pub const DEFAULT_RATIO: MacroRatio = ratio(0.45, 0.20, 0.35);
