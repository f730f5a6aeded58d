//! # Shopping List Categories
//!
//! Assigns ingredients to shopping-list sections by keyword.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shopping-list section an ingredient is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoryBucket {
    #[serde(rename = "Produce")]
    Produce,
    #[serde(rename = "Meat & Seafood")]
    MeatSeafood,
    #[serde(rename = "Dairy")]
    Dairy,
    #[serde(rename = "Pantry")]
    Pantry,
    #[serde(rename = "Other")]
    Other,
}

/// Order in which keyword sets are tried; the first hit wins
const SCAN_ORDER: [(CategoryBucket, &[&str]); 4] = [
    (
        CategoryBucket::MeatSeafood,
        &["chicken", "beef", "fish", "pork", "lamb", "seafood"],
    ),
    (
        CategoryBucket::Dairy,
        &["milk", "cheese", "yogurt", "butter", "cream", "eggs"],
    ),
    (
        CategoryBucket::Produce,
        &[
            "onion",
            "garlic",
            "potato",
            "tomato",
            "carrot",
            "lettuce",
            "fruit",
            "vegetable",
        ],
    ),
    (
        CategoryBucket::Pantry,
        &["flour", "sugar", "salt", "pepper", "oil", "rice", "pasta", "bread"],
    ),
];

impl CategoryBucket {
    /// Order sections appear in a rendered shopping list
    pub const DISPLAY_ORDER: [CategoryBucket; 5] = [
        CategoryBucket::Produce,
        CategoryBucket::MeatSeafood,
        CategoryBucket::Dairy,
        CategoryBucket::Pantry,
        CategoryBucket::Other,
    ];

    /// Section heading
    pub fn label(&self) -> &'static str {
        match self {
            CategoryBucket::Produce => "Produce",
            CategoryBucket::MeatSeafood => "Meat & Seafood",
            CategoryBucket::Dairy => "Dairy",
            CategoryBucket::Pantry => "Pantry",
            CategoryBucket::Other => "Other",
        }
    }

    /// Keywords that select this bucket (empty for `Other`)
    pub fn keywords(&self) -> &'static [&'static str] {
        SCAN_ORDER
            .iter()
            .find(|(bucket, _)| bucket == self)
            .map(|(_, keywords)| *keywords)
            .unwrap_or(&[])
    }
}

impl fmt::Display for CategoryBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify an ingredient name.
///
/// ```rust
/// use meal_planner::category::{classify, CategoryBucket};
///
/// assert_eq!(classify("Chicken Rice"), CategoryBucket::MeatSeafood);
/// assert_eq!(classify("plain flour"), CategoryBucket::Pantry);
/// assert_eq!(classify("saffron"), CategoryBucket::Other);
/// ```
pub fn classify(ingredient_name: &str) -> CategoryBucket {
    let lower = ingredient_name.to_lowercase();

    SCAN_ORDER
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(bucket, _)| *bucket)
        .unwrap_or(CategoryBucket::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_bucket_has_a_hit() {
        assert_eq!(classify("beef mince"), CategoryBucket::MeatSeafood);
        assert_eq!(classify("cheddar cheese"), CategoryBucket::Dairy);
        assert_eq!(classify("red onion"), CategoryBucket::Produce);
        assert_eq!(classify("olive oil"), CategoryBucket::Pantry);
        assert_eq!(classify("cumin"), CategoryBucket::Other);
    }

    #[test]
    fn test_scan_order_breaks_ties() {
        assert_eq!(classify("chicken rice"), CategoryBucket::MeatSeafood);
        // "butter" is dairy even though "pepper" would be pantry
        assert_eq!(classify("pepper butter"), CategoryBucket::Dairy);
        assert_eq!(classify("garlic bread"), CategoryBucket::Produce);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert_eq!(classify("FISH Sauce"), CategoryBucket::MeatSeafood);
        assert_eq!(classify("Greek Yogurt"), CategoryBucket::Dairy);
    }

    #[test]
    fn test_substring_matches() {
        // "eggs" does not match a single "egg"
        assert_eq!(classify("egg"), CategoryBucket::Other);
        assert_eq!(classify("eggplant"), CategoryBucket::Other);
        assert_eq!(classify("tomatoes"), CategoryBucket::Produce);
        assert_eq!(classify("sour cream"), CategoryBucket::Dairy);
    }

    #[test]
    fn test_empty_name_is_other() {
        assert_eq!(classify(""), CategoryBucket::Other);
    }

    #[test]
    fn test_labels_and_keywords() {
        assert_eq!(CategoryBucket::MeatSeafood.to_string(), "Meat & Seafood");
        assert!(CategoryBucket::Pantry.keywords().contains(&"rice"));
        assert!(CategoryBucket::Other.keywords().is_empty());
        assert_eq!(
            serde_json::to_string(&CategoryBucket::MeatSeafood).unwrap(),
            "\"Meat & Seafood\""
        );
    }
}
