//! # Shopping List
//!
//! Turns the ingredient rows of every meal in a user's plan into a
//! deduplicated, categorised shopping list.
//!
//! ## Pipeline
//!
//! 1. [`aggregate_ingredients`] merges rows by lower-cased name, summing
//!    quantities whose units match exactly.
//! 2. [`ShoppingList::from_aggregated`] files each entry under a
//!    [`CategoryBucket`].
//! 3. [`ShoppingList::render_text`] produces a printable list.

use crate::category::{classify, CategoryBucket};
use crate::measure::parse_measure;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use tracing::debug;

/// One ingredient row of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct IngredientLine {
    pub ingredient_name: String,
    pub measure: String,
}

impl IngredientLine {
    pub fn new(ingredient_name: &str, measure: &str) -> Self {
        Self {
            ingredient_name: ingredient_name.to_string(),
            measure: measure.to_string(),
        }
    }
}

/// An ingredient merged across every recipe in the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedIngredient {
    /// Lower-cased, trimmed ingredient name; unique within a list
    pub name: String,
    pub total_quantity: f64,
    pub unit: String,
    /// Summed measure, or the first measure seen when nothing was summed
    pub display_measure: String,
    /// Distinct measures that could not be summed (plus the first one),
    /// in the order they were first seen
    pub measures: Vec<String>,
    pub count: u32,
}

impl AggregatedIngredient {
    fn from_first_line(name: String, measure: &str) -> Self {
        let parsed = parse_measure(measure);
        let mut measures = Vec::new();
        if !measure.is_empty() {
            measures.push(measure.to_string());
        }

        Self {
            name,
            total_quantity: parsed.quantity,
            unit: parsed.unit,
            display_measure: measure.to_string(),
            measures,
            count: 1,
        }
    }

    fn merge(&mut self, measure: &str) {
        let parsed = parse_measure(measure);

        if parsed.has_quantity() && parsed.unit == self.unit {
            self.total_quantity += parsed.quantity;
            self.display_measure = format!("{} {}", self.total_quantity, self.unit)
                .trim_end()
                .to_string();
        } else {
            if !self.measures.iter().any(|seen| seen == measure) {
                self.measures.push(measure.to_string());
            }
            self.count += 1;
        }
    }

    /// Text shown next to the name on the list
    pub fn display_amount(&self) -> String {
        if !self.display_measure.is_empty() {
            return self.display_measure.clone();
        }

        let joined = self
            .measures
            .iter()
            .map(String::as_str)
            .collect::<Vec<&str>>()
            .join(", ");

        if joined.is_empty() {
            "to taste".to_string()
        } else {
            joined
        }
    }

    /// `name: amount`
    pub fn display_line(&self) -> String {
        format!("{}: {}", self.name, self.display_amount())
    }
}

/// Merge ingredient rows into one entry per distinct name, sorted by name.
///
/// ```rust
/// use meal_planner::shopping_list::{aggregate_ingredients, IngredientLine};
///
/// let lines = vec![
///     IngredientLine::new("Flour", "2 cups"),
///     IngredientLine::new("flour ", "1 cups"),
/// ];
/// let aggregated = aggregate_ingredients(&lines);
///
/// assert_eq!(aggregated.len(), 1);
/// assert_eq!(aggregated[0].display_measure, "3 cups");
/// ```
pub fn aggregate_ingredients(lines: &[IngredientLine]) -> Vec<AggregatedIngredient> {
    let mut by_name: BTreeMap<String, AggregatedIngredient> = BTreeMap::new();

    for line in lines {
        let name = line.ingredient_name.trim().to_lowercase();
        let measure = line.measure.trim();

        match by_name.get_mut(&name) {
            Some(existing) => existing.merge(measure),
            None => {
                let entry = AggregatedIngredient::from_first_line(name.clone(), measure);
                by_name.insert(name, entry);
            }
        }
    }

    debug!(
        "Aggregated {} ingredient rows into {} entries",
        lines.len(),
        by_name.len()
    );

    by_name.into_values().collect()
}

/// A shopping-list section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListSection {
    pub category: CategoryBucket,
    pub items: Vec<AggregatedIngredient>,
}

/// Aggregated ingredients grouped by category; empty sections are omitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShoppingList {
    pub sections: Vec<ShoppingListSection>,
}

impl ShoppingList {
    /// Build a list straight from raw ingredient rows
    pub fn from_lines(lines: &[IngredientLine]) -> Self {
        Self::from_aggregated(aggregate_ingredients(lines))
    }

    /// Group already-aggregated ingredients by category
    pub fn from_aggregated(ingredients: Vec<AggregatedIngredient>) -> Self {
        let mut grouped: BTreeMap<CategoryBucket, Vec<AggregatedIngredient>> = BTreeMap::new();
        for ingredient in ingredients {
            grouped
                .entry(classify(&ingredient.name))
                .or_default()
                .push(ingredient);
        }

        let sections = CategoryBucket::DISPLAY_ORDER
            .iter()
            .filter_map(|bucket| {
                grouped.remove(bucket).map(|items| ShoppingListSection {
                    category: *bucket,
                    items,
                })
            })
            .collect();

        Self { sections }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|section| section.items.len()).sum()
    }

    /// Items filed under `category`, if any
    pub fn section(&self, category: CategoryBucket) -> Option<&ShoppingListSection> {
        self.sections
            .iter()
            .find(|section| section.category == category)
    }

    /// Plain-text rendering, one heading per section
    pub fn render_text(&self) -> String {
        if self.is_empty() {
            return "No ingredients found. Add some recipes to your meal plan first!\n".to_string();
        }

        let mut output = String::new();
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            let _ = writeln!(output, "{}", section.category);
            for item in &section.items {
                let _ = writeln!(output, "- {}", item.display_line());
            }
        }
        output
    }
}
