//! # Meal Plan Module
//!
//! Weekly meal-plan slots: seven days by three meals, each holding at most
//! one saved recipe.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPool;
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::db;
use crate::errors::{AppError, AppResult};

/// Day column of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayOfWeek::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::BadRequest(format!("Invalid day_of_week: '{s}'")))
    }
}

/// Meal row of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealType::ALL
            .into_iter()
            .find(|meal| meal.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::BadRequest(format!("Invalid meal_type: '{s}'")))
    }
}

/// A filled slot joined with the recipe it holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanEntry {
    pub recipe_id: i64,
    pub day_of_week: DayOfWeek,
    pub meal_type: MealType,
    pub recipe_name: String,
    pub recipe_photo: String,
    pub recipe_category: String,
    pub recipe_region: String,
}

/// What an assignment did to the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotChange {
    Inserted,
    Updated,
}

impl SlotChange {
    pub fn message(&self) -> &'static str {
        match self {
            SlotChange::Inserted => "Recipe added to meal plan successfully",
            SlotChange::Updated => "Meal plan updated successfully",
        }
    }
}

pub const RECIPE_NOT_SAVED: &str =
    "Recipe not found in saved recipes. Please save the recipe first.";
pub const SLOT_NOT_FOUND: &str = "Meal entry not found for this user, day, and meal type.";

/// Put a saved recipe into a slot, replacing whatever was there.
///
/// The recipe must already be one of the user's saved recipes.
pub async fn assign_recipe(
    pool: &PgPool,
    user_id: i64,
    recipe_id: i64,
    day: DayOfWeek,
    meal: MealType,
) -> AppResult<SlotChange> {
    if !db::is_recipe_saved(pool, user_id, recipe_id).await? {
        info!(
            "Recipe {} is not saved by user {}, refusing slot assignment",
            recipe_id, user_id
        );
        return Err(AppError::NotFound(RECIPE_NOT_SAVED.to_string()));
    }

    db::upsert_meal_plan_slot(pool, user_id, recipe_id, day, meal).await
}

/// Empty a single slot; absent slots are reported as not found
pub async fn remove_slot(
    pool: &PgPool,
    user_id: i64,
    day: DayOfWeek,
    meal: MealType,
) -> AppResult<()> {
    if db::delete_meal_plan_slot(pool, user_id, day, meal).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(SLOT_NOT_FOUND.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_parsing() {
        assert_eq!("Monday".parse::<DayOfWeek>().unwrap(), DayOfWeek::Monday);
        assert_eq!(" sunday ".parse::<DayOfWeek>().unwrap(), DayOfWeek::Sunday);
        assert!("Funday".parse::<DayOfWeek>().is_err());
        assert!("".parse::<DayOfWeek>().is_err());
    }

    #[test]
    fn test_meal_parsing() {
        assert_eq!("Lunch".parse::<MealType>().unwrap(), MealType::Lunch);
        assert_eq!("DINNER".parse::<MealType>().unwrap(), MealType::Dinner);
        let err = "Brunch".parse::<MealType>().unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_week_ordering() {
        let mut days = vec![DayOfWeek::Sunday, DayOfWeek::Monday, DayOfWeek::Wednesday];
        days.sort();
        assert_eq!(
            days,
            vec![DayOfWeek::Monday, DayOfWeek::Wednesday, DayOfWeek::Sunday]
        );
        assert!(MealType::Breakfast < MealType::Dinner);
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for day in DayOfWeek::ALL {
            assert_eq!(day.to_string().parse::<DayOfWeek>().unwrap(), day);
        }
        for meal in MealType::ALL {
            assert_eq!(meal.to_string().parse::<MealType>().unwrap(), meal);
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&DayOfWeek::Friday).unwrap(), "\"Friday\"");
        let meal: MealType = serde_json::from_str("\"Breakfast\"").unwrap();
        assert_eq!(meal, MealType::Breakfast);
        assert_eq!(serde_json::to_string(&SlotChange::Updated).unwrap(), "\"updated\"");
    }
}
