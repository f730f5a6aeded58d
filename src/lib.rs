//! # Meal Planner
//!
//! Weekly meal planning service: saved recipes go into breakfast, lunch
//! and dinner slots, and the planned ingredients are merged into a
//! categorised shopping list priced against two grocery stores.

pub mod api;
pub mod category;
pub mod circuit_breaker;
pub mod config;
pub mod db;
pub mod errors;
pub mod meal_plan;
pub mod measure;
pub mod pricing;
pub mod shopping_list;
