//! Ingredient Model

use serde::{Deserialize, Serialize};

/// Ingredient reference data, identified by its unique name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    /// Carbon emission per gram (kg CO2e / g), non-negative
    pub emission_per_gram: f64,
}

/// Create ingredient payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    pub emission_per_gram: f64,
}
