//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Unit price, strictly positive
    pub price: f64,
    pub description: String,
    /// Derived: Σ serving_qty × emission_per_gram over the product's ingredients
    pub carbon_emission: f64,
    pub image_url: Option<String>,
    pub flavour_type: Option<String>,
    pub category_id: i64,
    pub merchant_id: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image_url: Option<String>,
    pub flavour_type: Option<String>,
    pub category_id: i64,
}

/// Update product payload
///
/// `carbon_emission` is derived from the ingredient list and has no field here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub flavour_type: Option<String>,
    pub category_id: Option<i64>,
}

/// "This product contains this ingredient at `serving_qty` grams."
///
/// Identity is the (product_id, ingredient_id) pair. The ingredient's name and
/// emission factor are joined in so emission can be computed without another
/// lookup; the product itself is never embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductIngredient {
    pub product_id: i64,
    pub ingredient_id: i64,
    pub ingredient_name: String,
    pub emission_per_gram: f64,
    /// Grams of the ingredient per serving, strictly positive
    pub serving_qty: f64,
}

impl ProductIngredient {
    /// Whether two records describe the same (product, ingredient) pair
    pub fn same_pair(&self, other: &ProductIngredient) -> bool {
        self.product_id == other.product_id && self.ingredient_id == other.ingredient_id
    }
}

/// Add/update ingredient payload (ingredient referenced by name)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductIngredientInput {
    pub name: String,
    pub serving_qty: f64,
}

/// Product with its ingredient composition (for detail views)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub ingredients: Vec<ProductIngredient>,
}
