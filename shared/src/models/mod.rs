//! Data models
//!
//! Shared between the service layer and its callers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).
//!
//! Relations are expressed as foreign-key ids. Join records such as
//! [`ProductIngredient`] and [`OrderItem`] never embed their parent, so every
//! model serializes without cycles.

pub mod category;
pub mod customer;
pub mod ingredient;
pub mod merchant;
pub mod order;
pub mod product;
pub mod promotion;
pub mod quest;

// Re-exports
pub use category::*;
pub use customer::*;
pub use ingredient::*;
pub use merchant::*;
pub use order::*;
pub use product::*;
pub use promotion::*;
pub use quest::*;
