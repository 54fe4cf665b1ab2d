//! Catalog
//!
//! - [`emission`] - pure emission and rating aggregation
//! - [`store`] - [`CatalogStore`] seam and its SQLite implementation
//! - [`composition`] - add/update/remove of product ingredients
//! - [`service`] - [`CatalogService`], transactional entry points

pub mod composition;
pub mod emission;
pub mod service;
pub mod store;

pub use emission::{compute_merchant_rating, compute_product_emission};
pub use service::CatalogService;
pub use store::{CatalogStore, SqliteCatalogStore};
