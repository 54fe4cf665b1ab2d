//! Order lifecycle
//!
//! - [`money`] - line and order totals in `Decimal`
//! - [`service`] - [`OrderService`], one transaction per mutation

pub mod money;
pub mod service;

pub use service::{OrderService, refresh_total};
