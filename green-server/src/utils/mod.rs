//! Utilities - error types, logging, decimal arithmetic
//!
//! - [`AppError`] - service error enum
//! - [`EntityKind`] - entity named by lookup/uniqueness failures
//! - decimal conversion helpers and the logger

pub mod decimal;
pub mod error;
pub mod logger;
pub mod result;

pub use error::{AppError, EntityKind};
pub use result::AppResult;
