//! Unified Result Types

use crate::AppError;

/// Application-level Result type
pub type AppResult<T> = Result<T, AppError>;
