//! Shared types for the green ordering platform
//!
//! Data models exchanged between the service layer and its callers,
//! the stable error-code table, and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
