//! Error codes shared by every crate of the platform
//!
//! - [`ErrorCode`]: Standardized numeric codes for all failure kinds
//! - [`ErrorCategory`]: Classification of codes by domain
//!
//! Services keep their own rich error enums and expose an `ErrorCode` so the
//! caller can translate failures (to HTTP status, exit codes, ...) without
//! inspecting messages.
//!
//! # Example
//!
//! ```
//! use shared::error::{ErrorCategory, ErrorCode};
//!
//! let code = ErrorCode::ProductIngredientExists;
//! assert_eq!(code.code(), 6005);
//! assert_eq!(code.category(), ErrorCategory::Catalog);
//! ```

mod category;
mod codes;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
