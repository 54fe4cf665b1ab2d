//! Stable error codes for the green ordering platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Account errors (customers, merchants)
//! - 3xxx: Marketing errors (promotions, quests)
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors (products, ingredients, emissions)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so that any caller
/// (HTTP layer, CLI, tests) can translate them without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Derived state could not be computed
    InvalidState = 5,

    // ==================== 1xxx: Account ====================
    CustomerNotFound = 1001,
    MerchantNotFound = 1002,
    UsernameTaken = 1003,
    EmailTaken = 1004,

    // ==================== 3xxx: Marketing ====================
    PromotionNotFound = 3001,
    PromocodeExists = 3002,
    QuestNotFound = 3101,
    QuestTitleExists = 3102,

    // ==================== 4xxx: Order ====================
    OrderNotFound = 4001,
    OrderItemNotFound = 4002,

    // ==================== 6xxx: Catalog ====================
    ProductNotFound = 6001,
    IngredientNotFound = 6002,
    IngredientExists = 6003,
    ProductIngredientNotFound = 6004,
    ProductIngredientExists = 6005,
    CategoryNotFound = 6101,
    CategoryNameExists = 6102,

    // ==================== 65xx: File Upload ====================
    FileStorageFailed = 6501,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidState => "Operation not allowed in the current state",

            // Account
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::MerchantNotFound => "Merchant not found",
            ErrorCode::UsernameTaken => "Username is already taken",
            ErrorCode::EmailTaken => "Email is already registered",

            // Marketing
            ErrorCode::PromotionNotFound => "Promotion not found",
            ErrorCode::PromocodeExists => "Promocode already exists",
            ErrorCode::QuestNotFound => "Quest not found",
            ErrorCode::QuestTitleExists => "Quest title already exists",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderItemNotFound => "Order item not found",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::IngredientNotFound => "Ingredient not found",
            ErrorCode::IngredientExists => "Ingredient already exists",
            ErrorCode::ProductIngredientNotFound => "Product ingredient not found",
            ErrorCode::ProductIngredientExists => "Product ingredient already exists",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryNameExists => "Category name already exists",

            // File upload
            ErrorCode::FileStorageFailed => "Failed to store file",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidState),

            // Account
            1001 => Ok(ErrorCode::CustomerNotFound),
            1002 => Ok(ErrorCode::MerchantNotFound),
            1003 => Ok(ErrorCode::UsernameTaken),
            1004 => Ok(ErrorCode::EmailTaken),

            // Marketing
            3001 => Ok(ErrorCode::PromotionNotFound),
            3002 => Ok(ErrorCode::PromocodeExists),
            3101 => Ok(ErrorCode::QuestNotFound),
            3102 => Ok(ErrorCode::QuestTitleExists),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderItemNotFound),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::IngredientNotFound),
            6003 => Ok(ErrorCode::IngredientExists),
            6004 => Ok(ErrorCode::ProductIngredientNotFound),
            6005 => Ok(ErrorCode::ProductIngredientExists),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6102 => Ok(ErrorCode::CategoryNameExists),

            // File upload
            6501 => Ok(ErrorCode::FileStorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
