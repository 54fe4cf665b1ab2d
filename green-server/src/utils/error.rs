//! Unified error handling
//!
//! - [`AppError`] - service-level error enum
//! - [`EntityKind`] - which entity a `NotFound`/`AlreadyExists` refers to
//!
//! Every variant maps to a stable [`ErrorCode`] through [`AppError::code`];
//! translating codes into transport-level status is left to the caller.
//!
//! # Usage
//!
//! ```ignore
//! let product = product::find_by_id(&pool, id)
//!     .await?
//!     .ok_or(AppError::NotFound(EntityKind::Product))?;
//! ```

use shared::error::ErrorCode;
use std::fmt;
use tracing::error;

use crate::db::repository::RepoError;

/// Entity referenced by a lookup or uniqueness failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Product,
    Ingredient,
    ProductIngredient,
    Category,
    Merchant,
    Customer,
    /// A username, shared by customers and merchants
    Username,
    Email,
    Order,
    OrderItem,
    Promotion,
    Quest,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Ingredient => "Ingredient",
            Self::ProductIngredient => "Product Ingredient",
            Self::Category => "Category",
            Self::Merchant => "Merchant",
            Self::Customer => "Customer",
            Self::Username => "Username",
            Self::Email => "Email",
            Self::Order => "Order",
            Self::OrderItem => "Order Item",
            Self::Promotion => "Promotion",
            Self::Quest => "Quest",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Application error
///
/// | Variant | Meaning |
/// |---------|---------|
/// | NotFound | referenced entity does not exist |
/// | AlreadyExists | uniqueness invariant would be violated |
/// | InvalidState | derived computation or transition not possible |
/// | Validation | input rejected before touching storage |
/// | Database / Storage / Internal | infrastructure failures |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(EntityKind),

    #[error("{0} already exists")]
    AlreadyExists(EntityKind),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::NotFound(kind) => match kind {
                EntityKind::Product => ErrorCode::ProductNotFound,
                EntityKind::Ingredient => ErrorCode::IngredientNotFound,
                EntityKind::ProductIngredient => ErrorCode::ProductIngredientNotFound,
                EntityKind::Category => ErrorCode::CategoryNotFound,
                EntityKind::Merchant => ErrorCode::MerchantNotFound,
                EntityKind::Customer => ErrorCode::CustomerNotFound,
                EntityKind::Order => ErrorCode::OrderNotFound,
                EntityKind::OrderItem => ErrorCode::OrderItemNotFound,
                EntityKind::Promotion => ErrorCode::PromotionNotFound,
                EntityKind::Quest => ErrorCode::QuestNotFound,
                EntityKind::Username | EntityKind::Email => ErrorCode::NotFound,
            },
            AppError::AlreadyExists(kind) => match kind {
                EntityKind::Ingredient => ErrorCode::IngredientExists,
                EntityKind::ProductIngredient => ErrorCode::ProductIngredientExists,
                EntityKind::Category => ErrorCode::CategoryNameExists,
                EntityKind::Username => ErrorCode::UsernameTaken,
                EntityKind::Email => ErrorCode::EmailTaken,
                EntityKind::Promotion => ErrorCode::PromocodeExists,
                EntityKind::Quest => ErrorCode::QuestTitleExists,
                _ => ErrorCode::AlreadyExists,
            },
            AppError::InvalidState(_) => ErrorCode::InvalidState,
            AppError::Validation(_) => ErrorCode::ValidationFailed,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::Storage(_) => ErrorCode::FileStorageFailed,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(kind) => AppError::NotFound(kind),
            RepoError::Duplicate(kind) => AppError::AlreadyExists(kind),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                AppError::Database(msg)
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_entity() {
        assert_eq!(
            AppError::NotFound(EntityKind::ProductIngredient).to_string(),
            "Product Ingredient not found"
        );
        assert_eq!(
            AppError::AlreadyExists(EntityKind::Username).to_string(),
            "Username already exists"
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            AppError::NotFound(EntityKind::Product).code(),
            ErrorCode::ProductNotFound
        );
        assert_eq!(
            AppError::AlreadyExists(EntityKind::ProductIngredient).code(),
            ErrorCode::ProductIngredientExists
        );
        assert_eq!(
            AppError::AlreadyExists(EntityKind::Order).code(),
            ErrorCode::AlreadyExists
        );
        assert_eq!(
            AppError::invalid_state("empty").code(),
            ErrorCode::InvalidState
        );
    }

    #[test]
    fn test_repo_error_conversion() {
        let err: AppError = RepoError::Duplicate(EntityKind::Ingredient).into();
        assert!(matches!(err, AppError::AlreadyExists(EntityKind::Ingredient)));

        let err: AppError = RepoError::Database("disk I/O".into()).into();
        assert!(matches!(err, AppError::Database(_)));
    }
}
