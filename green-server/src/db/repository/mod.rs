//! Repository Module
//!
//! Free async functions over SQLite, one module per table group.
//!
//! Single-statement functions accept any `SqliteExecutor` (`&pool` or
//! `&mut *tx`); functions issuing several statements take a
//! `&mut SqliteConnection` so they can run inside the caller's transaction.

// Accounts
pub mod customer;
pub mod merchant;

// Catalog
pub mod category;
pub mod ingredient;
pub mod product;
pub mod product_ingredient;

// Orders
pub mod order;

// Marketing
pub mod promotion;
pub mod quest;

use crate::utils::EntityKind;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0} not found")]
    NotFound(EntityKind),

    #[error("Duplicate: {0}")]
    Duplicate(EntityKind),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Map a unique-constraint violation on insert/update to `Duplicate(kind)`
pub(crate) fn map_unique(kind: EntityKind) -> impl FnOnce(sqlx::Error) -> RepoError {
    move |err| match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => RepoError::Duplicate(kind),
        _ => RepoError::from(err),
    }
}

/// Map a unique-constraint violation to `Duplicate` of the violated column
///
/// SQLite reports the column as `UNIQUE constraint failed: <table>.<column>`;
/// a violation on a column not listed maps to `fallback`.
pub(crate) fn map_unique_column(
    columns: &'static [(&'static str, EntityKind)],
    fallback: EntityKind,
) -> impl FnOnce(sqlx::Error) -> RepoError {
    move |err| match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepoError::Duplicate(unique_column_kind(db_err.message(), columns).unwrap_or(fallback))
        }
        _ => RepoError::from(err),
    }
}

fn unique_column_kind(
    message: &str,
    columns: &[(&'static str, EntityKind)],
) -> Option<EntityKind> {
    let failed = message.rsplit(": ").next()?;
    failed.split(", ").find_map(|qualified| {
        let column = qualified.rsplit('.').next()?;
        columns
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, kind)| *kind)
    })
}

/// Unique columns shared by the customer and merchant tables
pub(crate) const ACCOUNT_UNIQUE_COLUMNS: &[(&str, EntityKind)] = &[
    ("username", EntityKind::Username),
    ("email", EntityKind::Email),
];
