//! Account Service
//!
//! Usernames are unique across customers and merchants together; emails
//! are unique per table.

use shared::models::{Customer, CustomerCreate, CustomerUpdate, Merchant, MerchantCreate};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::repository::{customer, merchant};
use crate::utils::{AppError, AppResult, EntityKind};

fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

#[derive(Clone)]
pub struct AccountService {
    pool: SqlitePool,
}

impl AccountService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========== Customers ==========

    pub async fn create_customer(&self, data: CustomerCreate) -> AppResult<Customer> {
        require_non_empty("username", &data.username)?;
        require_non_empty("email", &data.email)?;

        let mut tx = self.pool.begin().await?;
        if customer::username_taken(&mut *tx, &data.username).await? {
            warn!(username = %data.username, "Username already taken");
            return Err(AppError::AlreadyExists(EntityKind::Username));
        }
        let created = customer::create(&mut *tx, data).await?;
        tx.commit().await?;

        info!(customer_id = created.id, username = %created.username, "Customer created");
        Ok(created)
    }

    pub async fn get_customer_by_username(&self, username: &str) -> AppResult<Customer> {
        Ok(customer::require_by_username(&self.pool, username).await?)
    }

    pub async fn get_customer_by_email(&self, email: &str) -> AppResult<Customer> {
        customer::find_by_email(&self.pool, email)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Customer))
    }

    pub async fn get_all_customers(&self) -> AppResult<Vec<Customer>> {
        Ok(customer::find_all(&self.pool).await?)
    }

    pub async fn update_customer(&self, username: &str, data: CustomerUpdate) -> AppResult<Customer> {
        if let Some(new_username) = &data.username {
            require_non_empty("username", new_username)?;
        }
        if let Some(email) = &data.email {
            require_non_empty("email", email)?;
        }

        let mut tx = self.pool.begin().await?;
        let existing = customer::require_by_username(&mut *tx, username).await?;
        if let Some(new_username) = &data.username
            && new_username != &existing.username
            && customer::username_taken(&mut *tx, new_username).await?
        {
            warn!(username = %new_username, "Username already taken");
            return Err(AppError::AlreadyExists(EntityKind::Username));
        }
        let updated = customer::update(&mut *tx, existing.id, data).await?;
        tx.commit().await?;

        info!(customer_id = updated.id, username = %updated.username, "Customer updated");
        Ok(updated)
    }

    pub async fn delete_customer(&self, username: &str) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        let existing = customer::require_by_username(&mut *tx, username).await?;
        customer::delete(&mut *tx, existing.id).await?;
        tx.commit().await?;

        info!(customer_id = existing.id, username = %username, "Customer deleted");
        Ok(())
    }

    // ========== Merchants ==========

    pub async fn create_merchant(&self, data: MerchantCreate) -> AppResult<Merchant> {
        require_non_empty("username", &data.username)?;
        require_non_empty("email", &data.email)?;
        require_non_empty("company", &data.company)?;

        let mut tx = self.pool.begin().await?;
        if customer::username_taken(&mut *tx, &data.username).await? {
            warn!(username = %data.username, "Username already taken");
            return Err(AppError::AlreadyExists(EntityKind::Username));
        }
        let created = merchant::create(&mut *tx, data).await?;
        tx.commit().await?;

        info!(merchant_id = created.id, username = %created.username, "Merchant created");
        Ok(created)
    }

    pub async fn get_merchant(&self, username: &str) -> AppResult<Merchant> {
        Ok(merchant::require_by_username(&self.pool, username).await?)
    }

    pub async fn get_all_merchants(&self) -> AppResult<Vec<Merchant>> {
        Ok(merchant::find_all(&self.pool).await?)
    }
}
