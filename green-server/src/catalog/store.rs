//! Catalog storage seam
//!
//! [`CatalogStore`] is everything the composition manager reads or writes.
//! [`SqliteCatalogStore`] implements it over one open transaction so the
//! association change, the product emission and the merchant rating commit
//! together.

use async_trait::async_trait;
use shared::models::{Ingredient, Merchant, Product, ProductIngredient};
use sqlx::SqliteConnection;

use crate::db::repository::{ingredient, merchant, product, product_ingredient};
use crate::utils::{AppError, AppResult, EntityKind};

#[async_trait]
pub trait CatalogStore: Send {
    async fn find_product_by_id(&mut self, id: i64) -> AppResult<Option<Product>>;

    async fn find_ingredient_by_name(&mut self, name: &str) -> AppResult<Option<Ingredient>>;

    async fn find_association(
        &mut self,
        ingredient: &Ingredient,
        product: &Product,
    ) -> AppResult<Option<ProductIngredient>>;

    async fn exists_association(
        &mut self,
        ingredient: &Ingredient,
        product: &Product,
    ) -> AppResult<bool>;

    /// Current association set of a product
    async fn associations_of(&mut self, product: &Product) -> AppResult<Vec<ProductIngredient>>;

    /// Insert the association, or replace its serving quantity
    async fn save_association(&mut self, association: &ProductIngredient) -> AppResult<()>;

    async fn delete_association(&mut self, association: &ProductIngredient) -> AppResult<()>;

    async fn merchant_of(&mut self, product: &Product) -> AppResult<Merchant>;

    async fn products_of(&mut self, merchant: &Merchant) -> AppResult<Vec<Product>>;

    async fn save_product_emission(&mut self, product_id: i64, emission: f64) -> AppResult<()>;

    async fn save_merchant_rating(&mut self, merchant_id: i64, rating: Option<f64>)
    -> AppResult<()>;
}

/// [`CatalogStore`] over a borrowed SQLite connection (normally `&mut *tx`)
pub struct SqliteCatalogStore<'t> {
    conn: &'t mut SqliteConnection,
}

impl<'t> SqliteCatalogStore<'t> {
    pub fn new(conn: &'t mut SqliteConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore<'_> {
    async fn find_product_by_id(&mut self, id: i64) -> AppResult<Option<Product>> {
        Ok(product::find_by_id(&mut *self.conn, id).await?)
    }

    async fn find_ingredient_by_name(&mut self, name: &str) -> AppResult<Option<Ingredient>> {
        Ok(ingredient::find_by_name(&mut *self.conn, name).await?)
    }

    async fn find_association(
        &mut self,
        ingredient: &Ingredient,
        product: &Product,
    ) -> AppResult<Option<ProductIngredient>> {
        Ok(product_ingredient::find(&mut *self.conn, ingredient.id, product.id).await?)
    }

    async fn exists_association(
        &mut self,
        ingredient: &Ingredient,
        product: &Product,
    ) -> AppResult<bool> {
        Ok(product_ingredient::exists(&mut *self.conn, ingredient.id, product.id).await?)
    }

    async fn associations_of(&mut self, product: &Product) -> AppResult<Vec<ProductIngredient>> {
        Ok(product_ingredient::find_by_product(&mut *self.conn, product.id).await?)
    }

    async fn save_association(&mut self, association: &ProductIngredient) -> AppResult<()> {
        Ok(product_ingredient::save(&mut *self.conn, association).await?)
    }

    async fn delete_association(&mut self, association: &ProductIngredient) -> AppResult<()> {
        Ok(product_ingredient::delete(
            &mut *self.conn,
            association.ingredient_id,
            association.product_id,
        )
        .await?)
    }

    async fn merchant_of(&mut self, product: &Product) -> AppResult<Merchant> {
        merchant::find_by_id(&mut *self.conn, product.merchant_id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Merchant))
    }

    async fn products_of(&mut self, merchant: &Merchant) -> AppResult<Vec<Product>> {
        Ok(product::find_by_merchant(&mut *self.conn, merchant.id).await?)
    }

    async fn save_product_emission(&mut self, product_id: i64, emission: f64) -> AppResult<()> {
        Ok(product::update_carbon_emission(&mut *self.conn, product_id, emission).await?)
    }

    async fn save_merchant_rating(
        &mut self,
        merchant_id: i64,
        rating: Option<f64>,
    ) -> AppResult<()> {
        Ok(merchant::update_carbon_rating(&mut *self.conn, merchant_id, rating).await?)
    }
}
