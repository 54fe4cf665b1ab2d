//! Catalog Service
//!
//! Categories, ingredients, products and their compositions. Every mutation
//! that touches derived carbon values runs in a single transaction: the
//! composition change, the product emission and the merchant rating commit
//! together or not at all.

use shared::models::{
    Category, CategoryCreate, Ingredient, IngredientCreate, Product, ProductCreate, ProductDetail,
    ProductIngredient, ProductUpdate,
};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use super::composition;
use super::emission::compute_merchant_rating;
use super::store::SqliteCatalogStore;
use crate::db::repository::{category, ingredient, merchant, order, product, product_ingredient};
use crate::orders::refresh_total;
use crate::services::{FileMetadata, FileStore};
use crate::utils::decimal::emission_to_f64;
use crate::utils::{AppError, AppResult, EntityKind};

fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::validation(format!(
            "price must be a positive number, got {price}"
        )));
    }
    Ok(())
}

/// Store the merchant rating from its current products; `None` when it has none
async fn refresh_merchant_rating(
    conn: &mut SqliteConnection,
    merchant_id: i64,
) -> AppResult<Option<f64>> {
    let products = product::find_by_merchant(&mut *conn, merchant_id).await?;
    let rating = if products.is_empty() {
        None
    } else {
        Some(emission_to_f64(compute_merchant_rating(&products)?))
    };
    merchant::update_carbon_rating(&mut *conn, merchant_id, rating).await?;
    Ok(rating)
}

#[derive(Clone)]
pub struct CatalogService {
    pool: SqlitePool,
}

impl CatalogService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========== Categories ==========

    pub async fn create_category(&self, name: &str) -> AppResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("category name must not be empty"));
        }
        let created = category::create(
            &self.pool,
            CategoryCreate {
                name: name.to_string(),
            },
        )
        .await?;
        info!(category_id = created.id, name = %created.name, "Category created");
        Ok(created)
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        Ok(category::find_all(&self.pool).await?)
    }

    // ========== Ingredients ==========

    pub async fn create_ingredient(&self, data: IngredientCreate) -> AppResult<Ingredient> {
        if data.name.trim().is_empty() {
            return Err(AppError::validation("ingredient name must not be empty"));
        }
        if !data.emission_per_gram.is_finite() || data.emission_per_gram < 0.0 {
            return Err(AppError::validation(format!(
                "emission_per_gram must be a non-negative number, got {}",
                data.emission_per_gram
            )));
        }
        let created = ingredient::create(&self.pool, data).await?;
        info!(
            ingredient_id = created.id,
            name = %created.name,
            emission_per_gram = created.emission_per_gram,
            "Ingredient created"
        );
        Ok(created)
    }

    pub async fn list_ingredients(&self) -> AppResult<Vec<Ingredient>> {
        Ok(ingredient::find_all(&self.pool).await?)
    }

    pub async fn get_ingredient(&self, name: &str) -> AppResult<Ingredient> {
        ingredient::find_by_name(&self.pool, name)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Ingredient))
    }

    // ========== Products ==========

    pub async fn get_product(&self, id: i64) -> AppResult<ProductDetail> {
        let mut conn = self.pool.acquire().await?;
        let product = product::require(&mut *conn, id).await?;
        let ingredients = product_ingredient::find_by_product(&mut *conn, id).await?;
        Ok(ProductDetail {
            product,
            ingredients,
        })
    }

    pub async fn get_all_products(&self) -> AppResult<Vec<Product>> {
        Ok(product::find_all(&self.pool).await?)
    }

    /// Products of a merchant, lowest emission first
    pub async fn get_products_by_merchant(&self, merchant_username: &str) -> AppResult<Vec<Product>> {
        let merchant = merchant::require_by_username(&self.pool, merchant_username).await?;
        Ok(product::find_by_merchant(&self.pool, merchant.id).await?)
    }

    /// Create a product with no ingredients; it joins the merchant rating at zero emission
    pub async fn create_product(
        &self,
        merchant_username: &str,
        data: ProductCreate,
    ) -> AppResult<Product> {
        validate_price(data.price)?;

        let mut tx = self.pool.begin().await?;
        let merchant = merchant::require_by_username(&mut *tx, merchant_username).await?;
        category::require(&mut *tx, data.category_id).await?;

        let created = product::create(&mut *tx, merchant.id, data).await?;
        let rating = refresh_merchant_rating(&mut tx, merchant.id).await?;
        tx.commit().await?;

        info!(
            product_id = created.id,
            merchant = %merchant.username,
            rating = ?rating,
            "Product created"
        );
        Ok(created)
    }

    /// Update descriptive fields and price
    ///
    /// Lines of pending orders pick up the new name and price; placed and
    /// closed orders keep what they were sold at.
    pub async fn update_product(&self, id: i64, data: ProductUpdate) -> AppResult<Product> {
        if let Some(price) = data.price {
            validate_price(price)?;
        }

        let mut tx = self.pool.begin().await?;
        product::require(&mut *tx, id).await?;
        if let Some(category_id) = data.category_id {
            category::require(&mut *tx, category_id).await?;
        }

        let line_changed = data.price.is_some() || data.name.is_some();
        let updated = product::update(&mut *tx, id, data).await?;

        let mut orders_updated = 0;
        if line_changed {
            order::sync_open_items(&mut *tx, &updated).await?;
            let open_orders = order::find_open_ids_containing_product(&mut *tx, id).await?;
            for order_id in &open_orders {
                refresh_total(&mut tx, *order_id).await?;
            }
            orders_updated = open_orders.len();
        }
        tx.commit().await?;

        info!(product_id = id, orders_updated, "Product updated");
        Ok(updated)
    }

    /// Delete a product and its compositions, re-deriving totals and rating
    ///
    /// The product leaves pending orders. Lines of any other order stay with
    /// their recorded name and price, unlinked from the catalog.
    pub async fn delete_product(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        let existing = product::require(&mut *tx, id).await?;

        let affected_orders = order::find_open_ids_containing_product(&mut *tx, id).await?;
        order::delete_open_items_of_product(&mut *tx, id).await?;
        product::delete(&mut *tx, id).await?;

        for order_id in &affected_orders {
            refresh_total(&mut tx, *order_id).await?;
        }
        let rating = refresh_merchant_rating(&mut tx, existing.merchant_id).await?;
        tx.commit().await?;

        info!(
            product_id = id,
            merchant_id = existing.merchant_id,
            orders_updated = affected_orders.len(),
            rating = ?rating,
            "Product deleted"
        );
        Ok(())
    }

    /// Store an image through `files` and record its URL on the product
    pub async fn upload_product_image(
        &self,
        id: i64,
        data: &[u8],
        metadata: &FileMetadata,
        files: &dyn FileStore,
    ) -> AppResult<Product> {
        product::require(&self.pool, id).await?;
        let url = files.upload_file(data, metadata).await?;
        let updated = product::update_image_url(&self.pool, id, &url).await?;
        info!(product_id = id, url = %url, "Product image uploaded");
        Ok(updated)
    }

    // ========== Compositions ==========

    pub async fn get_all_product_ingredients(&self) -> AppResult<Vec<ProductIngredient>> {
        Ok(product_ingredient::find_all(&self.pool).await?)
    }

    pub async fn add_ingredient_to_product(
        &self,
        product_id: i64,
        ingredient_name: &str,
        serving_qty: f64,
    ) -> AppResult<ProductIngredient> {
        let mut tx = self.pool.begin().await?;
        let result = {
            let mut store = SqliteCatalogStore::new(&mut tx);
            composition::add_ingredient(&mut store, product_id, ingredient_name, serving_qty).await
        };
        match result {
            Ok(association) => {
                tx.commit().await?;
                info!(product_id, ingredient = %ingredient_name, serving_qty, "Ingredient added to product");
                Ok(association)
            }
            Err(e) => {
                warn!(product_id, ingredient = %ingredient_name, error = %e, "Add ingredient rejected");
                Err(e)
            }
        }
    }

    pub async fn update_product_ingredient(
        &self,
        product_id: i64,
        ingredient_name: &str,
        serving_qty: f64,
    ) -> AppResult<ProductIngredient> {
        let mut tx = self.pool.begin().await?;
        let result = {
            let mut store = SqliteCatalogStore::new(&mut tx);
            composition::update_ingredient(&mut store, product_id, ingredient_name, serving_qty)
                .await
        };
        match result {
            Ok(association) => {
                tx.commit().await?;
                info!(product_id, ingredient = %ingredient_name, serving_qty, "Product ingredient updated");
                Ok(association)
            }
            Err(e) => {
                warn!(product_id, ingredient = %ingredient_name, error = %e, "Update ingredient rejected");
                Err(e)
            }
        }
    }

    pub async fn remove_product_ingredient(
        &self,
        product_id: i64,
        ingredient_name: &str,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        let result = {
            let mut store = SqliteCatalogStore::new(&mut tx);
            composition::remove_ingredient(&mut store, product_id, ingredient_name).await
        };
        match result {
            Ok(()) => {
                tx.commit().await?;
                info!(product_id, ingredient = %ingredient_name, "Ingredient removed from product");
                Ok(())
            }
            Err(e) => {
                warn!(product_id, ingredient = %ingredient_name, error = %e, "Remove ingredient rejected");
                Err(e)
            }
        }
    }
}
