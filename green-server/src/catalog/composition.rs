//! Product/ingredient composition
//!
//! Add, update and remove operate on the whole association set of one
//! product. Every successful call ends with [`recompute`], which re-derives
//! the product emission and then the owning merchant's rating, so both
//! derived fields always match the stored associations.

use shared::models::{Ingredient, Product, ProductIngredient};
use tracing::debug;

use super::emission::{compute_merchant_rating, compute_product_emission};
use super::store::CatalogStore;
use crate::utils::decimal::emission_to_f64;
use crate::utils::{AppError, AppResult, EntityKind};

/// Reject non-finite or non-positive serving quantities
pub fn validate_serving_qty(serving_qty: f64) -> AppResult<()> {
    if !serving_qty.is_finite() || serving_qty <= 0.0 {
        return Err(AppError::validation(format!(
            "serving_qty must be a positive number, got {serving_qty}"
        )));
    }
    Ok(())
}

async fn lookup<S: CatalogStore + ?Sized>(
    store: &mut S,
    product_id: i64,
    ingredient_name: &str,
) -> AppResult<(Product, Ingredient)> {
    let product = store
        .find_product_by_id(product_id)
        .await?
        .ok_or(AppError::NotFound(EntityKind::Product))?;
    let ingredient = store
        .find_ingredient_by_name(ingredient_name)
        .await?
        .ok_or(AppError::NotFound(EntityKind::Ingredient))?;
    Ok((product, ingredient))
}

/// Re-derive product emission from `associations`, then the merchant rating
pub async fn recompute<S: CatalogStore + ?Sized>(
    store: &mut S,
    product: &Product,
    associations: &[ProductIngredient],
) -> AppResult<()> {
    let emission = emission_to_f64(compute_product_emission(associations));
    store.save_product_emission(product.id, emission).await?;

    let merchant = store.merchant_of(product).await?;
    let products = store.products_of(&merchant).await?;
    let rating = emission_to_f64(compute_merchant_rating(&products)?);
    store.save_merchant_rating(merchant.id, Some(rating)).await?;

    debug!(
        product_id = product.id,
        merchant_id = merchant.id,
        emission,
        rating,
        "Recomputed carbon emission and rating"
    );
    Ok(())
}

/// Attach an ingredient to a product
pub async fn add_ingredient<S: CatalogStore + ?Sized>(
    store: &mut S,
    product_id: i64,
    ingredient_name: &str,
    serving_qty: f64,
) -> AppResult<ProductIngredient> {
    validate_serving_qty(serving_qty)?;

    // 1. Resolve both ends
    let (product, ingredient) = lookup(store, product_id, ingredient_name).await?;

    // 2. One association per (product, ingredient)
    if store.exists_association(&ingredient, &product).await? {
        return Err(AppError::AlreadyExists(EntityKind::ProductIngredient));
    }

    // 3. Extend the set and persist the new row
    let association = ProductIngredient {
        product_id: product.id,
        ingredient_id: ingredient.id,
        ingredient_name: ingredient.name,
        emission_per_gram: ingredient.emission_per_gram,
        serving_qty,
    };
    let mut associations = store.associations_of(&product).await?;
    associations.push(association.clone());
    store.save_association(&association).await?;

    // 4. Derived fields
    recompute(store, &product, &associations).await?;
    Ok(association)
}

/// Change the serving quantity of an existing association
pub async fn update_ingredient<S: CatalogStore + ?Sized>(
    store: &mut S,
    product_id: i64,
    ingredient_name: &str,
    serving_qty: f64,
) -> AppResult<ProductIngredient> {
    validate_serving_qty(serving_qty)?;

    let (product, ingredient) = lookup(store, product_id, ingredient_name).await?;
    let mut updated = store
        .find_association(&ingredient, &product)
        .await?
        .ok_or(AppError::NotFound(EntityKind::ProductIngredient))?;
    updated.serving_qty = serving_qty;

    let mut associations = store.associations_of(&product).await?;
    associations.retain(|a| !a.same_pair(&updated));
    associations.push(updated.clone());
    store.save_association(&updated).await?;

    recompute(store, &product, &associations).await?;
    Ok(updated)
}

/// Detach an ingredient from a product
pub async fn remove_ingredient<S: CatalogStore + ?Sized>(
    store: &mut S,
    product_id: i64,
    ingredient_name: &str,
) -> AppResult<()> {
    let (product, ingredient) = lookup(store, product_id, ingredient_name).await?;
    let existing = store
        .find_association(&ingredient, &product)
        .await?
        .ok_or(AppError::NotFound(EntityKind::ProductIngredient))?;

    // The stored row must also be part of the product's current set
    let mut associations = store.associations_of(&product).await?;
    let index = associations
        .iter()
        .position(|a| a.same_pair(&existing))
        .ok_or(AppError::NotFound(EntityKind::ProductIngredient))?;
    associations.remove(index);
    store.delete_association(&existing).await?;

    recompute(store, &product, &associations).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::models::Merchant;
    use std::collections::BTreeMap;

    /// In-memory catalog keyed the same way as the database
    #[derive(Default, Clone)]
    struct FakeStore {
        products: BTreeMap<i64, Product>,
        ingredients: Vec<Ingredient>,
        associations: BTreeMap<(i64, i64), f64>,
        merchants: BTreeMap<i64, Merchant>,
    }

    impl FakeStore {
        fn with_bakery() -> Self {
            let mut store = FakeStore::default();
            store.merchants.insert(
                1,
                Merchant {
                    id: 1,
                    username: "bakery".into(),
                    email: "bakery@example.com".into(),
                    company: "Bakery".into(),
                    logo_url: None,
                    carbon_rating: None,
                    created_at: 0,
                },
            );
            store.add_product(10, 1);
            for (id, name, per_gram) in [(1, "Flour", 0.5), (2, "Sugar", 0.2), (3, "Milk", 0.1)] {
                store.ingredients.push(Ingredient {
                    id,
                    name: name.into(),
                    emission_per_gram: per_gram,
                });
            }
            store
        }

        fn add_product(&mut self, id: i64, merchant_id: i64) {
            self.products.insert(
                id,
                Product {
                    id,
                    name: format!("Product {id}"),
                    price: 3.5,
                    description: String::new(),
                    carbon_emission: 0.0,
                    image_url: None,
                    flavour_type: None,
                    category_id: 1,
                    merchant_id,
                },
            );
        }

        fn joined(&self, product_id: i64, ingredient_id: i64, qty: f64) -> ProductIngredient {
            let ingredient = self
                .ingredients
                .iter()
                .find(|i| i.id == ingredient_id)
                .unwrap();
            ProductIngredient {
                product_id,
                ingredient_id,
                ingredient_name: ingredient.name.clone(),
                emission_per_gram: ingredient.emission_per_gram,
                serving_qty: qty,
            }
        }

        fn emission(&self, product_id: i64) -> f64 {
            self.products[&product_id].carbon_emission
        }

        fn rating(&self, merchant_id: i64) -> Option<f64> {
            self.merchants[&merchant_id].carbon_rating
        }
    }

    #[async_trait]
    impl CatalogStore for FakeStore {
        async fn find_product_by_id(&mut self, id: i64) -> AppResult<Option<Product>> {
            Ok(self.products.get(&id).cloned())
        }

        async fn find_ingredient_by_name(&mut self, name: &str) -> AppResult<Option<Ingredient>> {
            Ok(self.ingredients.iter().find(|i| i.name == name).cloned())
        }

        async fn find_association(
            &mut self,
            ingredient: &Ingredient,
            product: &Product,
        ) -> AppResult<Option<ProductIngredient>> {
            Ok(self
                .associations
                .get(&(product.id, ingredient.id))
                .map(|qty| self.joined(product.id, ingredient.id, *qty)))
        }

        async fn exists_association(
            &mut self,
            ingredient: &Ingredient,
            product: &Product,
        ) -> AppResult<bool> {
            Ok(self.associations.contains_key(&(product.id, ingredient.id)))
        }

        async fn associations_of(
            &mut self,
            product: &Product,
        ) -> AppResult<Vec<ProductIngredient>> {
            Ok(self
                .associations
                .iter()
                .filter(|((p, _), _)| *p == product.id)
                .map(|((p, i), qty)| self.joined(*p, *i, *qty))
                .collect())
        }

        async fn save_association(&mut self, association: &ProductIngredient) -> AppResult<()> {
            self.associations.insert(
                (association.product_id, association.ingredient_id),
                association.serving_qty,
            );
            Ok(())
        }

        async fn delete_association(&mut self, association: &ProductIngredient) -> AppResult<()> {
            self.associations
                .remove(&(association.product_id, association.ingredient_id))
                .map(|_| ())
                .ok_or(AppError::NotFound(EntityKind::ProductIngredient))
        }

        async fn merchant_of(&mut self, product: &Product) -> AppResult<Merchant> {
            self.merchants
                .get(&product.merchant_id)
                .cloned()
                .ok_or(AppError::NotFound(EntityKind::Merchant))
        }

        async fn products_of(&mut self, merchant: &Merchant) -> AppResult<Vec<Product>> {
            Ok(self
                .products
                .values()
                .filter(|p| p.merchant_id == merchant.id)
                .cloned()
                .collect())
        }

        async fn save_product_emission(&mut self, product_id: i64, emission: f64) -> AppResult<()> {
            let product = self
                .products
                .get_mut(&product_id)
                .ok_or(AppError::NotFound(EntityKind::Product))?;
            product.carbon_emission = emission;
            Ok(())
        }

        async fn save_merchant_rating(
            &mut self,
            merchant_id: i64,
            rating: Option<f64>,
        ) -> AppResult<()> {
            let merchant = self
                .merchants
                .get_mut(&merchant_id)
                .ok_or(AppError::NotFound(EntityKind::Merchant))?;
            merchant.carbon_rating = rating;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_add_then_remove_restores_emission() {
        let mut store = FakeStore::with_bakery();
        add_ingredient(&mut store, 10, "Flour", 100.0).await.unwrap();
        add_ingredient(&mut store, 10, "Sugar", 50.0).await.unwrap();
        assert_eq!(store.emission(10), 60.0);
        assert_eq!(store.rating(1), Some(60.0));

        let milk = add_ingredient(&mut store, 10, "Milk", 200.0).await.unwrap();
        assert_eq!(milk.ingredient_name, "Milk");
        assert_eq!(milk.serving_qty, 200.0);
        assert_eq!(store.emission(10), 80.0);
        assert_eq!(store.rating(1), Some(80.0));

        remove_ingredient(&mut store, 10, "Milk").await.unwrap();
        assert_eq!(store.emission(10), 60.0);
        assert_eq!(store.rating(1), Some(60.0));
    }

    #[tokio::test]
    async fn test_small_per_gram_factors_are_stored_exactly() {
        let mut store = FakeStore::with_bakery();
        store.ingredients.push(Ingredient {
            id: 4,
            name: "Potato".into(),
            emission_per_gram: 0.00046,
        });

        add_ingredient(&mut store, 10, "Potato", 1.0).await.unwrap();
        assert_eq!(store.emission(10), 0.00046);
        assert_eq!(store.rating(1), Some(0.00046));

        update_ingredient(&mut store, 10, "Potato", 0.1).await.unwrap();
        assert_eq!(store.emission(10), 0.000046);
        assert!(store.emission(10) > 0.0);
    }

    #[tokio::test]
    async fn test_rating_averages_all_merchant_products() {
        let mut store = FakeStore::with_bakery();
        store.add_product(11, 1);
        add_ingredient(&mut store, 10, "Flour", 100.0).await.unwrap();
        // 50 and 0 -> 25
        assert_eq!(store.rating(1), Some(25.0));

        add_ingredient(&mut store, 11, "Milk", 300.0).await.unwrap();
        // 50 and 30 -> 40
        assert_eq!(store.rating(1), Some(40.0));
    }

    #[tokio::test]
    async fn test_duplicate_add_leaves_state_unchanged() {
        let mut store = FakeStore::with_bakery();
        add_ingredient(&mut store, 10, "Flour", 100.0).await.unwrap();
        let before = store.clone();

        let err = add_ingredient(&mut store, 10, "Flour", 10.0).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::AlreadyExists(EntityKind::ProductIngredient)
        ));
        assert_eq!(store.associations, before.associations);
        assert_eq!(store.emission(10), 50.0);
    }

    #[tokio::test]
    async fn test_update_replaces_serving_qty() {
        let mut store = FakeStore::with_bakery();
        add_ingredient(&mut store, 10, "Flour", 100.0).await.unwrap();
        add_ingredient(&mut store, 10, "Sugar", 50.0).await.unwrap();

        let updated = update_ingredient(&mut store, 10, "Sugar", 100.0).await.unwrap();
        assert_eq!(updated.serving_qty, 100.0);
        assert_eq!(store.emission(10), 70.0);
        assert_eq!(store.rating(1), Some(70.0));
        assert_eq!(store.associations.len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_pair_is_not_found() {
        let mut store = FakeStore::with_bakery();
        add_ingredient(&mut store, 10, "Flour", 100.0).await.unwrap();

        let err = update_ingredient(&mut store, 10, "Milk", 10.0).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::NotFound(EntityKind::ProductIngredient)
        ));
        assert_eq!(store.emission(10), 50.0);
        assert_eq!(store.associations.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_missing_pair_is_not_found() {
        let mut store = FakeStore::with_bakery();
        let err = remove_ingredient(&mut store, 10, "Flour").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::NotFound(EntityKind::ProductIngredient)
        ));
    }

    #[tokio::test]
    async fn test_lookups_report_missing_entities() {
        let mut store = FakeStore::with_bakery();

        let err = add_ingredient(&mut store, 99, "Flour", 1.0).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(EntityKind::Product)));

        let err = add_ingredient(&mut store, 10, "Saffron", 1.0).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(EntityKind::Ingredient)));
    }

    #[tokio::test]
    async fn test_invalid_serving_qty_rejected() {
        let mut store = FakeStore::with_bakery();
        for qty in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = add_ingredient(&mut store, 10, "Flour", qty).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert!(store.associations.is_empty());
    }
}
