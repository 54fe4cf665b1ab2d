//! Shared fixtures for integration tests
#![allow(dead_code)]

use green_server::{DbService, ServerState, LocalFileStore, Config};
use shared::models::{
    Customer, CustomerCreate, IngredientCreate, Merchant, MerchantCreate, Product, ProductCreate,
};
use std::sync::Arc;

/// Services over a fresh in-memory database
pub async fn state() -> ServerState {
    let db = DbService::open_in_memory().await.unwrap();
    let files = Arc::new(LocalFileStore::new(
        std::env::temp_dir().join("green-server-tests"),
        "http://localhost:3000/uploads",
    ));
    ServerState::new(Config::with_work_dir("./target/test-data"), db, files)
}

pub async fn merchant(state: &ServerState, username: &str) -> Merchant {
    state
        .accounts
        .create_merchant(MerchantCreate {
            username: username.into(),
            email: format!("{username}@example.com"),
            company: format!("{username} Ltd"),
            logo_url: None,
        })
        .await
        .unwrap()
}

pub async fn customer(state: &ServerState, username: &str) -> Customer {
    state
        .accounts
        .create_customer(CustomerCreate {
            username: username.into(),
            email: format!("{username}@example.com"),
            first_name: Some("Test".into()),
            last_name: None,
        })
        .await
        .unwrap()
}

pub async fn category(state: &ServerState, name: &str) -> i64 {
    state.catalog.create_category(name).await.unwrap().id
}

pub async fn product(
    state: &ServerState,
    merchant: &str,
    category_id: i64,
    name: &str,
    price: f64,
) -> Product {
    state
        .catalog
        .create_product(
            merchant,
            ProductCreate {
                name: name.into(),
                price,
                description: format!("{name} description"),
                image_url: None,
                flavour_type: None,
                category_id,
            },
        )
        .await
        .unwrap()
}

/// Flour 0.5/g, Sugar 0.2/g, Milk 0.1/g
pub async fn baking_ingredients(state: &ServerState) {
    for (name, per_gram) in [("Flour", 0.5), ("Sugar", 0.2), ("Milk", 0.1)] {
        state
            .catalog
            .create_ingredient(IngredientCreate {
                name: name.into(),
                emission_per_gram: per_gram,
            })
            .await
            .unwrap();
    }
}
