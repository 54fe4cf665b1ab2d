//! Order Service
//!
//! A customer has at most one open (`PENDING`) order per merchant. Adding a
//! product appends to that order or opens a new one; the stored total is
//! recomputed inside the same transaction as every line change.

use shared::models::{Order, OrderDetail, OrderItemInput, OrderUpdate};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use super::money::{MAX_QUANTITY, compute_order_total, validate_quantity};
use crate::db::repository::{customer, order, product};
use crate::utils::decimal::money_to_f64;
use crate::utils::{AppError, AppResult, EntityKind};

/// Recompute and store an order's total from its current lines
pub async fn refresh_total(conn: &mut SqliteConnection, order_id: i64) -> AppResult<f64> {
    let items = order::find_items(&mut *conn, order_id).await?;
    let total = money_to_f64(compute_order_total(&items));
    order::update_total(&mut *conn, order_id, total).await?;
    Ok(total)
}

async fn load_detail(conn: &mut SqliteConnection, order_id: i64) -> AppResult<OrderDetail> {
    let order = order::require(&mut *conn, order_id).await?;
    let items = order::find_items(&mut *conn, order_id).await?;
    Ok(OrderDetail { order, items })
}

#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
}

impl OrderService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a product to the customer's open order with the product's merchant
    pub async fn add_order(
        &self,
        customer_username: &str,
        input: OrderItemInput,
    ) -> AppResult<OrderDetail> {
        validate_quantity(input.quantity)?;

        let mut tx = self.pool.begin().await?;

        // 1. Resolve customer and product
        let customer = customer::require_by_username(&mut *tx, customer_username).await?;
        let product = product::require(&mut *tx, input.product_id).await?;

        // 2. Open order for this merchant, or a new one
        let order = match order::find_open(&mut *tx, customer.id, product.merchant_id).await? {
            Some(order) => order,
            None => {
                let order = order::create(&mut *tx, customer.id, product.merchant_id).await?;
                info!(
                    order_id = order.id,
                    customer = %customer.username,
                    merchant_id = product.merchant_id,
                    "Opened order"
                );
                order
            }
        };

        // 3. Merge into an existing line or append
        match order::find_item(&mut *tx, order.id, product.id).await? {
            Some(item) => {
                let quantity = item
                    .quantity
                    .checked_add(input.quantity)
                    .filter(|q| *q <= MAX_QUANTITY)
                    .ok_or_else(|| {
                        AppError::validation(format!(
                            "quantity exceeds maximum allowed ({MAX_QUANTITY})"
                        ))
                    })?;
                order::update_item_quantity(&mut *tx, item.id, quantity).await?;
            }
            None => {
                order::insert_item(&mut *tx, order.id, &product, input.quantity).await?;
            }
        }

        // 4. Derived total
        let total = refresh_total(&mut tx, order.id).await?;
        let detail = load_detail(&mut tx, order.id).await?;
        tx.commit().await?;

        info!(
            order_id = order.id,
            product_id = product.id,
            quantity = input.quantity,
            total,
            "Added product to order"
        );
        Ok(detail)
    }

    /// Change the order status; completed and cancelled orders are final
    pub async fn update_order(&self, order_id: i64, data: OrderUpdate) -> AppResult<Order> {
        let mut tx = self.pool.begin().await?;
        let existing = order::require(&mut *tx, order_id).await?;

        if existing.status == data.status {
            return Ok(existing);
        }
        if existing.status.is_terminal() {
            warn!(
                order_id,
                from = ?existing.status,
                to = ?data.status,
                "Rejected status change of a closed order"
            );
            return Err(AppError::invalid_state(format!(
                "order {order_id} is {:?} and cannot change status",
                existing.status
            )));
        }

        order::update_status(&mut *tx, order_id, data.status).await?;
        let updated = order::require(&mut *tx, order_id).await?;
        tx.commit().await?;

        info!(order_id, from = ?existing.status, to = ?data.status, "Order status changed");
        Ok(updated)
    }

    pub async fn delete_order(&self, order_id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        order::delete(&mut *tx, order_id).await?;
        tx.commit().await?;

        info!(order_id, "Order deleted");
        Ok(())
    }

    /// Remove one product line and recompute the total
    pub async fn delete_order_item(&self, order_id: i64, product_id: i64) -> AppResult<OrderDetail> {
        let mut tx = self.pool.begin().await?;
        let existing = order::require(&mut *tx, order_id).await?;
        if existing.status.is_terminal() {
            return Err(AppError::invalid_state(format!(
                "order {order_id} is {:?} and cannot be modified",
                existing.status
            )));
        }

        let item = order::find_item(&mut *tx, order_id, product_id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::OrderItem))?;
        order::delete_item(&mut *tx, order_id, item.id).await?;

        let total = refresh_total(&mut tx, order_id).await?;
        let detail = load_detail(&mut tx, order_id).await?;
        tx.commit().await?;

        info!(order_id, product_id, total, "Removed product from order");
        Ok(detail)
    }

    pub async fn get_all_orders(&self) -> AppResult<Vec<Order>> {
        Ok(order::find_all(&self.pool).await?)
    }

    pub async fn get_orders_by_customer(&self, customer_username: &str) -> AppResult<Vec<Order>> {
        let customer = customer::require_by_username(&self.pool, customer_username).await?;
        Ok(order::find_by_customer(&self.pool, customer.id).await?)
    }

    pub async fn get_order(&self, order_id: i64) -> AppResult<OrderDetail> {
        let mut conn = self.pool.acquire().await?;
        load_detail(&mut conn, order_id).await
    }

    /// Orders still open, i.e. `PENDING`
    pub async fn get_open_orders(&self, customer_username: &str) -> AppResult<Vec<Order>> {
        let orders = self.get_orders_by_customer(customer_username).await?;
        Ok(orders
            .into_iter()
            .filter(|o| o.status.is_open())
            .collect())
    }
}
