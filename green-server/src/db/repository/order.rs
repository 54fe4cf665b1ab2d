//! Order Repository
//!
//! Orders live in `customer_order`; lines in `order_item` carry the product
//! name and unit price they were added with.

use super::{RepoError, RepoResult};
use crate::utils::EntityKind;
use shared::models::{Order, OrderItem, OrderStatus, Product};
use shared::util::now_millis;
use sqlx::SqliteExecutor;

const SELECT_ORDER: &str = "SELECT id, customer_id, merchant_id, status, total_price, created_at, \
                            updated_at FROM customer_order";

const SELECT_ITEM: &str =
    "SELECT id, order_id, product_id, product_name, unit_price, quantity FROM order_item";

// ========== Orders ==========

pub async fn find_all(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<Order>> {
    let sql = format!("{SELECT_ORDER} ORDER BY id");
    let orders = sqlx::query_as::<_, Order>(&sql).fetch_all(exec).await?;
    Ok(orders)
}

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{SELECT_ORDER} WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(order)
}

/// Find order by id, returning `NotFound(Order)` otherwise
pub async fn require(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Order> {
    find_by_id(exec, id)
        .await?
        .ok_or(RepoError::NotFound(EntityKind::Order))
}

pub async fn find_by_customer(
    exec: impl SqliteExecutor<'_>,
    customer_id: i64,
) -> RepoResult<Vec<Order>> {
    let sql = format!("{SELECT_ORDER} WHERE customer_id = ? ORDER BY id");
    let orders = sqlx::query_as::<_, Order>(&sql)
        .bind(customer_id)
        .fetch_all(exec)
        .await?;
    Ok(orders)
}

/// The customer's open (pending) order with this merchant, if any
pub async fn find_open(
    exec: impl SqliteExecutor<'_>,
    customer_id: i64,
    merchant_id: i64,
) -> RepoResult<Option<Order>> {
    let sql = format!(
        "{SELECT_ORDER} WHERE customer_id = ? AND merchant_id = ? AND status = ? \
         ORDER BY id DESC LIMIT 1"
    );
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(customer_id)
        .bind(merchant_id)
        .bind(OrderStatus::Pending)
        .fetch_optional(exec)
        .await?;
    Ok(order)
}

/// Ids of open (pending) orders with a line for the product
pub async fn find_open_ids_containing_product(
    exec: impl SqliteExecutor<'_>,
    product_id: i64,
) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT DISTINCT o.id FROM customer_order o \
         JOIN order_item oi ON oi.order_id = o.id \
         WHERE oi.product_id = ? AND o.status = ? \
         ORDER BY o.id",
    )
    .bind(product_id)
    .bind(OrderStatus::Pending)
    .fetch_all(exec)
    .await?;
    Ok(ids)
}

pub async fn create(
    exec: impl SqliteExecutor<'_>,
    customer_id: i64,
    merchant_id: i64,
) -> RepoResult<Order> {
    let now = now_millis();
    let sql = "INSERT INTO customer_order (customer_id, merchant_id, status, total_price, created_at, updated_at) \
               VALUES (?, ?, ?, 0, ?, ?) \
               RETURNING id, customer_id, merchant_id, status, total_price, created_at, updated_at";
    let order = sqlx::query_as::<_, Order>(sql)
        .bind(customer_id)
        .bind(merchant_id)
        .bind(OrderStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_one(exec)
        .await?;
    Ok(order)
}

pub async fn update_status(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    status: OrderStatus,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE customer_order SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now_millis())
        .bind(id)
        .execute(exec)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(RepoError::NotFound(EntityKind::Order));
    }
    Ok(())
}

pub async fn update_total(exec: impl SqliteExecutor<'_>, id: i64, total: f64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE customer_order SET total_price = ?, updated_at = ? WHERE id = ?")
        .bind(total)
        .bind(now_millis())
        .bind(id)
        .execute(exec)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(RepoError::NotFound(EntityKind::Order));
    }
    Ok(())
}

/// Delete an order; its lines cascade
pub async fn delete(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM customer_order WHERE id = ?")
        .bind(id)
        .execute(exec)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(RepoError::NotFound(EntityKind::Order));
    }
    Ok(())
}

// ========== Order Items ==========

pub async fn find_items(exec: impl SqliteExecutor<'_>, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("{SELECT_ITEM} WHERE order_id = ? ORDER BY id");
    let items = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .fetch_all(exec)
        .await?;
    Ok(items)
}

pub async fn find_item(
    exec: impl SqliteExecutor<'_>,
    order_id: i64,
    product_id: i64,
) -> RepoResult<Option<OrderItem>> {
    let sql = format!("{SELECT_ITEM} WHERE order_id = ? AND product_id = ?");
    let item = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .bind(product_id)
        .fetch_optional(exec)
        .await?;
    Ok(item)
}

/// Append a line priced at the product's current price
pub async fn insert_item(
    exec: impl SqliteExecutor<'_>,
    order_id: i64,
    product: &Product,
    quantity: i32,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_item (order_id, product_id, product_name, unit_price, quantity) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(order_id)
    .bind(product.id)
    .bind(&product.name)
    .bind(product.price)
    .bind(quantity)
    .execute(exec)
    .await?;
    Ok(())
}

/// Copy the product's current name and price onto its lines in pending orders
pub async fn sync_open_items(exec: impl SqliteExecutor<'_>, product: &Product) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE order_item SET product_name = ?, unit_price = ? \
         WHERE product_id = ? \
           AND order_id IN (SELECT id FROM customer_order WHERE status = ?)",
    )
    .bind(&product.name)
    .bind(product.price)
    .bind(product.id)
    .bind(OrderStatus::Pending)
    .execute(exec)
    .await?
    .rows_affected();
    Ok(rows)
}

/// Drop the product's lines from pending orders; other orders keep theirs
pub async fn delete_open_items_of_product(
    exec: impl SqliteExecutor<'_>,
    product_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "DELETE FROM order_item \
         WHERE product_id = ? \
           AND order_id IN (SELECT id FROM customer_order WHERE status = ?)",
    )
    .bind(product_id)
    .bind(OrderStatus::Pending)
    .execute(exec)
    .await?
    .rows_affected();
    Ok(rows)
}

pub async fn update_item_quantity(
    exec: impl SqliteExecutor<'_>,
    item_id: i64,
    quantity: i32,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE order_item SET quantity = ? WHERE id = ?")
        .bind(quantity)
        .bind(item_id)
        .execute(exec)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(RepoError::NotFound(EntityKind::OrderItem));
    }
    Ok(())
}

pub async fn delete_item(
    exec: impl SqliteExecutor<'_>,
    order_id: i64,
    item_id: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM order_item WHERE id = ? AND order_id = ?")
        .bind(item_id)
        .bind(order_id)
        .execute(exec)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(RepoError::NotFound(EntityKind::OrderItem));
    }
    Ok(())
}
