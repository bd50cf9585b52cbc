//! Orders and their line items

use super::items::{item_from_row, ITEM_COLUMNS};
use super::{Store, StoreError};
use crate::models::{ItemLine, LineItem, NewOrder, Order};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tracing::{debug, info};

/// Header columns; every header query joins `statuses`
const ORDER_SELECT: &str = "SELECT orders.id, orders.status, statuses.title, orders.user_id
     FROM orders JOIN statuses ON statuses.id = orders.status";

struct OrderHeader {
    id: i64,
    status_id: i64,
    status_title: String,
    user_id: i64,
}

fn header_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderHeader> {
    Ok(OrderHeader {
        id: row.get(0)?,
        status_id: row.get(1)?,
        status_title: row.get(2)?,
        user_id: row.get(3)?,
    })
}

/// Lines of an order; lines whose item has since been deleted are dropped
fn load_lines(conn: &Connection, order_id: i64) -> Result<Vec<ItemLine>, StoreError> {
    let sql = format!(
        "{ITEM_COLUMNS}, order_items.amount
         FROM order_items
         JOIN items ON items.id = order_items.item
         LEFT JOIN categories ON items.category = categories.id
         WHERE order_items.order_id = ?1
         ORDER BY order_items.id"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let lines = stmt
        .query_map(params![order_id], |row| {
            Ok(ItemLine {
                item: item_from_row(row)?,
                amount: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines)
}

fn assemble(conn: &Connection, header: OrderHeader) -> Result<Order, StoreError> {
    let items = load_lines(conn, header.id)?;
    Ok(Order {
        id: header.id,
        status_id: header.status_id,
        status_title: header.status_title,
        user_id: header.user_id,
        items,
    })
}

fn load_order(conn: &Connection, id: i64) -> Result<Order, StoreError> {
    let header = conn
        .query_row(
            &format!("{ORDER_SELECT} WHERE orders.id = ?1"),
            params![id],
            header_from_row,
        )
        .optional()?
        .ok_or(StoreError::NotFound { entity: "order", id })?;
    assemble(conn, header)
}

fn load_orders(
    conn: &Connection,
    filter: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Order>, StoreError> {
    let sql = format!("{ORDER_SELECT}{filter} ORDER BY orders.id");
    let mut stmt = conn.prepare(&sql)?;
    let headers = stmt
        .query_map(args, header_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    headers
        .into_iter()
        .map(|header| assemble(conn, header))
        .collect()
}

/// Delete-then-insert of the full line set, inside the caller's transaction
fn replace_lines(tx: &Transaction<'_>, order_id: i64, lines: &[LineItem]) -> Result<(), StoreError> {
    tx.execute("DELETE FROM order_items WHERE order_id = ?1", params![order_id])?;

    let mut exists = tx.prepare_cached("SELECT 1 FROM items WHERE id = ?1")?;
    let mut insert =
        tx.prepare_cached("INSERT INTO order_items (order_id, item, amount) VALUES (?1, ?2, ?3)")?;
    for line in lines {
        if !exists.exists(params![line.item_id])? {
            return Err(StoreError::InvalidReference(format!(
                "item {} does not exist",
                line.item_id
            )));
        }
        insert.execute(params![order_id, line.item_id, line.amount])?;
    }
    debug!(order_id, lines = lines.len(), "order lines replaced");
    Ok(())
}

impl Store {
    /// Insert the header and its lines atomically; an unknown item, user or
    /// status rolls the whole order back.
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        self.run_in_transaction("create_order", move |tx| {
            tx.execute(
                "INSERT INTO orders (status, user_id) VALUES (?1, ?2)",
                params![order.status_id, order.user_id],
            )?;
            let id = tx.last_insert_rowid();
            replace_lines(tx, id, &order.items)?;

            info!("🛒 Created order {} for user {} ({} lines)", id, order.user_id, order.items.len());
            load_order(tx, id)
        })
        .await
    }

    pub async fn get_order(&self, id: i64) -> Result<Order, StoreError> {
        self.run_in_transaction("get_order", move |tx| load_order(tx, id)).await
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.run_in_transaction("list_orders", |tx| load_orders(tx, "", params![]))
            .await
    }

    pub async fn list_orders_by_user(&self, user_id: i64) -> Result<Vec<Order>, StoreError> {
        self.run_in_transaction("list_orders_by_user", move |tx| {
            load_orders(tx, " WHERE orders.user_id = ?1", params![user_id])
        })
        .await
    }

    /// Rewrite the header and replace every line, atomically
    pub async fn update_order(&self, id: i64, order: NewOrder) -> Result<Order, StoreError> {
        self.run_in_transaction("update_order", move |tx| {
            let updated = tx.execute(
                "UPDATE orders SET status = ?1, user_id = ?2 WHERE id = ?3",
                params![order.status_id, order.user_id, id],
            )?;
            if updated == 0 {
                return Err(StoreError::NotFound { entity: "order", id });
            }
            replace_lines(tx, id, &order.items)?;

            info!("🛒 Updated order {} ({} lines)", id, order.items.len());
            load_order(tx, id)
        })
        .await
    }

    pub async fn delete_order(&self, id: i64) -> Result<bool, StoreError> {
        self.run("delete_order", move |conn| {
            let removed = conn.execute("DELETE FROM orders WHERE id = ?1", params![id])?;
            if removed > 0 {
                info!("🗑️  Deleted order: {}", id);
            }
            Ok(removed > 0)
        })
        .await
    }
}
