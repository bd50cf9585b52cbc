//! Catalog items

use super::{Store, StoreError};
use crate::filter::ItemFilter;
use crate::models::{Item, NewItem};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::{debug, info};

/// Item projection shared by every query that returns items; callers supply
/// the `FROM` clause and must join `categories` (LEFT JOIN keeps
/// uncategorized items).
pub(super) const ITEM_COLUMNS: &str = "SELECT items.id, items.title, items.description, \
     items.price, items.category, categories.title";

const ITEM_SELECT: &str = "FROM items LEFT JOIN categories ON items.category = categories.id";

pub(super) fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category_id: row.get(4)?,
        category_title: row.get(5)?,
    })
}

pub(super) fn load_item(conn: &Connection, id: i64) -> Result<Item, StoreError> {
    let sql = format!("{ITEM_COLUMNS} {ITEM_SELECT} WHERE items.id = ?1");
    conn.query_row(&sql, params![id], item_from_row)
        .optional()?
        .ok_or(StoreError::NotFound { entity: "item", id })
}

impl Store {
    pub async fn create_item(&self, item: NewItem) -> Result<Item, StoreError> {
        self.run("create_item", move |conn| {
            conn.execute(
                "INSERT INTO items (title, description, price, category) VALUES (?1, ?2, ?3, ?4)",
                params![item.title, item.description, item.price, item.category_id],
            )?;
            let created = load_item(conn, conn.last_insert_rowid())?;
            info!("📦 Created item '{}' with id {}", created.title, created.id);
            Ok(created)
        })
        .await
    }

    pub async fn get_item(&self, id: i64) -> Result<Item, StoreError> {
        self.run("get_item", move |conn| load_item(conn, id)).await
    }

    /// List items matching `filter`, in insertion order
    pub async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, StoreError> {
        let compiled = filter.compile();
        self.run("list_items", move |conn| {
            let sql = format!(
                "{ITEM_COLUMNS} {ITEM_SELECT}{} ORDER BY items.id",
                compiled.where_sql()
            );
            debug!(clause = %compiled.clause, args = compiled.args.len(), "listing items");

            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map(params_from_iter(compiled.args.iter()), item_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(items)
        })
        .await
    }

    /// Hard delete; order and cart lines that referenced the item are left in
    /// place and disappear from read views. Returns whether a row was removed.
    pub async fn delete_item(&self, id: i64) -> Result<bool, StoreError> {
        self.run("delete_item", move |conn| {
            let removed = conn.execute("DELETE FROM items WHERE id = ?1", params![id])?;
            if removed > 0 {
                info!("🗑️  Deleted item: {}", id);
            }
            Ok(removed > 0)
        })
        .await
    }
}
