//! User accounts and their carts

use super::items::{item_from_row, ITEM_COLUMNS};
use super::{Store, StoreError};
use crate::models::{ItemLine, User};
use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        login: row.get(1)?,
        password_hash: row.get(2)?,
        is_admin: row.get(3)?,
    })
}

impl Store {
    /// Insert a user whose password has already been hashed
    pub async fn create_user(
        &self,
        login: String,
        password_hash: String,
        is_admin: bool,
    ) -> Result<User, StoreError> {
        self.run("create_user", move |conn| {
            conn.execute(
                "INSERT INTO users (login, password_hash, is_admin) VALUES (?1, ?2, ?3)",
                params![login, password_hash, is_admin],
            )?;

            let user = User {
                id: conn.last_insert_rowid(),
                login,
                password_hash,
                is_admin,
            };
            info!("✅ Created user: {} (id {}, admin: {})", user.login, user.id, user.is_admin);
            Ok(user)
        })
        .await
    }

    pub async fn get_user(&self, id: i64) -> Result<User, StoreError> {
        self.run("get_user", move |conn| {
            conn.query_row(
                "SELECT id, login, password_hash, is_admin FROM users WHERE id = ?1",
                params![id],
                user_from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound { entity: "user", id })
        })
        .await
    }

    pub async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        let login = login.to_string();
        self.run("find_user_by_login", move |conn| {
            let user = conn
                .query_row(
                    "SELECT id, login, password_hash, is_admin FROM users WHERE login = ?1",
                    params![login],
                    user_from_row,
                )
                .optional()?;
            Ok(user)
        })
        .await
    }

    /// Delete a user; their cart lines, orders and order lines go with them.
    /// Returns whether a row was removed.
    pub async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        self.run("delete_user", move |conn| {
            let removed = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
            if removed > 0 {
                info!("🗑️  Deleted user: {}", id);
            }
            Ok(removed > 0)
        })
        .await
    }

    /// Cart contents of a user; lines pointing at deleted items are skipped
    pub async fn user_cart(&self, user_id: i64) -> Result<Vec<ItemLine>, StoreError> {
        self.run("user_cart", move |conn| {
            let sql = format!(
                "{ITEM_COLUMNS}, cart_items.amount
                 FROM cart_items
                 JOIN items ON items.id = cart_items.item
                 LEFT JOIN categories ON items.category = categories.id
                 WHERE cart_items.user_id = ?1
                 ORDER BY cart_items.id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let lines = stmt
                .query_map(params![user_id], |row| {
                    Ok(ItemLine {
                        item: item_from_row(row)?,
                        amount: row.get(6)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(lines)
        })
        .await
    }
}
