use super::{Store, StoreError};
use crate::models::Category;
use rusqlite::{params, OptionalExtension};
use tracing::info;

impl Store {
    pub async fn create_category(&self, title: String) -> Result<Category, StoreError> {
        self.run("create_category", move |conn| {
            conn.execute("INSERT INTO categories (title) VALUES (?1)", params![title])?;
            let category = Category {
                id: conn.last_insert_rowid(),
                title,
            };
            info!("🏷️  Created category '{}' with id {}", category.title, category.id);
            Ok(category)
        })
        .await
    }

    pub async fn get_category(&self, id: i64) -> Result<Category, StoreError> {
        self.run("get_category", move |conn| {
            conn.query_row(
                "SELECT id, title FROM categories WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        title: row.get(1)?,
                    })
                },
            )
            .optional()?
            .ok_or(StoreError::NotFound {
                entity: "category",
                id,
            })
        })
        .await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.run("list_categories", |conn| {
            let mut stmt = conn.prepare("SELECT id, title FROM categories ORDER BY id")?;
            let categories = stmt
                .query_map([], |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        title: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(categories)
        })
        .await
    }

    /// Items in the deleted category become uncategorized
    pub async fn delete_category(&self, id: i64) -> Result<bool, StoreError> {
        self.run("delete_category", move |conn| {
            let removed = conn.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
            if removed > 0 {
                info!("🗑️  Deleted category: {}", id);
            }
            Ok(removed > 0)
        })
        .await
    }
}
