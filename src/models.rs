//! Storefront domain models
//! Users, catalog entries, and orders as they cross the HTTP boundary

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status seeded for freshly placed orders
pub const STATUS_IN_PROGRESS: i64 = 1;
/// Status seeded for orders ready for pickup
pub const STATUS_READY: i64 = 2;

/// Registered account
#[derive(Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub is_admin: bool,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("login", &self.login)
            .field("is_admin", &self.is_admin)
            .finish_non_exhaustive()
    }
}

/// Registration request body
#[derive(Deserialize)]
pub struct NewUser {
    pub login: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), String> {
        if self.login.trim().is_empty() {
            return Err("login must not be empty".to_string());
        }
        if self.password.is_empty() {
            return Err("password must not be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("login", &self.login)
            .field("is_admin", &self.is_admin)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct NewCategory {
    pub title: String,
}

impl NewCategory {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("category title must not be empty".to_string());
        }
        Ok(())
    }
}

/// Catalog item joined with its category title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub category_id: Option<i64>,
    pub category_title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
}

impl NewItem {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("item title must not be empty".to_string());
        }
        if self.price < 0 {
            return Err("item price must not be negative".to_string());
        }
        Ok(())
    }
}

/// An item together with a quantity (order lines, cart lines)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLine {
    pub item: Item,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub status_id: i64,
    pub status_title: String,
    pub user_id: i64,
    pub items: Vec<ItemLine>,
}

/// Requested order line: item reference plus quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LineItem {
    pub item_id: i64,
    pub amount: i64,
}

/// Body for both order creation and full replacement
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    #[serde(default = "default_status")]
    pub status_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

fn default_status() -> i64 {
    STATUS_IN_PROGRESS
}

impl NewOrder {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(line) = self.items.iter().find(|line| line.amount <= 0) {
            return Err(format!(
                "amount for item {} must be positive, got {}",
                line.item_id, line.amount
            ));
        }
        Ok(())
    }
}
