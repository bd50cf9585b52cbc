use super::ServiceResult;
use crate::models::{NewOrder, Order};
use crate::store::Store;
use std::sync::Arc;

pub struct OrderService {
    store: Arc<Store>,
}

impl OrderService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, order: NewOrder) -> ServiceResult<Order> {
        Ok(self.store.create_order(order).await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Order> {
        Ok(self.store.get_order(id).await?)
    }

    pub async fn list(&self) -> ServiceResult<Vec<Order>> {
        Ok(self.store.list_orders().await?)
    }

    pub async fn list_by_user(&self, user_id: i64) -> ServiceResult<Vec<Order>> {
        Ok(self.store.list_orders_by_user(user_id).await?)
    }

    /// Replace header and lines of an existing order
    pub async fn update(&self, id: i64, order: NewOrder) -> ServiceResult<Order> {
        Ok(self.store.update_order(id, order).await?)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<bool> {
        Ok(self.store.delete_order(id).await?)
    }
}
