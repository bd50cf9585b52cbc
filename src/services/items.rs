use super::ServiceResult;
use crate::filter::ItemFilter;
use crate::models::{Item, NewItem};
use crate::store::Store;
use std::sync::Arc;

pub struct ItemService {
    store: Arc<Store>,
}

impl ItemService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, item: NewItem) -> ServiceResult<Item> {
        Ok(self.store.create_item(item).await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Item> {
        Ok(self.store.get_item(id).await?)
    }

    pub async fn list(&self, filter: &ItemFilter) -> ServiceResult<Vec<Item>> {
        Ok(self.store.list_items(filter).await?)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<bool> {
        Ok(self.store.delete_item(id).await?)
    }
}
