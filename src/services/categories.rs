use super::ServiceResult;
use crate::models::{Category, NewCategory};
use crate::store::Store;
use std::sync::Arc;

pub struct CategoryService {
    store: Arc<Store>,
}

impl CategoryService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, category: NewCategory) -> ServiceResult<Category> {
        Ok(self.store.create_category(category.title).await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Category> {
        Ok(self.store.get_category(id).await?)
    }

    pub async fn list(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.store.list_categories().await?)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<bool> {
        Ok(self.store.delete_category(id).await?)
    }
}
