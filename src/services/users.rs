//! User Service
//! Registration, credential checks and admin bootstrap

use super::{ServiceError, ServiceResult};
use crate::auth::{PasswordHasher, UserDirectory};
use crate::models::{ItemLine, NewUser, User};
use crate::store::{Store, StoreError};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct UserService {
    store: Arc<Store>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(store: Arc<Store>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Hash on the blocking pool
    async fn hash_password(&self, password: String) -> ServiceResult<String> {
        let hasher = self.hasher.clone();
        let hashed = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;
        Ok(hashed)
    }

    pub async fn create_user(&self, new_user: NewUser) -> ServiceResult<User> {
        let password_hash = self.hash_password(new_user.password).await?;
        let user = self
            .store
            .create_user(new_user.login, password_hash, new_user.is_admin)
            .await?;
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> ServiceResult<User> {
        Ok(self.store.get_user(id).await?)
    }

    pub async fn delete_user(&self, id: i64) -> ServiceResult<bool> {
        Ok(self.store.delete_user(id).await?)
    }

    pub async fn cart(&self, user_id: i64) -> ServiceResult<Vec<ItemLine>> {
        Ok(self.store.user_cart(user_id).await?)
    }

    /// Check a login/password pair.
    ///
    /// Unknown login and wrong password fail identically and cost the same.
    pub async fn authenticate(&self, login: &str, password: &str) -> ServiceResult<User> {
        let user = self.store.find_user_by_login(login).await?;

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let stored = user.as_ref().map(|u| u.password_hash.clone());
        let valid =
            tokio::task::spawn_blocking(move || hasher.verify(&password, stored.as_deref()))
                .await??;

        match user {
            Some(user) if valid => {
                debug!(user_id = user.id, "credentials accepted");
                Ok(user)
            }
            _ => Err(ServiceError::InvalidCredentials),
        }
    }

    /// Make sure an admin account named `login` exists
    pub async fn ensure_admin(&self, login: &str, password: &str) -> ServiceResult<User> {
        if let Some(existing) = self.store.find_user_by_login(login).await? {
            if !existing.is_admin {
                warn!("⚠️  Bootstrap login '{}' exists without admin rights", login);
            }
            return Ok(existing);
        }

        let admin = self
            .create_user(NewUser {
                login: login.to_string(),
                password: password.to_string(),
                is_admin: true,
            })
            .await?;
        info!("🔐 Created bootstrap admin: {}", admin.login);
        Ok(admin)
    }
}

#[async_trait]
impl UserDirectory for UserService {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        self.store.find_user_by_login(login).await
    }
}
