//! In-memory storage used by tests in the workspace

use crate::entities::{AppEntity, UserEntity};
use crate::error::AuthDataError;
use crate::repositories::{AppProvider, UserProvider, UserSaver};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: HashMap<i64, UserEntity>,
    apps: HashMap<i32, AppEntity>,
    last_user_id: i64,
}

/// Implements every storage contract over hash maps. Ids start at 1.
#[derive(Default)]
pub struct InMemoryStorage {
    tables: RwLock<Tables>,
    offline: AtomicBool,
    delay_ms: AtomicU64,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_app(&self, app: AppEntity) {
        self.tables.write().await.apps.insert(app.id, app);
    }

    pub async fn set_admin(&self, user_id: i64, is_admin: bool) -> Result<(), AuthDataError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or(AuthDataError::UserNotFound)?;
        user.is_admin = is_admin;
        Ok(())
    }

    /// While offline every operation fails with an infrastructure error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Every operation sleeps for `delay` before touching the tables.
    pub fn set_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.delay_ms.store(millis, Ordering::SeqCst);
    }

    async fn enter(&self) -> Result<(), AuthDataError> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.offline.load(Ordering::SeqCst) {
            return Err(AuthDataError::InternalError("storage offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserSaver for InMemoryStorage {
    async fn save_user(&self, email: &str, pass_hash: &[u8]) -> Result<i64, AuthDataError> {
        self.enter().await?;
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == email) {
            return Err(AuthDataError::UserExists);
        }

        tables.last_user_id += 1;
        let id = tables.last_user_id;
        tables.users.insert(id, UserEntity::new(id, email, pass_hash));
        Ok(id)
    }
}

#[async_trait]
impl UserProvider for InMemoryStorage {
    async fn find_by_email(&self, email: &str) -> Result<UserEntity, AuthDataError> {
        self.enter().await?;
        self.tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(AuthDataError::UserNotFound)
    }

    async fn is_admin(&self, user_id: i64) -> Result<bool, AuthDataError> {
        self.enter().await?;
        self.tables
            .read()
            .await
            .users
            .get(&user_id)
            .map(|u| u.is_admin)
            .ok_or(AuthDataError::UserNotFound)
    }
}

#[async_trait]
impl AppProvider for InMemoryStorage {
    async fn find_app_by_id(&self, app_id: i32) -> Result<AppEntity, AuthDataError> {
        self.enter().await?;
        self.tables
            .read()
            .await
            .apps
            .get(&app_id)
            .cloned()
            .ok_or(AuthDataError::AppNotFound)
    }
}
