//! In-memory [`UserStore`] used by the unit and router tests.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::password::HashedPassword;
use super::repo::{StoreError, UserStore};
use super::repo_types::{NewUser, User};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored row, including soft-deleted ones.
    pub async fn raw(&self, id: Uuid) -> Option<User> {
        self.users.lock().await.iter().find(|u| u.id == id).cloned()
    }

    pub async fn live_count(&self) -> usize {
        self.users
            .lock()
            .await
            .iter()
            .filter(|u| u.deleted_at.is_none())
            .count()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().await;
        Ok(users
            .iter()
            .find(|u| u.deleted_at.is_none() && u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().await;
        Ok(users
            .iter()
            .find(|u| u.deleted_at.is_none() && u.id == id)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        // check and insert under one lock, like the partial unique index
        let mut users = self.users.lock().await;
        if users
            .iter()
            .any(|u| u.deleted_at.is_none() && u.email == user.email)
        {
            return Err(StoreError::Conflict);
        }
        let now = OffsetDateTime::now_utc();
        let record = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash.as_str().to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn update_password_hash(
        &self,
        id: Uuid,
        password_hash: &HashedPassword,
    ) -> Result<(), StoreError> {
        let mut users = self.users.lock().await;
        let user = users
            .iter_mut()
            .find(|u| u.deleted_at.is_none() && u.id == id)
            .ok_or(StoreError::NotFound)?;
        user.password_hash = password_hash.as_str().to_string();
        user.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut users = self.users.lock().await;
        let user = users
            .iter_mut()
            .find(|u| u.deleted_at.is_none() && u.id == id)
            .ok_or(StoreError::NotFound)?;
        let now = OffsetDateTime::now_utc();
        user.deleted_at = Some(now);
        user.updated_at = now;
        Ok(())
    }
}
