use crate::domain::user::User;
use crate::domain::value_objects::{BookId, LoanId, UserId};
use crate::ports::user_store::{Result, UserStore as UserStoreTrait};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::{load_records, save_records};

/// UserStoreのフラットファイル実装（users.json）
pub struct JsonFileUserStore {
    path: PathBuf,
    io_lock: Mutex<()>,
}

impl JsonFileUserStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join("users.json"),
            io_lock: Mutex::new(()),
        }
    }

    async fn update_user<F>(&self, user_id: &UserId, apply: F) -> Result<()>
    where
        F: FnOnce(&mut User),
    {
        let _guard = self.io_lock.lock().await;
        let mut users: Vec<User> = load_records(&self.path).await?;
        if let Some(user) = users.iter_mut().find(|u| &u.id == user_id) {
            apply(user);
            save_records(&self.path, &users).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl UserStoreTrait for JsonFileUserStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<User>> {
        let _guard = self.io_lock.lock().await;
        let users: Vec<User> = load_records(&self.path).await?;
        Ok(users.into_iter().find(|u| &u.id == user_id))
    }

    async fn insert(&self, user: User) -> Result<()> {
        let _guard = self.io_lock.lock().await;
        let mut users: Vec<User> = load_records(&self.path).await?;
        users.retain(|u| u.id != user.id);
        users.push(user);
        save_records(&self.path, &users).await
    }

    async fn add_favorite(&self, user_id: &UserId, book_id: &BookId) -> Result<()> {
        self.update_user(user_id, |user| {
            if !user.favorites.contains(book_id) {
                user.favorites.push(book_id.clone());
            }
        })
        .await
    }

    async fn remove_favorite(&self, user_id: &UserId, book_id: &BookId) -> Result<()> {
        self.update_user(user_id, |user| {
            user.favorites.retain(|id| id != book_id);
        })
        .await
    }

    async fn remove_favorite_everywhere(&self, book_id: &BookId) -> Result<()> {
        let _guard = self.io_lock.lock().await;
        let mut users: Vec<User> = load_records(&self.path).await?;
        for user in users.iter_mut() {
            user.favorites.retain(|id| id != book_id);
        }
        save_records(&self.path, &users).await
    }

    async fn append_history(&self, user_id: &UserId, loan_id: LoanId) -> Result<()> {
        self.update_user(user_id, |user| {
            user.history.push(loan_id);
        })
        .await
    }
}
