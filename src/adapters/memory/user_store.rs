use crate::domain::user::User;
use crate::domain::value_objects::{BookId, LoanId, UserId};
use crate::ports::user_store::{Result, UserStore as UserStoreTrait};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory UserStore implementation
pub struct MemoryUserStore {
    users: Mutex<HashMap<UserId, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStoreTrait for MemoryUserStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(user_id).cloned())
    }

    async fn insert(&self, user: User) -> Result<()> {
        self.users.lock().unwrap().insert(user.id.clone(), user);
        Ok(())
    }

    async fn add_favorite(&self, user_id: &UserId, book_id: &BookId) -> Result<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(user_id) {
            if !user.favorites.contains(book_id) {
                user.favorites.push(book_id.clone());
            }
        }
        Ok(())
    }

    async fn remove_favorite(&self, user_id: &UserId, book_id: &BookId) -> Result<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(user_id) {
            user.favorites.retain(|id| id != book_id);
        }
        Ok(())
    }

    async fn remove_favorite_everywhere(&self, book_id: &BookId) -> Result<()> {
        for user in self.users.lock().unwrap().values_mut() {
            user.favorites.retain(|id| id != book_id);
        }
        Ok(())
    }

    async fn append_history(&self, user_id: &UserId, loan_id: LoanId) -> Result<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(user_id) {
            user.history.push(loan_id);
        }
        Ok(())
    }
}
