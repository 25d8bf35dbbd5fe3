use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, LoanId, Role, UserId};

/// 利用者レコード - ユーザーストアに永続化される
///
/// `favorites`は書籍IDの集合（挿入順を保持）、`history`は貸出IDの
/// 追記専用列。どちらも貸出エンジン／お気に入り操作からのみ更新される。
/// `password_hash`は不透明なハッシュ値として保持するだけで、
/// 認証処理そのものはコアの責務外。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub password_hash: String,
    pub favorites: Vec<BookId>,
    pub history: Vec<LoanId>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        role: Role,
        password_hash: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            password_hash: password_hash.into(),
            favorites: Vec::new(),
            history: Vec::new(),
            created_at,
        }
    }

    pub fn is_favorite(&self, book_id: &BookId) -> bool {
        self.favorites.contains(book_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_has_empty_favorites_and_history() {
        let user = User::new(
            UserId::new("alice@example.com"),
            "Alice",
            Role::Student,
            "hash",
            Utc::now(),
        );
        assert!(user.favorites.is_empty());
        assert!(user.history.is_empty());
    }

    #[test]
    fn test_is_favorite() {
        let mut user = User::new(
            UserId::new("alice@example.com"),
            "Alice",
            Role::Student,
            "hash",
            Utc::now(),
        );
        user.favorites.push(BookId::new("B001"));
        assert!(user.is_favorite(&BookId::new("B001")));
        assert!(!user.is_favorite(&BookId::new("B002")));
    }
}
