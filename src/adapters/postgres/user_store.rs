use crate::domain::user::User;
use crate::domain::value_objects::{BookId, LoanId, Role, UserId};
use crate::ports::user_store::{Result, UserStore as UserStoreTrait};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::str::FromStr;
use uuid::Uuid;

/// PostgreSQLの行データをUserに変換する
///
/// roleの文字列からの変換でエラーハンドリングを行う。
fn map_row_to_user(row: &PgRow) -> Result<User> {
    let role_str: &str = row.get("role");
    let role = Role::from_str(role_str).map_err(|e| {
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            as Box<dyn std::error::Error + Send + Sync>
    })?;

    let favorites: Vec<String> = row.get("favorites");
    let history: Vec<Uuid> = row.get("history");

    Ok(User {
        id: UserId::new(row.get::<String, _>("id")),
        name: row.get("name"),
        role,
        password_hash: row.get("password_hash"),
        favorites: favorites.into_iter().map(BookId::new).collect(),
        history: history.into_iter().map(LoanId::from_uuid).collect(),
        created_at: row.get("created_at"),
    })
}

/// UserStoreのPostgreSQL実装
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStoreTrait for PgUserStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, role, password_hash, favorites, history, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_user).transpose()
    }

    async fn insert(&self, user: User) -> Result<()> {
        let favorites: Vec<String> = user
            .favorites
            .iter()
            .map(|id| id.value().to_string())
            .collect();
        let history: Vec<Uuid> = user.history.iter().map(|id| id.value()).collect();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, role, password_hash, favorites, history, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.value())
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .bind(&favorites)
        .bind(&history)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn add_favorite(&self, user_id: &UserId, book_id: &BookId) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET favorites = array_append(favorites, $2)
            WHERE id = $1 AND NOT favorites @> ARRAY[$2]
            "#,
        )
        .bind(user_id.value())
        .bind(book_id.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_favorite(&self, user_id: &UserId, book_id: &BookId) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET favorites = array_remove(favorites, $2)
            WHERE id = $1
            "#,
        )
        .bind(user_id.value())
        .bind(book_id.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_favorite_everywhere(&self, book_id: &BookId) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET favorites = array_remove(favorites, $1)
            WHERE favorites @> ARRAY[$1]
            "#,
        )
        .bind(book_id.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn append_history(&self, user_id: &UserId, loan_id: LoanId) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET history = array_append(history, $2)
            WHERE id = $1
            "#,
        )
        .bind(user_id.value())
        .bind(loan_id.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
