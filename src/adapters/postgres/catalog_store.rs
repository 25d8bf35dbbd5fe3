use crate::domain::book::Book;
use crate::domain::value_objects::BookId;
use crate::ports::catalog_store::{CatalogStore as CatalogStoreTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

/// PostgreSQLの行データをBookに変換する
fn map_row_to_book(row: &PgRow) -> Book {
    Book {
        id: BookId::new(row.get::<String, _>("id")),
        title: row.get("title"),
        author: row.get("author"),
        category: row.get("category"),
        description: row.get("description"),
        cover_url: row.get("cover_url"),
        available: row.get("available"),
        created_at: row.get("created_at"),
    }
}

/// CatalogStoreのPostgreSQL実装
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStoreTrait for PgCatalogStore {
    async fn get(&self, book_id: &BookId) -> Result<Option<Book>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, author, category, description, cover_url, available, created_at
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_book))
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, author, category, description, cover_url, available, created_at
            FROM books
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_book).collect())
    }

    async fn insert(&self, book: Book) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, category, description, cover_url, available, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(book.id.value())
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.category)
        .bind(&book.description)
        .bind(&book.cover_url)
        .bind(book.available)
        .bind(book.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, book_id: &BookId) -> Result<()> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(book_id.value())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_available(&self, book_id: &BookId, available: bool) -> Result<()> {
        sqlx::query("UPDATE books SET available = $2 WHERE id = $1")
            .bind(book_id.value())
            .bind(available)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
