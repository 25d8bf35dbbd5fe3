use crate::domain::book::Book;
use crate::domain::value_objects::BookId;
use crate::ports::catalog_store::{CatalogStore as CatalogStoreTrait, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::{load_records, save_records};

/// CatalogStoreのフラットファイル実装（books.json）
pub struct JsonFileCatalogStore {
    path: PathBuf,
    io_lock: Mutex<()>,
}

impl JsonFileCatalogStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join("books.json"),
            io_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl CatalogStoreTrait for JsonFileCatalogStore {
    async fn get(&self, book_id: &BookId) -> Result<Option<Book>> {
        let _guard = self.io_lock.lock().await;
        let books: Vec<Book> = load_records(&self.path).await?;
        Ok(books.into_iter().find(|b| &b.id == book_id))
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let _guard = self.io_lock.lock().await;
        let mut books: Vec<Book> = load_records(&self.path).await?;
        books.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(books)
    }

    async fn insert(&self, book: Book) -> Result<()> {
        let _guard = self.io_lock.lock().await;
        let mut books: Vec<Book> = load_records(&self.path).await?;
        books.retain(|b| b.id != book.id);
        books.push(book);
        save_records(&self.path, &books).await
    }

    async fn delete(&self, book_id: &BookId) -> Result<()> {
        let _guard = self.io_lock.lock().await;
        let mut books: Vec<Book> = load_records(&self.path).await?;
        books.retain(|b| &b.id != book_id);
        save_records(&self.path, &books).await
    }

    async fn set_available(&self, book_id: &BookId, available: bool) -> Result<()> {
        let _guard = self.io_lock.lock().await;
        let mut books: Vec<Book> = load_records(&self.path).await?;
        if let Some(book) = books.iter_mut().find(|b| &b.id == book_id) {
            book.available = available;
        }
        save_records(&self.path, &books).await
    }
}
