use crate::domain::book::Book;
use crate::domain::value_objects::BookId;
use crate::ports::catalog_store::{CatalogStore as CatalogStoreTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory CatalogStore implementation
///
/// Backs integration tests and small demos. Listing is ordered by
/// book id so reads are deterministic.
pub struct MemoryCatalogStore {
    books: Mutex<HashMap<BookId, Book>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            books: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStoreTrait for MemoryCatalogStore {
    async fn get(&self, book_id: &BookId) -> Result<Option<Book>> {
        Ok(self.books.lock().unwrap().get(book_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Book>> {
        let mut books: Vec<Book> = self.books.lock().unwrap().values().cloned().collect();
        books.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(books)
    }

    async fn insert(&self, book: Book) -> Result<()> {
        self.books.lock().unwrap().insert(book.id.clone(), book);
        Ok(())
    }

    async fn delete(&self, book_id: &BookId) -> Result<()> {
        self.books.lock().unwrap().remove(book_id);
        Ok(())
    }

    async fn set_available(&self, book_id: &BookId, available: bool) -> Result<()> {
        if let Some(book) = self.books.lock().unwrap().get_mut(book_id) {
            book.available = available;
        }
        Ok(())
    }
}
