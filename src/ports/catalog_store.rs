use crate::domain::book::Book;
use crate::domain::value_objects::BookId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Catalog Store port.
///
/// Holds book records. The `available` flag on a stored book is a
/// projection of ledger state: only the Lending Engine may change it,
/// through `set_available`.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Get a book by id.
    async fn get(&self, book_id: &BookId) -> Result<Option<Book>>;

    /// List the whole catalog.
    async fn list(&self) -> Result<Vec<Book>>;

    /// Insert a new book record.
    ///
    /// The caller has already checked the id is unused.
    async fn insert(&self, book: Book) -> Result<()>;

    /// Remove a book record.
    ///
    /// The Lending Engine only calls this after verifying no open loan
    /// references the book.
    async fn delete(&self, book_id: &BookId) -> Result<()>;

    /// Update the derived availability flag.
    async fn set_available(&self, book_id: &BookId, available: bool) -> Result<()>;
}
