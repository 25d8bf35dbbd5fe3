mod errors;
mod lending_service;

pub use errors::{LendingError, Result};
pub use lending_service::{add_book, delete_book, issue_book, list_overdue, return_book};
