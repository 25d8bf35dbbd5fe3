pub mod catalog_store;
pub mod loan_ledger;
pub mod user_store;

pub use catalog_store::MemoryCatalogStore;
pub use loan_ledger::MemoryLoanLedger;
pub use user_store::MemoryUserStore;
