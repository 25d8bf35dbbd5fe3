pub mod catalog_store;
pub mod loan_ledger;
pub mod user_store;

pub use catalog_store::PgCatalogStore;
pub use loan_ledger::PgLoanLedger;
pub use user_store::PgUserStore;
