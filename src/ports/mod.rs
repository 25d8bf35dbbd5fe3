pub mod catalog_store;
pub mod loan_ledger;
pub mod user_store;

pub use catalog_store::CatalogStore;
pub use loan_ledger::LoanLedger;
pub use user_store::UserStore;
