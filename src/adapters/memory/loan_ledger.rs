use crate::domain::loan::Loan;
use crate::domain::value_objects::{BookId, LoanId, UserId};
use crate::ports::loan_ledger::{LoanLedger as LoanLedgerTrait, Result};
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory LoanLedger implementation
///
/// Records are kept forever; a return only closes the record.
pub struct MemoryLoanLedger {
    loans: Mutex<HashMap<LoanId, Loan>>,
}

impl MemoryLoanLedger {
    pub fn new() -> Self {
        Self {
            loans: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryLoanLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoanLedgerTrait for MemoryLoanLedger {
    async fn save(&self, loan: Loan) -> Result<()> {
        self.loans.lock().unwrap().insert(loan.id, loan);
        Ok(())
    }

    async fn get(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        Ok(self.loans.lock().unwrap().get(&loan_id).cloned())
    }

    async fn open_by_book(&self, book_id: &BookId) -> Result<Option<Loan>> {
        Ok(self
            .loans
            .lock()
            .unwrap()
            .values()
            .find(|l| l.is_open() && &l.book_id == book_id)
            .cloned())
    }

    async fn open_by_user(&self, user_id: &UserId) -> Result<Vec<Loan>> {
        let mut loans: Vec<Loan> = self
            .loans
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.is_open() && &l.user_id == user_id)
            .cloned()
            .collect();
        loans.sort_by(|a, b| a.issue_date.cmp(&b.issue_date).then(a.id.value().cmp(&b.id.value())));
        Ok(loans)
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Loan>> {
        let mut loans: Vec<Loan> = self
            .loans
            .lock()
            .unwrap()
            .values()
            .filter(|l| &l.user_id == user_id)
            .cloned()
            .collect();
        loans.sort_by(|a, b| a.issue_date.cmp(&b.issue_date).then(a.id.value().cmp(&b.id.value())));
        Ok(loans)
    }

    async fn issue_counts(&self) -> Result<HashMap<BookId, u64>> {
        let mut counts: HashMap<BookId, u64> = HashMap::new();
        for loan in self.loans.lock().unwrap().values() {
            *counts.entry(loan.book_id.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    fn stream_open(&self) -> BoxStream<'static, Result<Loan>> {
        // Snapshot of committed state; the stream owns its data and
        // holds no cursor into the ledger.
        let open: Vec<Loan> = self
            .loans
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.is_open())
            .cloned()
            .collect();
        futures::stream::iter(open.into_iter().map(Ok)).boxed()
    }
}
