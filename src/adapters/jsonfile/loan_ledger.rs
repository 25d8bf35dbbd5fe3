use crate::domain::loan::Loan;
use crate::domain::value_objects::{BookId, LoanId, UserId};
use crate::ports::loan_ledger::{LoanLedger as LoanLedgerTrait, Result};
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{load_records, save_records};

/// LoanLedgerのフラットファイル実装（loans.json）
///
/// レコードは閉じられるだけで削除されない。ファイルは追記順を保つ。
pub struct JsonFileLoanLedger {
    path: Arc<PathBuf>,
    io_lock: Mutex<()>,
}

impl JsonFileLoanLedger {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: Arc::new(data_dir.as_ref().join("loans.json")),
            io_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl LoanLedgerTrait for JsonFileLoanLedger {
    async fn save(&self, loan: Loan) -> Result<()> {
        let _guard = self.io_lock.lock().await;
        let mut loans: Vec<Loan> = load_records(&self.path).await?;
        match loans.iter_mut().find(|l| l.id == loan.id) {
            Some(existing) => *existing = loan,
            None => loans.push(loan),
        }
        save_records(&self.path, &loans).await
    }

    async fn get(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let _guard = self.io_lock.lock().await;
        let loans: Vec<Loan> = load_records(&self.path).await?;
        Ok(loans.into_iter().find(|l| l.id == loan_id))
    }

    async fn open_by_book(&self, book_id: &BookId) -> Result<Option<Loan>> {
        let _guard = self.io_lock.lock().await;
        let loans: Vec<Loan> = load_records(&self.path).await?;
        Ok(loans
            .into_iter()
            .find(|l| l.is_open() && &l.book_id == book_id))
    }

    async fn open_by_user(&self, user_id: &UserId) -> Result<Vec<Loan>> {
        let _guard = self.io_lock.lock().await;
        let loans: Vec<Loan> = load_records(&self.path).await?;
        Ok(loans
            .into_iter()
            .filter(|l| l.is_open() && &l.user_id == user_id)
            .collect())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Loan>> {
        let _guard = self.io_lock.lock().await;
        let mut loans: Vec<Loan> = load_records(&self.path).await?;
        loans.retain(|l| &l.user_id == user_id);
        loans.sort_by(|a, b| a.issue_date.cmp(&b.issue_date));
        Ok(loans)
    }

    async fn issue_counts(&self) -> Result<HashMap<BookId, u64>> {
        let _guard = self.io_lock.lock().await;
        let loans: Vec<Loan> = load_records(&self.path).await?;
        let mut counts: HashMap<BookId, u64> = HashMap::new();
        for loan in loans {
            *counts.entry(loan.book_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    fn stream_open(&self) -> BoxStream<'static, Result<Loan>> {
        let path = Arc::clone(&self.path);
        // ファイルを読み切ってからスナップショットを流す
        futures::stream::once(async move {
            let loans: Vec<Loan> = load_records(&path).await?;
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(
                futures::stream::iter(loans.into_iter().filter(Loan::is_open).map(Ok)),
            )
        })
        .try_flatten()
        .boxed()
    }
}
