use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookId, LoanId, UserId};

/// イベント：書籍が貸出された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookIssued {
    pub loan_id: LoanId,
    pub book_id: BookId,
    pub user_id: UserId,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// イベント：書籍が返却された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookReturned {
    pub loan_id: LoanId,
    pub book_id: BookId,
    pub user_id: UserId,
    pub returned_on: NaiveDate,
    /// 返却時に確定した延滞料金
    pub fine: i64,
}
