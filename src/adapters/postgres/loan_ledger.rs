use crate::domain::loan::Loan;
use crate::domain::value_objects::{BookId, LoanId, UserId};
use crate::ports::loan_ledger::{LoanLedger as LoanLedgerTrait, Result};
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::collections::HashMap;

/// PostgreSQLの行データをLoanに変換する
fn map_row_to_loan(row: &PgRow) -> Loan {
    Loan {
        id: LoanId::from_uuid(row.get("id")),
        book_id: BookId::new(row.get::<String, _>("book_id")),
        user_id: UserId::new(row.get::<String, _>("user_id")),
        issue_date: row.get("issue_date"),
        due_date: row.get("due_date"),
        returned_on: row.get("returned_on"),
        fine: row.get("fine"),
    }
}

/// LoanLedgerのPostgreSQL実装
///
/// 部分ユニークインデックス（returned_on IS NULL）がストア側でも
/// 「1冊につきopenな貸出は高々1件」を強制する。
pub struct PgLoanLedger {
    pool: PgPool,
}

impl PgLoanLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanLedgerTrait for PgLoanLedger {
    /// 貸出レコードを保存する（upsert）
    ///
    /// INSERT ... ON CONFLICT UPDATEで、台帳が常にレコードの完全な
    /// 状態を反映するようにする。
    async fn save(&self, loan: Loan) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO loans (id, book_id, user_id, issue_date, due_date, returned_on, fine)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id)
            DO UPDATE SET
                returned_on = EXCLUDED.returned_on,
                fine = EXCLUDED.fine
            "#,
        )
        .bind(loan.id.value())
        .bind(loan.book_id.value())
        .bind(loan.user_id.value())
        .bind(loan.issue_date)
        .bind(loan.due_date)
        .bind(loan.returned_on)
        .bind(loan.fine)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT id, book_id, user_id, issue_date, due_date, returned_on, fine
            FROM loans
            WHERE id = $1
            "#,
        )
        .bind(loan_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_loan))
    }

    async fn open_by_book(&self, book_id: &BookId) -> Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT id, book_id, user_id, issue_date, due_date, returned_on, fine
            FROM loans
            WHERE book_id = $1 AND returned_on IS NULL
            "#,
        )
        .bind(book_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_loan))
    }

    async fn open_by_user(&self, user_id: &UserId) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            r#"
            SELECT id, book_id, user_id, issue_date, due_date, returned_on, fine
            FROM loans
            WHERE user_id = $1 AND returned_on IS NULL
            ORDER BY issue_date ASC, id ASC
            "#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_loan).collect())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Loan>> {
        let rows = sqlx::query(
            r#"
            SELECT id, book_id, user_id, issue_date, due_date, returned_on, fine
            FROM loans
            WHERE user_id = $1
            ORDER BY issue_date ASC, id ASC
            "#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_loan).collect())
    }

    async fn issue_counts(&self) -> Result<HashMap<BookId, u64>> {
        let rows = sqlx::query(
            r#"
            SELECT book_id, COUNT(*) AS issued
            FROM loans
            GROUP BY book_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let count: i64 = row.get("issued");
                (BookId::new(row.get::<String, _>("book_id")), count as u64)
            })
            .collect())
    }

    fn stream_open(&self) -> BoxStream<'static, Result<Loan>> {
        let pool = self.pool.clone();
        // コミット済みスナップショットを読み切ってから流す
        futures::stream::once(async move {
            let rows = sqlx::query(
                r#"
                SELECT id, book_id, user_id, issue_date, due_date, returned_on, fine
                FROM loans
                WHERE returned_on IS NULL
                ORDER BY due_date ASC
                "#,
            )
            .fetch_all(&pool)
            .await?;

            let loans: Vec<Loan> = rows.iter().map(map_row_to_loan).collect();
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(futures::stream::iter(
                loans.into_iter().map(Ok),
            ))
        })
        .try_flatten()
        .boxed()
    }
}
