use chrono::{NaiveDate, Utc};
use futures::TryStreamExt;

use crate::application::ServiceDependencies;
use crate::domain::{self, Actor, Book, Loan, LoanId, ReturnBookError, commands::*};

use super::errors::{LendingError, Result};

/// 書籍を貸し出す
///
/// 書籍ごとの状態機械 `Available → Issued` の遷移。
///
/// ビジネスルール：
/// - 借り手が存在すること
/// - 借り手が貸出を受けられるロールであること（職員は借りられない）
/// - 書籍が存在すること
/// - その書籍にopenな貸出が存在しないこと
///
/// 成功時：返却期限 = 貸出日 + 貸出期間のLoanを台帳に記録し、
/// 書籍のavailabilityをfalseに、借り手の履歴に貸出IDを追記する。
///
/// read-check-writeの全体がwrite_lockの下で直列化される。
pub async fn issue_book(deps: &ServiceDependencies, cmd: IssueBook) -> Result<LoanId> {
    let _guard = deps.write_lock.lock().await;

    // 1. 借り手の存在とロールの確認
    let user = deps
        .users
        .get(&cmd.user_id)
        .await
        .map_err(LendingError::UserStoreError)?
        .ok_or(LendingError::UserNotFound)?;

    if !user.role.can_borrow() {
        return Err(LendingError::InvalidRole);
    }

    // 2. 書籍の存在確認
    deps.catalog
        .get(&cmd.book_id)
        .await
        .map_err(LendingError::CatalogError)?
        .ok_or(LendingError::BookNotFound)?;

    // 3. openな貸出がないことの確認
    let open = deps
        .ledger
        .open_by_book(&cmd.book_id)
        .await
        .map_err(LendingError::LedgerError)?;
    if open.is_some() {
        return Err(LendingError::AlreadyIssued);
    }

    // 4. ドメイン層の純粋関数で遷移
    let (loan, event) = domain::loan::issue_loan(
        cmd.book_id.clone(),
        cmd.user_id.clone(),
        cmd.issue_date,
        &deps.policy,
    );
    let loan_id = loan.id;

    // 5. 台帳（システム・オブ・レコード）→ 可用性 → 履歴の順に書き込む
    deps.ledger
        .save(loan)
        .await
        .map_err(LendingError::LedgerError)?;
    deps.catalog
        .set_available(&cmd.book_id, false)
        .await
        .map_err(LendingError::CatalogError)?;
    deps.users
        .append_history(&cmd.user_id, loan_id)
        .await
        .map_err(LendingError::UserStoreError)?;

    tracing::info!(
        book_id = %event.book_id,
        user_id = %event.user_id,
        due_date = %event.due_date,
        "book issued"
    );

    Ok(loan_id)
}

/// 書籍を返却する
///
/// 遷移 `Issued/Overdue → Available`。
///
/// ビジネスルール：
/// - 対象書籍にopenな貸出が存在すること
/// - 延滞料金 = max(0, 返却日 - 返却期限) × レート を貸出レコードに確定
/// - 書籍のavailabilityをtrueに戻す
///
/// 閉じた貸出の料金はそれ以降変わらない。
pub async fn return_book(deps: &ServiceDependencies, cmd: ReturnBook) -> Result<Loan> {
    let _guard = deps.write_lock.lock().await;

    let loan = deps
        .ledger
        .open_by_book(&cmd.book_id)
        .await
        .map_err(LendingError::LedgerError)?
        .ok_or(LendingError::LoanNotFound)?;

    let (closed, event) =
        domain::loan::close_loan(&loan, cmd.return_date, &deps.policy).map_err(|e| match e {
            ReturnBookError::AlreadyReturned => LendingError::AlreadyReturned,
            ReturnBookError::ReturnedBeforeIssued => {
                LendingError::InvalidInput("return date precedes issue date".to_string())
            }
        })?;

    deps.ledger
        .save(closed.clone())
        .await
        .map_err(LendingError::LedgerError)?;
    deps.catalog
        .set_available(&cmd.book_id, true)
        .await
        .map_err(LendingError::CatalogError)?;

    tracing::info!(
        book_id = %event.book_id,
        user_id = %event.user_id,
        fine = event.fine,
        "book returned"
    );

    Ok(closed)
}

/// 書籍をカタログに追加する（職員のみ）
pub async fn add_book(deps: &ServiceDependencies, actor: &Actor, cmd: AddBook) -> Result<Book> {
    if !actor.is_librarian() {
        return Err(LendingError::Forbidden);
    }
    if cmd.book_id.is_empty() {
        return Err(LendingError::InvalidInput("book id is empty".to_string()));
    }
    if cmd.title.trim().is_empty() {
        return Err(LendingError::InvalidInput("title is empty".to_string()));
    }

    let _guard = deps.write_lock.lock().await;

    let existing = deps
        .catalog
        .get(&cmd.book_id)
        .await
        .map_err(LendingError::CatalogError)?;
    if existing.is_some() {
        return Err(LendingError::InvalidInput(
            "book id already exists".to_string(),
        ));
    }

    let book = Book::new(
        cmd.book_id,
        cmd.title,
        cmd.author,
        cmd.category,
        cmd.description,
        cmd.cover_url,
        Utc::now(),
    );
    deps.catalog
        .insert(book.clone())
        .await
        .map_err(LendingError::CatalogError)?;

    tracing::info!(book_id = %book.id, "book added to catalog");

    Ok(book)
}

/// 書籍をカタログから削除する（職員のみ）
///
/// ビジネスルール：
/// - openな貸出が参照している間は削除できない（BookInUse）
/// - 削除時は全利用者のお気に入りからも参照を取り除く
/// - 台帳の貸出レコードは履歴として残す
pub async fn delete_book(deps: &ServiceDependencies, actor: &Actor, cmd: DeleteBook) -> Result<()> {
    if !actor.is_librarian() {
        return Err(LendingError::Forbidden);
    }

    let _guard = deps.write_lock.lock().await;

    deps.catalog
        .get(&cmd.book_id)
        .await
        .map_err(LendingError::CatalogError)?
        .ok_or(LendingError::BookNotFound)?;

    let open = deps
        .ledger
        .open_by_book(&cmd.book_id)
        .await
        .map_err(LendingError::LedgerError)?;
    if open.is_some() {
        return Err(LendingError::BookInUse);
    }

    deps.catalog
        .delete(&cmd.book_id)
        .await
        .map_err(LendingError::CatalogError)?;
    deps.users
        .remove_favorite_everywhere(&cmd.book_id)
        .await
        .map_err(LendingError::UserStoreError)?;

    tracing::info!(book_id = %cmd.book_id, "book deleted from catalog");

    Ok(())
}

/// 延滞中の貸出を列挙する
///
/// 基準日時点で返却期限を過ぎたopenな貸出。純粋な読み取りで、
/// 呼び出し間に状態を持たない。
pub async fn list_overdue(deps: &ServiceDependencies, as_of: NaiveDate) -> Result<Vec<Loan>> {
    let mut stream = deps.ledger.stream_open();
    let mut overdue = Vec::new();
    while let Some(loan) = stream.try_next().await.map_err(LendingError::LedgerError)? {
        if domain::loan::is_overdue(&loan, as_of) {
            overdue.push(loan);
        }
    }
    Ok(overdue)
}
