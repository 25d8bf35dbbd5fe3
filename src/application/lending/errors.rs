use thiserror::Error;

/// 貸出エンジンのエラー
///
/// すべて呼び出し時点の状態から決定的に導かれる。失敗時に状態変更は
/// 行われないため、入力を変えずに再試行しても同じエラーになる。
#[derive(Debug, Error)]
pub enum LendingError {
    /// 書籍が存在しない
    #[error("Book not found")]
    BookNotFound,

    /// 利用者が存在しない
    #[error("User not found")]
    UserNotFound,

    /// 対象のopenな貸出が存在しない
    #[error("Loan not found")]
    LoanNotFound,

    /// 書籍は既に貸出中
    #[error("Book is already issued")]
    AlreadyIssued,

    /// 貸出は既に返却済み
    #[error("Loan is already returned")]
    AlreadyReturned,

    /// openな貸出が参照しているため書籍を削除できない
    #[error("Book has an open loan and cannot be deleted")]
    BookInUse,

    /// 借り手として不適切なロール
    #[error("User role cannot borrow books")]
    InvalidRole,

    /// 特権操作に必要なロールがない
    #[error("Operation requires librarian role")]
    Forbidden,

    /// 不正な入力（日付の不整合、負の数量など）
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// カタログストアのエラー
    #[error("Catalog store error")]
    CatalogError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// ユーザーストアのエラー
    #[error("User store error")]
    UserStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 貸出台帳のエラー
    #[error("Loan ledger error")]
    LedgerError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// 貸出エンジンのResult型
pub type Result<T> = std::result::Result<T, LendingError>;
