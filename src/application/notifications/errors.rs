use thiserror::Error;

/// 通知サマリのエラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// 利用者が存在しない
    #[error("User not found")]
    UserNotFound,

    /// 不正な入力（負の日数など）
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// ユーザーストアのエラー
    #[error("User store error")]
    UserStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 貸出台帳のエラー
    #[error("Loan ledger error")]
    LedgerError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, NotificationError>;
