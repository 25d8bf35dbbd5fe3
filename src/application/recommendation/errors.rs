use thiserror::Error;

/// 推薦エンジンのエラー
///
/// 適格な候補が存在しないことはエラーではなく空の結果で表す。
#[derive(Debug, Error)]
pub enum RecommendationError {
    /// 利用者が存在しない
    #[error("User not found")]
    UserNotFound,

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

pub type Result<T> = std::result::Result<T, RecommendationError>;
