use crate::application::lending::LendingError;
use crate::application::notifications::NotificationError;
use crate::application::recommendation::RecommendationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    Lending(LendingError),
    Recommendation(RecommendationError),
    Notification(NotificationError),
}

impl From<LendingError> for ApiError {
    fn from(err: LendingError) -> Self {
        ApiError::Lending(err)
    }
}

impl From<RecommendationError> for ApiError {
    fn from(err: RecommendationError) -> Self {
        ApiError::Recommendation(err)
    }
}

impl From<NotificationError> for ApiError {
    fn from(err: NotificationError) -> Self {
        ApiError::Notification(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Lending(err) => lending_response(err),
            ApiError::Recommendation(err) => recommendation_response(err),
            ApiError::Notification(err) => notification_response(err),
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}

fn lending_response(err: LendingError) -> (StatusCode, &'static str, String) {
    match err {
        // 404 Not Found - リクエストされたリソースが存在しない
        LendingError::BookNotFound => (
            StatusCode::NOT_FOUND,
            "BOOK_NOT_FOUND",
            "Book not found".to_string(),
        ),
        LendingError::UserNotFound => (
            StatusCode::NOT_FOUND,
            "USER_NOT_FOUND",
            "User not found".to_string(),
        ),
        LendingError::LoanNotFound => (
            StatusCode::NOT_FOUND,
            "LOAN_NOT_FOUND",
            "No open loan for this book".to_string(),
        ),

        // 400 Bad Request - リクエスト自体が不正
        LendingError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg),

        // 403 Forbidden - 権限不足
        LendingError::Forbidden => (
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            "Operation requires librarian role".to_string(),
        ),

        // 422 Unprocessable Entity - ビジネスルール違反
        LendingError::AlreadyIssued => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "ALREADY_ISSUED",
            "Book is already issued".to_string(),
        ),
        LendingError::AlreadyReturned => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "ALREADY_RETURNED",
            "Loan is already closed".to_string(),
        ),
        LendingError::BookInUse => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "BOOK_IN_USE",
            "Book has an open loan and cannot be deleted".to_string(),
        ),
        LendingError::InvalidRole => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "INVALID_ROLE",
            "User role is not allowed to borrow".to_string(),
        ),

        // 500 Internal Server Error - システム障害
        // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
        LendingError::CatalogError(e) => {
            tracing::error!("Catalog store error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CATALOG_ERROR",
                "Catalog store error".to_string(),
            )
        }
        LendingError::UserStoreError(e) => {
            tracing::error!("User store error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "USER_STORE_ERROR",
                "User store error".to_string(),
            )
        }
        LendingError::LedgerError(e) => {
            tracing::error!("Loan ledger error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "LEDGER_ERROR",
                "Loan ledger error".to_string(),
            )
        }
    }
}

fn recommendation_response(err: RecommendationError) -> (StatusCode, &'static str, String) {
    match err {
        RecommendationError::UserNotFound => (
            StatusCode::NOT_FOUND,
            "USER_NOT_FOUND",
            "User not found".to_string(),
        ),
        RecommendationError::CatalogError(e) => {
            tracing::error!("Catalog store error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CATALOG_ERROR",
                "Catalog store error".to_string(),
            )
        }
        RecommendationError::UserStoreError(e) => {
            tracing::error!("User store error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "USER_STORE_ERROR",
                "User store error".to_string(),
            )
        }
        RecommendationError::LedgerError(e) => {
            tracing::error!("Loan ledger error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "LEDGER_ERROR",
                "Loan ledger error".to_string(),
            )
        }
    }
}

fn notification_response(err: NotificationError) -> (StatusCode, &'static str, String) {
    match err {
        NotificationError::UserNotFound => (
            StatusCode::NOT_FOUND,
            "USER_NOT_FOUND",
            "User not found".to_string(),
        ),
        NotificationError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg),
        NotificationError::UserStoreError(e) => {
            tracing::error!("User store error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "USER_STORE_ERROR",
                "User store error".to_string(),
            )
        }
        NotificationError::LedgerError(e) => {
            tracing::error!("Loan ledger error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "LEDGER_ERROR",
                "Loan ledger error".to_string(),
            )
        }
    }
}
