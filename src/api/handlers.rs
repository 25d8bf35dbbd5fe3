use crate::application::lending::{
    LendingError, add_book as execute_add_book, delete_book as execute_delete_book,
    issue_book as execute_issue_book, list_overdue as execute_list_overdue,
    return_book as execute_return_book,
};
use crate::application::notifications::{due_soon, overdue, total_fine_owed};
use crate::application::recommendation::recommend;
use crate::application::ServiceDependencies;
use crate::domain::commands::{DeleteBook, ReturnBook};
use crate::domain::{BookId, User, UserId};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{
        ActorParams, AddBookRequest, BookResponse, BookReturnedResponse, DueSoonQuery,
        IssueBookRequest, LoanCreatedResponse, LoanResponse, OverdueNoticeResponse, OverdueQuery,
        RecommendQuery, RegisterUserRequest, ReturnBookRequest, RecommendationResponse,
        TotalFineResponse, UserResponse,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// 期限間近とみなすデフォルトの日数
const DEFAULT_DUE_SOON_DAYS: i64 = 3;

/// 推薦のデフォルト件数
const DEFAULT_RECOMMEND_LIMIT: usize = 5;

// ============================================================================
// Command handlers (POST / DELETE)
// ============================================================================

/// POST /books - 書籍をカタログに追加
///
/// 強制されるビジネスルール:
/// - 操作主体が職員（librarian）であること
/// - 書籍IDとタイトルが空でないこと
/// - 書籍IDが未使用であること
pub async fn add_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let actor = req.actor.to_actor();
    let cmd = req.to_command();

    let book = execute_add_book(&state.service_deps, &actor, cmd).await?;

    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

/// DELETE /books/:id - 書籍をカタログから削除
///
/// 強制されるビジネスルール:
/// - 操作主体が職員（librarian）であること
/// - 書籍が存在すること
/// - openな貸出が参照していないこと
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
    Query(actor): Query<ActorParams>,
) -> Result<StatusCode, ApiError> {
    let cmd = DeleteBook {
        book_id: BookId::new(book_id),
    };

    execute_delete_book(&state.service_deps, &actor.to_actor(), cmd).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /books/:id/issue - 書籍を貸し出す
///
/// 強制されるビジネスルール:
/// - 借り手が存在し、貸出を受けられるロールであること
/// - 書籍が存在すること
/// - その書籍にopenな貸出が存在しないこと
pub async fn issue_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
    Json(req): Json<IssueBookRequest>,
) -> Result<(StatusCode, Json<LoanCreatedResponse>), ApiError> {
    let cmd = req.to_command(BookId::new(book_id));

    let loan_id = execute_issue_book(&state.service_deps, cmd).await?;

    // 作成された貸出を取得して完全な情報を返す
    let loan = state
        .service_deps
        .ledger
        .get(loan_id)
        .await
        .map_err(|e| ApiError::from(LendingError::LedgerError(e)))?
        .ok_or_else(|| ApiError::from(LendingError::LoanNotFound))?;

    let response = LoanCreatedResponse {
        loan_id: loan_id.value(),
        book_id: loan.book_id.value().to_string(),
        user_id: loan.user_id.value().to_string(),
        due_date: loan.due_date,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /books/:id/return - 書籍を返却する
///
/// 延滞していた場合は確定した料金をレスポンスに含める。
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
    Json(req): Json<ReturnBookRequest>,
) -> Result<(StatusCode, Json<BookReturnedResponse>), ApiError> {
    let return_date = req.return_date.unwrap_or_else(|| Utc::now().date_naive());
    let cmd = ReturnBook {
        book_id: BookId::new(book_id),
        return_date,
    };

    let closed = execute_return_book(&state.service_deps, cmd).await?;

    let response = BookReturnedResponse {
        loan_id: closed.id.value(),
        // close_loanが返すLoanのreturned_onは常にSome
        returned_on: closed.returned_on.unwrap_or(return_date),
        fine: closed.fine,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// POST /users - 利用者を登録
///
/// メールアドレスは正規化（小文字化）して利用者IDとする。
/// 登録済みのIDに対しては409を返す。
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), QueryError> {
    let user_id = UserId::new(&req.email);
    if user_id.is_empty() {
        return Err(QueryError::BadRequest("email is empty".to_string()));
    }

    let existing = state
        .service_deps
        .users
        .get(&user_id)
        .await
        .map_err(|e| QueryError::InternalError(e.to_string()))?;
    if existing.is_some() {
        return Err(QueryError::Conflict("email already registered".to_string()));
    }

    let user = User::new(user_id, req.name, req.role, req.password_hash, Utc::now());
    state
        .service_deps
        .users
        .insert(user.clone())
        .await
        .map_err(|e| QueryError::InternalError(e.to_string()))?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "user registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /users/:id/favorites/:book_id - お気に入りに追加
///
/// 既にお気に入りの場合は何もしない（冪等）。
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Path((user_id, book_id)): Path<(String, String)>,
) -> Result<StatusCode, QueryError> {
    let user_id = UserId::new(user_id);
    let book_id = BookId::new(book_id);

    ensure_user(&state.service_deps, &user_id).await?;
    state
        .service_deps
        .catalog
        .get(&book_id)
        .await
        .map_err(|e| QueryError::InternalError(e.to_string()))?
        .ok_or_else(|| QueryError::NotFound(format!("Book {} not found", book_id)))?;

    state
        .service_deps
        .users
        .add_favorite(&user_id, &book_id)
        .await
        .map_err(|e| QueryError::InternalError(e.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/:id/favorites/:book_id - お気に入りから削除
///
/// お気に入りでない場合は何もしない（冪等）。
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Path((user_id, book_id)): Path<(String, String)>,
) -> Result<StatusCode, QueryError> {
    let user_id = UserId::new(user_id);
    let book_id = BookId::new(book_id);

    ensure_user(&state.service_deps, &user_id).await?;
    state
        .service_deps
        .users
        .remove_favorite(&user_id, &book_id)
        .await
        .map_err(|e| QueryError::InternalError(e.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /books - カタログ一覧
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookResponse>>, QueryError> {
    let books = state
        .service_deps
        .catalog
        .list()
        .await
        .map_err(|e| QueryError::InternalError(e.to_string()))?;

    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// GET /books/:id - 書籍詳細
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
) -> Result<Json<BookResponse>, QueryError> {
    let book_id = BookId::new(book_id);

    match state.service_deps.catalog.get(&book_id).await {
        Ok(Some(book)) => Ok(Json(BookResponse::from(book))),
        Ok(None) => Err(QueryError::NotFound(format!("Book {} not found", book_id))),
        Err(e) => Err(QueryError::InternalError(e.to_string())),
    }
}

/// GET /loans/overdue - 延滞中の貸出一覧（職員向けの全体ビュー）
///
/// クエリパラメータ:
/// - as_of: 基準日（省略時は今日）
pub async fn list_overdue_loans(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OverdueQuery>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());

    let loans = execute_list_overdue(&state.service_deps, as_of).await?;

    Ok(Json(loans.into_iter().map(LoanResponse::from).collect()))
}

/// GET /users/:id/recommendations - 利用者向けの推薦
///
/// スコア降順・同点は書籍ID昇順。適格な候補がなければ空列。
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<RecommendQuery>,
) -> Result<Json<Vec<RecommendationResponse>>, ApiError> {
    let user_id = UserId::new(user_id);
    let limit = query.limit.unwrap_or(DEFAULT_RECOMMEND_LIMIT);

    let recommendations = recommend(&state.service_deps, &user_id, limit).await?;

    Ok(Json(
        recommendations
            .into_iter()
            .map(RecommendationResponse::from)
            .collect(),
    ))
}

/// GET /users/:id/notifications/due-soon - 返却期限が近い貸出
///
/// クエリパラメータ:
/// - within_days: 期限までの日数の上限（省略時は3）
pub async fn get_due_soon(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<DueSoonQuery>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let user_id = UserId::new(user_id);
    let within_days = query.within_days.unwrap_or(DEFAULT_DUE_SOON_DAYS);
    let today = Utc::now().date_naive();

    let loans = due_soon(&state.service_deps, &user_id, today, within_days).await?;

    Ok(Json(loans.into_iter().map(LoanResponse::from).collect()))
}

/// GET /users/:id/notifications/overdue - 延滞中の貸出（発生料金の射影付き）
pub async fn get_overdue(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<OverdueNoticeResponse>>, ApiError> {
    let user_id = UserId::new(user_id);
    let today = Utc::now().date_naive();

    let notices = overdue(&state.service_deps, &user_id, today).await?;

    Ok(Json(
        notices.into_iter().map(OverdueNoticeResponse::from).collect(),
    ))
}

/// GET /users/:id/fine - 利用者が負っている料金の合計
pub async fn get_total_fine(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<TotalFineResponse>, ApiError> {
    let user_id = UserId::new(user_id);
    let today = Utc::now().date_naive();

    let total_fine = total_fine_owed(&state.service_deps, &user_id, today).await?;

    Ok(Json(TotalFineResponse {
        user_id: user_id.value().to_string(),
        total_fine,
    }))
}

async fn ensure_user(deps: &ServiceDependencies, user_id: &UserId) -> Result<(), QueryError> {
    deps.users
        .get(user_id)
        .await
        .map_err(|e| QueryError::InternalError(e.to_string()))?
        .ok_or_else(|| QueryError::NotFound(format!("User {} not found", user_id)))?;
    Ok(())
}

// ============================================================================
// Error types
// ============================================================================

/// ストア直結のハンドラー用のエラー型
#[derive(Debug)]
pub enum QueryError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    InternalError(String),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            QueryError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            QueryError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            QueryError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            QueryError::InternalError(msg) => {
                // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                tracing::error!("Internal error in handler: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(super::types::ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
