use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, add_book, add_favorite, delete_book, get_book, get_due_soon, get_overdue,
    get_recommendations, get_total_fine, issue_book, list_books, list_overdue_loans,
    register_user, remove_favorite, return_book,
};

/// APIルーターを構築する
///
/// カタログ:
/// - GET    /books                    - カタログ一覧
/// - POST   /books                    - 書籍を追加（職員のみ）
/// - GET    /books/:id                - 書籍詳細
/// - DELETE /books/:id                - 書籍を削除（職員のみ）
///
/// 貸出:
/// - POST /books/:id/issue            - 書籍を貸し出す
/// - POST /books/:id/return           - 書籍を返却する
/// - GET  /loans/overdue              - 延滞中の貸出一覧
///
/// 利用者:
/// - POST   /users                                 - 利用者を登録
/// - POST   /users/:id/favorites/:book_id          - お気に入りに追加
/// - DELETE /users/:id/favorites/:book_id          - お気に入りから削除
/// - GET    /users/:id/recommendations             - 推薦
/// - GET    /users/:id/notifications/due-soon      - 期限間近の貸出
/// - GET    /users/:id/notifications/overdue       - 延滞中の貸出
/// - GET    /users/:id/fine                        - 料金の合計
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Catalog
        .route("/books", get(list_books).post(add_book))
        .route("/books/:id", get(get_book).delete(delete_book))
        // Lending
        .route("/books/:id/issue", post(issue_book))
        .route("/books/:id/return", post(return_book))
        .route("/loans/overdue", get(list_overdue_loans))
        // Users
        .route("/users", post(register_user))
        .route(
            "/users/:id/favorites/:book_id",
            post(add_favorite).delete(remove_favorite),
        )
        .route("/users/:id/recommendations", get(get_recommendations))
        .route("/users/:id/notifications/due-soon", get(get_due_soon))
        .route("/users/:id/notifications/overdue", get(get_overdue))
        .route("/users/:id/fine", get(get_total_fine))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
