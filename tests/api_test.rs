use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use smart_library::api::handlers::AppState;
use smart_library::api::router::create_router;
use smart_library::domain::Role;
use std::sync::Arc;
use tower::ServiceExt;

mod common;

use common::{seed_book, seed_user, setup_default_deps};

// ============================================================================
// APIテスト用のヘルパー関数
// ============================================================================

/// インメモリストアで構成したルーターを作る
fn setup_app() -> (axum::Router, smart_library::application::ServiceDependencies) {
    let deps = setup_default_deps();
    let app_state = Arc::new(AppState {
        service_deps: deps.clone(),
    });
    (create_router(app_state), deps)
}

async fn send_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Value,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response is not JSON")
    };
    (status, json)
}

async fn send(app: &axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response is not JSON")
    };
    (status, json)
}

// ============================================================================
// 貸出ライフサイクル
// ============================================================================

#[tokio::test]
async fn test_issue_and_return_via_api() {
    let (app, _deps) = setup_app();

    // 職員が書籍を登録
    let (status, book) = send_json(
        &app,
        "POST",
        "/books",
        json!({
            "actor": { "user_id": "staff@library.example", "role": "librarian" },
            "id": "B001",
            "title": "Dune",
            "author": "Frank Herbert",
            "category": "Sci-Fi"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["available"], json!(true));

    // 利用者を登録
    let (status, _) = send_json(
        &app,
        "POST",
        "/users",
        json!({
            "email": "Alice@Example.com",
            "name": "Alice",
            "role": "student",
            "password_hash": "hash"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // 貸出（メールアドレスは正規化される）
    let (status, loan) = send_json(
        &app,
        "POST",
        "/books/B001/issue",
        json!({ "user_id": "alice@example.com", "issue_date": "2026-03-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(loan["due_date"], json!("2026-03-15"));

    // 貸出中も書籍はカタログに残り、貸出不可として見える
    let (status, book) = send(&app, "GET", "/books/B001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["available"], json!(false));

    // 6日延滞して返却（デフォルトレート1/日）
    let (status, returned) = send_json(
        &app,
        "POST",
        "/books/B001/return",
        json!({ "return_date": "2026-03-21" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(returned["fine"], json!(6));

    let (_, book) = send(&app, "GET", "/books/B001").await;
    assert_eq!(book["available"], json!(true));
}

#[tokio::test]
async fn test_double_issue_returns_422() {
    let (app, deps) = setup_app();
    seed_book(&deps, "B001", "Dune", "Sci-Fi").await;
    seed_user(&deps, "alice@example.com", Role::Student).await;
    seed_user(&deps, "bob@example.com", Role::Student).await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/books/B001/issue",
        json!({ "user_id": "alice@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = send_json(
        &app,
        "POST",
        "/books/B001/issue",
        json!({ "user_id": "bob@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], json!("ALREADY_ISSUED"));
}

#[tokio::test]
async fn test_add_book_without_librarian_role_returns_403() {
    let (app, _deps) = setup_app();

    let (status, error) = send_json(
        &app,
        "POST",
        "/books",
        json!({
            "actor": { "user_id": "alice@example.com", "role": "student" },
            "id": "B001",
            "title": "Dune",
            "author": "Frank Herbert",
            "category": "Sci-Fi"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["error"], json!("FORBIDDEN"));
}

#[tokio::test]
async fn test_delete_book_in_use_returns_422() {
    let (app, deps) = setup_app();
    seed_book(&deps, "B001", "Dune", "Sci-Fi").await;
    seed_user(&deps, "alice@example.com", Role::Student).await;

    send_json(
        &app,
        "POST",
        "/books/B001/issue",
        json!({ "user_id": "alice@example.com" }),
    )
    .await;

    let (status, error) = send(
        &app,
        "DELETE",
        "/books/B001?user_id=staff@library.example&role=librarian",
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], json!("BOOK_IN_USE"));
}

#[tokio::test]
async fn test_return_without_open_loan_returns_404() {
    let (app, deps) = setup_app();
    seed_book(&deps, "B001", "Dune", "Sci-Fi").await;

    let (status, error) = send_json(&app, "POST", "/books/B001/return", json!({})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], json!("LOAN_NOT_FOUND"));
}

// ============================================================================
// 利用者・お気に入り・推薦
// ============================================================================

#[tokio::test]
async fn test_duplicate_registration_returns_409() {
    let (app, _deps) = setup_app();

    let body = json!({
        "email": "alice@example.com",
        "name": "Alice",
        "role": "student",
        "password_hash": "hash"
    });
    let (status, _) = send_json(&app, "POST", "/users", body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = send_json(&app, "POST", "/users", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"], json!("conflict"));
}

#[tokio::test]
async fn test_favorites_shape_recommendations() {
    let (app, deps) = setup_app();
    seed_book(&deps, "B001", "Emma", "Classic").await;
    seed_book(&deps, "B002", "Persuasion", "Classic").await;
    seed_book(&deps, "B003", "Dune", "Sci-Fi").await;
    seed_user(&deps, "alice@example.com", Role::Student).await;

    let (status, _) = send(
        &app,
        "POST",
        "/users/alice@example.com/favorites/B001",
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, recs) = send(
        &app,
        "GET",
        "/users/alice@example.com/recommendations?limit=2",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // お気に入りのB001は除外され、同カテゴリのB002が先頭に来る
    let ids: Vec<&str> = recs
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["B002", "B003"]);
}

#[tokio::test]
async fn test_favorite_unknown_book_returns_404() {
    let (app, deps) = setup_app();
    seed_user(&deps, "alice@example.com", Role::Student).await;

    let (status, _) = send(
        &app,
        "POST",
        "/users/alice@example.com/favorites/B999",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// 通知・延滞
// ============================================================================

#[tokio::test]
async fn test_overdue_listing_and_total_fine() {
    let (app, deps) = setup_app();
    seed_book(&deps, "B001", "Dune", "Sci-Fi").await;
    seed_user(&deps, "alice@example.com", Role::Student).await;

    send_json(
        &app,
        "POST",
        "/books/B001/issue",
        json!({ "user_id": "alice@example.com", "issue_date": "2026-03-01" }),
    )
    .await;

    // 期限3/15に対して基準日3/20：延滞1件
    let (status, overdue) = send(&app, "GET", "/loans/overdue?as_of=2026-03-20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overdue.as_array().unwrap().len(), 1);
    assert_eq!(overdue[0]["book_id"], json!("B001"));

    // 期限前の基準日なら空
    let (_, none) = send(&app, "GET", "/loans/overdue?as_of=2026-03-10").await;
    assert!(none.as_array().unwrap().is_empty());

    // 料金合計は今日を基準日とした射影なのでここでは件数のみ確認
    let (status, fine) = send(&app, "GET", "/users/alice@example.com/fine").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fine["user_id"], json!("alice@example.com"));
    assert!(fine["total_fine"].is_i64());
}

#[tokio::test]
async fn test_health_check() {
    let (app, _deps) = setup_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
