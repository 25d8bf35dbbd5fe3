#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use smart_library::adapters::memory::{MemoryCatalogStore, MemoryLoanLedger, MemoryUserStore};
use smart_library::application::ServiceDependencies;
use smart_library::domain::loan::LendingPolicy;
use smart_library::domain::{Actor, Book, BookId, Role, User, UserId};
use std::sync::Arc;

/// テスト用のサービス依存関係を構築する
///
/// 全ストアをインメモリ実装で構成する。データベース不要で、
/// 各テストは独立した状態から始まる。
pub fn setup_deps(policy: LendingPolicy) -> ServiceDependencies {
    ServiceDependencies::new(
        Arc::new(MemoryCatalogStore::new()),
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryLoanLedger::new()),
        policy,
    )
}

/// デフォルトポリシー（14日・1通貨単位/日）でのセットアップ
pub fn setup_default_deps() -> ServiceDependencies {
    setup_deps(LendingPolicy::default())
}

/// カタログに書籍を直接投入する
pub async fn seed_book(deps: &ServiceDependencies, id: &str, title: &str, category: &str) {
    let book = Book::new(
        BookId::new(id),
        title,
        "Author",
        category,
        "",
        "",
        Utc::now(),
    );
    deps.catalog.insert(book).await.expect("Failed to seed book");
}

/// ユーザーストアに利用者を直接投入する
pub async fn seed_user(deps: &ServiceDependencies, email: &str, role: Role) -> UserId {
    let user_id = UserId::new(email);
    let user = User::new(user_id.clone(), email, role, "hash", Utc::now());
    deps.users.insert(user).await.expect("Failed to seed user");
    user_id
}

/// 職員の操作主体
pub fn librarian() -> Actor {
    Actor::new(UserId::new("staff@library.example"), Role::Librarian)
}

/// 学生の操作主体
pub fn student(email: &str) -> Actor {
    Actor::new(UserId::new(email), Role::Student)
}

/// 日付リテラルのショートハンド
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("Invalid date")
}
