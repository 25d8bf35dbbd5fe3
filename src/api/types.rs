use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::notifications::OverdueNotice;
use crate::application::recommendation::Recommendation;
use crate::domain::commands::{AddBook, IssueBook};
use crate::domain::{Actor, Book, BookId, Loan, Role, User, UserId};

// ============================================================================
// Requests
// ============================================================================

/// 操作主体（認証層が付与する user_id とロール）
///
/// DELETEやGETではクエリパラメータとして渡される。
#[derive(Debug, Deserialize)]
pub struct ActorParams {
    pub user_id: String,
    pub role: Role,
}

impl ActorParams {
    pub fn to_actor(&self) -> Actor {
        Actor::new(UserId::new(&self.user_id), self.role)
    }
}

/// 書籍追加リクエスト（POST /books）
#[derive(Debug, Deserialize)]
pub struct AddBookRequest {
    pub actor: ActorParams,
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_url: String,
}

impl AddBookRequest {
    pub fn to_command(&self) -> AddBook {
        AddBook {
            book_id: BookId::new(&self.id),
            title: self.title.clone(),
            author: self.author.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            cover_url: self.cover_url.clone(),
        }
    }
}

/// 貸出リクエスト（POST /books/:id/issue）
///
/// issue_dateを省略すると今日の日付が使われる。
#[derive(Debug, Deserialize)]
pub struct IssueBookRequest {
    pub user_id: String,
    pub issue_date: Option<NaiveDate>,
}

impl IssueBookRequest {
    pub fn to_command(&self, book_id: BookId) -> IssueBook {
        IssueBook {
            book_id,
            user_id: UserId::new(&self.user_id),
            issue_date: self.issue_date.unwrap_or_else(|| Utc::now().date_naive()),
        }
    }
}

/// 返却リクエスト（POST /books/:id/return）
#[derive(Debug, Deserialize)]
pub struct ReturnBookRequest {
    pub return_date: Option<NaiveDate>,
}

/// 利用者登録リクエスト（POST /users）
///
/// password_hashは認証層で計算済みの不透明な値。コアは保持するだけ。
#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password_hash: String,
}

/// 延滞一覧のクエリパラメータ（GET /loans/overdue）
#[derive(Debug, Deserialize)]
pub struct OverdueQuery {
    pub as_of: Option<NaiveDate>,
}

/// 推薦のクエリパラメータ（GET /users/:id/recommendations）
#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub limit: Option<usize>,
}

/// 期限間近一覧のクエリパラメータ（GET /users/:id/notifications/due-soon）
#[derive(Debug, Deserialize)]
pub struct DueSoonQuery {
    pub within_days: Option<i64>,
}

// ============================================================================
// Responses
// ============================================================================

/// 書籍レスポンス
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub description: String,
    pub cover_url: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.value().to_string(),
            title: book.title,
            author: book.author,
            category: book.category,
            description: book.description,
            cover_url: book.cover_url,
            available: book.available,
            created_at: book.created_at,
        }
    }
}

/// 貸出レスポンス
#[derive(Debug, Serialize)]
pub struct LoanResponse {
    pub loan_id: Uuid,
    pub book_id: String,
    pub user_id: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub returned_on: Option<NaiveDate>,
    pub fine: i64,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            loan_id: loan.id.value(),
            book_id: loan.book_id.value().to_string(),
            user_id: loan.user_id.value().to_string(),
            issue_date: loan.issue_date,
            due_date: loan.due_date,
            returned_on: loan.returned_on,
            fine: loan.fine,
        }
    }
}

/// 貸出作成レスポンス（POST /books/:id/issue）
#[derive(Debug, Serialize)]
pub struct LoanCreatedResponse {
    pub loan_id: Uuid,
    pub book_id: String,
    pub user_id: String,
    pub due_date: NaiveDate,
}

/// 返却レスポンス（POST /books/:id/return）
#[derive(Debug, Serialize)]
pub struct BookReturnedResponse {
    pub loan_id: Uuid,
    pub returned_on: NaiveDate,
    pub fine: i64,
}

/// 利用者レスポンス（password_hashは返さない）
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub favorites: Vec<String>,
    pub history: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.value().to_string(),
            name: user.name,
            role: user.role,
            favorites: user
                .favorites
                .into_iter()
                .map(|id| id.value().to_string())
                .collect(),
            history: user.history.into_iter().map(|id| id.value()).collect(),
            created_at: user.created_at,
        }
    }
}

/// 推薦レスポンス
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub score: f64,
    #[serde(flatten)]
    pub book: BookResponse,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(rec: Recommendation) -> Self {
        Self {
            score: rec.score,
            book: BookResponse::from(rec.book),
        }
    }
}

/// 延滞通知レスポンス
#[derive(Debug, Serialize)]
pub struct OverdueNoticeResponse {
    pub accrued_fine: i64,
    #[serde(flatten)]
    pub loan: LoanResponse,
}

impl From<OverdueNotice> for OverdueNoticeResponse {
    fn from(notice: OverdueNotice) -> Self {
        Self {
            accrued_fine: notice.accrued_fine,
            loan: LoanResponse::from(notice.loan),
        }
    }
}

/// 料金合計レスポンス（GET /users/:id/fine）
#[derive(Debug, Serialize)]
pub struct TotalFineResponse {
    pub user_id: String,
    pub total_fine: i64,
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
