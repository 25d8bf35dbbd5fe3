use crate::domain::user::User;
use crate::domain::value_objects::{BookId, LoanId, UserId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ユーザーストアポート
///
/// 利用者・職員アカウントと、各利用者のお気に入り・貸出履歴を保持する。
/// 履歴は追記専用で、貸出エンジンの貸出処理からのみ追加される。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// IDで利用者を取得する
    async fn get(&self, user_id: &UserId) -> Result<Option<User>>;

    /// 新しい利用者レコードを登録する
    ///
    /// 呼び出し側がID重複の検査を済ませている。
    async fn insert(&self, user: User) -> Result<()>;

    /// お気に入りに書籍を追加する（既に存在する場合は何もしない）
    async fn add_favorite(&self, user_id: &UserId, book_id: &BookId) -> Result<()>;

    /// お気に入りから書籍を外す
    async fn remove_favorite(&self, user_id: &UserId, book_id: &BookId) -> Result<()>;

    /// 全利用者のお気に入りから書籍を取り除く
    ///
    /// 書籍削除時の参照クリーンアップに使用される。
    async fn remove_favorite_everywhere(&self, book_id: &BookId) -> Result<()>;

    /// 貸出履歴に貸出IDを追記する
    async fn append_history(&self, user_id: &UserId, loan_id: LoanId) -> Result<()>;
}
