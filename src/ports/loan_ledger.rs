use crate::domain::loan::Loan;
use crate::domain::value_objects::{BookId, LoanId, UserId};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::collections::HashMap;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出台帳ポート
///
/// 貸出状態機械のシステム・オブ・レコード。レコードは返却時に
/// 閉じられるだけで物理削除されない（履歴・料金監査のため保持）。
///
/// 不変条件：1冊の書籍につきopenな貸出は高々1件。台帳実装は
/// この前提でクエリを提供する。
#[async_trait]
pub trait LoanLedger: Send + Sync {
    /// 貸出レコードを保存する（upsert）
    ///
    /// 新規貸出のINSERTにも、返却による更新にも使われる。
    /// 台帳は常に渡されたレコードの完全な状態を反映する。
    async fn save(&self, loan: Loan) -> Result<()>;

    /// IDで貸出を取得する
    async fn get(&self, loan_id: LoanId) -> Result<Option<Loan>>;

    /// 書籍のopenな貸出を取得する
    ///
    /// 不変条件により高々1件。
    async fn open_by_book(&self, book_id: &BookId) -> Result<Option<Loan>>;

    /// 利用者のopenな貸出を取得する
    async fn open_by_user(&self, user_id: &UserId) -> Result<Vec<Loan>>;

    /// 利用者の全貸出（履歴）を貸出日昇順で取得する
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Loan>>;

    /// 書籍ごとの累計貸出回数を取得する
    ///
    /// 推薦の人気度シグナルに使用される。
    async fn issue_counts(&self) -> Result<HashMap<BookId, u64>>;

    /// openな貸出をストリーム配信する
    ///
    /// 延滞一覧などの走査に使用される。読み取り専用で、呼び出し間に
    /// カーソル状態を持たない。
    fn stream_open(&self) -> BoxStream<'static, Result<Loan>>;
}
