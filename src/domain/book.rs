use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BookId;

/// 書籍レコード - カタログストアに永続化される
///
/// `available`は「この書籍を参照する未返却の貸出が存在しない」ことの
/// 導出フィールド。貸出エンジンの状態遷移関数の中でのみ書き換えられ、
/// 他のコンポーネントが直接セットすることはない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    pub description: String,
    pub cover_url: String,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// 新規書籍を登録可能（available = true）な状態で作成する
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        cover_url: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            category: category.into(),
            description: description.into(),
            cover_url: cover_url.into(),
            available: true,
            created_at,
        }
    }
}
