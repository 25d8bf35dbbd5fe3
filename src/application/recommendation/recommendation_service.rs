use std::collections::{HashMap, HashSet};

use crate::application::ServiceDependencies;
use crate::domain::recommendation::{Candidate, ScoreWeights, TasteProfile, rank};
use crate::domain::{Book, BookId, UserId};

use super::errors::{RecommendationError, Result};

/// スコア付きの推薦書籍
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub book: Book,
    pub score: f64,
}

/// 利用者向けの推薦を作成する
///
/// カタログと台帳の最新スナップショットに対する読み取り専用の計算。
///
/// 候補集合：カタログ全体から、利用者のお気に入りと、利用者自身に
/// 現在貸出中の書籍を除いたもの。スコア降順・同点は書籍ID昇順で
/// 順位付けし、上位`limit`件を返す。適格な候補がなければ空列。
pub async fn recommend(
    deps: &ServiceDependencies,
    user_id: &UserId,
    limit: usize,
) -> Result<Vec<Recommendation>> {
    let user = deps
        .users
        .get(user_id)
        .await
        .map_err(RecommendationError::UserStoreError)?
        .ok_or(RecommendationError::UserNotFound)?;

    let books = deps
        .catalog
        .list()
        .await
        .map_err(RecommendationError::CatalogError)?;
    let by_id: HashMap<&BookId, &Book> = books.iter().map(|b| (&b.id, b)).collect();

    let history = deps
        .ledger
        .find_by_user(user_id)
        .await
        .map_err(RecommendationError::LedgerError)?;
    let issued_to_self: HashSet<BookId> = deps
        .ledger
        .open_by_user(user_id)
        .await
        .map_err(RecommendationError::LedgerError)?
        .into_iter()
        .map(|l| l.book_id)
        .collect();
    let issue_counts = deps
        .ledger
        .issue_counts()
        .await
        .map_err(RecommendationError::LedgerError)?;
    // 人気度はカタログ全体の最大貸出回数で正規化する
    let max_times_issued = issue_counts.values().copied().max().unwrap_or(0);

    // 削除済み書籍の履歴はカテゴリ解決できないが分母には残す
    let favorite_categories = user
        .favorites
        .iter()
        .filter_map(|id| by_id.get(id).map(|b| b.category.clone()));
    let history_categories = history
        .iter()
        .filter_map(|l| by_id.get(&l.book_id).map(|b| b.category.clone()));
    let profile = TasteProfile::new(favorite_categories, history_categories, history.len());

    let candidates: Vec<Candidate> = books
        .iter()
        .filter(|b| !user.is_favorite(&b.id) && !issued_to_self.contains(&b.id))
        .map(|b| Candidate {
            book_id: b.id.clone(),
            category: b.category.clone(),
            times_issued: issue_counts.get(&b.id).copied().unwrap_or(0),
        })
        .collect();

    let ranked = rank(
        &profile,
        candidates,
        max_times_issued,
        &ScoreWeights::default(),
        limit,
    );

    Ok(ranked
        .into_iter()
        .filter_map(|r| {
            by_id.get(&r.book_id).map(|b| Recommendation {
                book: (*b).clone(),
                score: r.score,
            })
        })
        .collect())
}
