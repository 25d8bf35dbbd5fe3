use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use super::BookId;

/// 推薦スコアの重み
///
/// 既定値：お気に入りカテゴリ一致 3、履歴カテゴリ割合 2、人気度 1。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub favorite_category: f64,
    pub history_category: f64,
    pub popularity: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            favorite_category: 3.0,
            history_category: 2.0,
            popularity: 1.0,
        }
    }
}

/// 利用者の嗜好プロファイル
///
/// お気に入り書籍のカテゴリ集合と、過去の貸出のカテゴリ分布。
/// 削除済み書籍の貸出はカテゴリ解決できないが、履歴件数（分母）には
/// 数え入れる。
#[derive(Debug, Clone, Default)]
pub struct TasteProfile {
    favorite_categories: HashSet<String>,
    history_total: usize,
    history_by_category: HashMap<String, usize>,
}

impl TasteProfile {
    /// お気に入りカテゴリと過去貸出のカテゴリ（解決できたもののみ）から構築
    ///
    /// `history_total`には解決できなかった貸出も含めた総件数を渡す。
    pub fn new<F, H>(favorite_categories: F, history_categories: H, history_total: usize) -> Self
    where
        F: IntoIterator<Item = String>,
        H: IntoIterator<Item = String>,
    {
        let mut history_by_category: HashMap<String, usize> = HashMap::new();
        for category in history_categories {
            *history_by_category.entry(category).or_insert(0) += 1;
        }
        Self {
            favorite_categories: favorite_categories.into_iter().collect(),
            history_total,
            history_by_category,
        }
    }
}

/// 推薦候補（カタログ＋台帳から組み立てられる読み取り専用ビュー）
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub book_id: BookId,
    pub category: String,
    /// この書籍がこれまでに貸出された総回数
    pub times_issued: u64,
}

/// スコア付きの推薦結果
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub book_id: BookId,
    pub score: f64,
}

/// 純粋関数：1冊分の推薦スコアを計算する
///
/// スコア = 重み付き和：
/// - favorite_category_match: 候補のカテゴリがお気に入りのカテゴリに含まれれば1、それ以外0
/// - history_category_match: 過去貸出のうち同カテゴリの割合（履歴が空なら0）
/// - popularity: 全体の最大貸出回数で正規化した貸出回数（最大が0なら0）
pub fn score(
    profile: &TasteProfile,
    candidate: &Candidate,
    max_times_issued: u64,
    weights: &ScoreWeights,
) -> f64 {
    let favorite_match = if profile.favorite_categories.contains(&candidate.category) {
        1.0
    } else {
        0.0
    };

    let history_match = if profile.history_total == 0 {
        0.0
    } else {
        let matching = profile
            .history_by_category
            .get(&candidate.category)
            .copied()
            .unwrap_or(0);
        matching as f64 / profile.history_total as f64
    };

    let popularity = if max_times_issued == 0 {
        0.0
    } else {
        candidate.times_issued as f64 / max_times_issued as f64
    };

    weights.favorite_category * favorite_match
        + weights.history_category * history_match
        + weights.popularity * popularity
}

/// 純粋関数：候補集合をスコア降順に順位付けする
///
/// 同点は書籍IDの辞書順（昇順）で決着し、実行間で再現可能な
/// 決定的順序を保証する。上位`limit`件を返す。
pub fn rank(
    profile: &TasteProfile,
    candidates: Vec<Candidate>,
    max_times_issued: u64,
    weights: &ScoreWeights,
    limit: usize,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|candidate| RankedCandidate {
            score: score(profile, &candidate, max_times_issued, weights),
            book_id: candidate.book_id,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.book_id.cmp(&b.book_id))
    });
    ranked.truncate(limit);
    ranked
}
