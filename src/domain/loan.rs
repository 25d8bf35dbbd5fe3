use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{BookId, BookIssued, BookReturned, LoanId, ReturnBookError, UserId};

/// 貸出ポリシー
///
/// 貸出期間と延滞料金レートは設定可能。既定は14日・1通貨単位/日。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LendingPolicy {
    /// 貸出期間（日数）
    pub loan_period_days: i64,
    /// 延滞1日あたりの料金（通貨単位）
    pub fine_per_day: i64,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: 14,
            fine_per_day: 1,
        }
    }
}

/// 貸出レコード - 貸出台帳に永続化される
///
/// 貸出台帳がライフサイクルを排他的に所有する。返却時に閉じられる
/// （returned_onがセットされる）だけで、物理削除は行わない。
/// 履歴表示と延滞料金の監査のために保持される。
///
/// 不変条件：1冊の書籍につき未返却（open）の貸出は高々1件。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub book_id: BookId,
    pub user_id: UserId,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    /// 未返却の間はNone
    pub returned_on: Option<NaiveDate>,
    /// 確定した延滞料金。未返却または期限内返却なら0
    pub fine: i64,
}

impl Loan {
    /// 未返却（open）かどうか
    pub fn is_open(&self) -> bool {
        self.returned_on.is_none()
    }
}

/// 純粋関数：書籍を貸し出す
///
/// 返却期限 = 貸出日 + 貸出期間。副作用なし。
/// 新しいLoanとイベントを返す。
pub fn issue_loan(
    book_id: BookId,
    user_id: UserId,
    issue_date: NaiveDate,
    policy: &LendingPolicy,
) -> (Loan, BookIssued) {
    let loan_id = LoanId::new();
    let due_date = issue_date + Duration::days(policy.loan_period_days);

    let loan = Loan {
        id: loan_id,
        book_id: book_id.clone(),
        user_id: user_id.clone(),
        issue_date,
        due_date,
        returned_on: None,
        fine: 0,
    };

    let event = BookIssued {
        loan_id,
        book_id,
        user_id,
        issue_date,
        due_date,
    };

    (loan, event)
}

/// 純粋関数：書籍を返却する
///
/// ビジネスルール：
/// - 延滞していても返却は受け付ける
/// - 延滞料金 = max(0, 返却日 - 返却期限) × レート（日単位切り捨てなしの暦日差）
/// - 既に返却済みの貸出は再度閉じられない
///
/// 副作用なし。閉じたLoanとイベントを返す。
pub fn close_loan(
    loan: &Loan,
    returned_on: NaiveDate,
    policy: &LendingPolicy,
) -> Result<(Loan, BookReturned), ReturnBookError> {
    if loan.returned_on.is_some() {
        return Err(ReturnBookError::AlreadyReturned);
    }
    if returned_on < loan.issue_date {
        return Err(ReturnBookError::ReturnedBeforeIssued);
    }

    let fine = fine_for(loan.due_date, returned_on, policy.fine_per_day);

    let closed = Loan {
        returned_on: Some(returned_on),
        fine,
        ..loan.clone()
    };

    let event = BookReturned {
        loan_id: loan.id,
        book_id: loan.book_id.clone(),
        user_id: loan.user_id.clone(),
        returned_on,
        fine,
    };

    Ok((closed, event))
}

/// 純粋関数：延滞料金を計算する
///
/// 暦日の丸ごとの差で計算し、負にはならない（期限当日の返却は0）。
pub fn fine_for(due_date: NaiveDate, returned_on: NaiveDate, fine_per_day: i64) -> i64 {
    let days_late = (returned_on - due_date).num_days().max(0);
    days_late * fine_per_day
}

/// 純粋関数：延滞判定
///
/// 未返却かつ基準日が返却期限を過ぎていれば延滞。
pub fn is_overdue(loan: &Loan, as_of: NaiveDate) -> bool {
    loan.is_open() && as_of > loan.due_date
}

/// 純粋関数：返却期限が近いか
///
/// 未返却で、返却期限までの残り日数が 0 以上 within_days 以下。
/// 既に延滞しているものは含まない。
pub fn is_due_within(loan: &Loan, today: NaiveDate, within_days: i64) -> bool {
    if !loan.is_open() {
        return false;
    }
    let remaining = (loan.due_date - today).num_days();
    (0..=within_days).contains(&remaining)
}

/// 純粋関数：延滞中なら発生している料金を射影する
///
/// 台帳は書き換えない読み取り専用の計算。料金が確定・永続化されるのは
/// 実際の返却時のみ。閉じた貸出には確定済みの料金をそのまま返す。
pub fn projected_fine(loan: &Loan, as_of: NaiveDate, policy: &LendingPolicy) -> i64 {
    match loan.returned_on {
        Some(_) => loan.fine,
        None => fine_for(loan.due_date, as_of, policy.fine_per_day),
    }
}

/// 純粋関数：延滞中の貸出の遅延列
///
/// 基準日時点で延滞しているopenな貸出のみを通す。有限・再実行可能で、
/// 呼び出し間にカーソル状態を持たない。
pub fn overdue_loans<'a, I>(loans: I, as_of: NaiveDate) -> impl Iterator<Item = &'a Loan>
where
    I: IntoIterator<Item = &'a Loan>,
{
    loans.into_iter().filter(move |l| is_overdue(l, as_of))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn policy() -> LendingPolicy {
        LendingPolicy::default()
    }

    #[test]
    fn test_issue_loan_sets_due_date_from_policy() {
        let issued_on = date(2024, 3, 1);
        let (loan, event) = issue_loan(
            BookId::new("B001"),
            UserId::new("alice@example.com"),
            issued_on,
            &policy(),
        );

        assert_eq!(loan.due_date, date(2024, 3, 15));
        assert!(loan.is_open());
        assert_eq!(loan.fine, 0);

        assert_eq!(event.loan_id, loan.id);
        assert_eq!(event.book_id, loan.book_id);
        assert_eq!(event.due_date, loan.due_date);
    }

    #[test]
    fn test_issue_loan_honors_configured_period() {
        let custom = LendingPolicy {
            loan_period_days: 7,
            fine_per_day: 1,
        };
        let (loan, _) = issue_loan(
            BookId::new("B001"),
            UserId::new("alice@example.com"),
            date(2024, 3, 1),
            &custom,
        );
        assert_eq!(loan.due_date, date(2024, 3, 8));
    }

    #[test]
    fn test_close_loan_on_time_has_zero_fine() {
        let (loan, _) = issue_loan(
            BookId::new("B001"),
            UserId::new("alice@example.com"),
            date(2024, 3, 1),
            &policy(),
        );
        // 期限当日ちょうどの返却は延滞0
        let (closed, event) = close_loan(&loan, loan.due_date, &policy()).unwrap();
        assert_eq!(closed.returned_on, Some(loan.due_date));
        assert_eq!(closed.fine, 0);
        assert_eq!(event.fine, 0);
    }

    #[test]
    fn test_close_loan_late_accrues_fine_per_day() {
        let rate2 = LendingPolicy {
            loan_period_days: 14,
            fine_per_day: 2,
        };
        let issued_on = date(2024, 3, 1);
        let (loan, _) = issue_loan(
            BookId::new("B003"),
            UserId::new("alice@example.com"),
            issued_on,
            &rate2,
        );
        // 14日貸出を20日目に返却 → 6日延滞 × 2/日 = 12
        let (closed, event) = close_loan(&loan, issued_on + Duration::days(20), &rate2).unwrap();
        assert_eq!(closed.fine, 12);
        assert_eq!(event.fine, 12);
        assert!(!closed.is_open());
    }

    #[test]
    fn test_close_loan_fails_when_already_returned() {
        let (loan, _) = issue_loan(
            BookId::new("B001"),
            UserId::new("alice@example.com"),
            date(2024, 3, 1),
            &policy(),
        );
        let (closed, _) = close_loan(&loan, date(2024, 3, 10), &policy()).unwrap();

        let result = close_loan(&closed, date(2024, 3, 11), &policy());
        assert_eq!(result.unwrap_err(), ReturnBookError::AlreadyReturned);
        // 確定済みの料金は変わらない（冪等）
        assert_eq!(closed.fine, 0);
    }

    #[test]
    fn test_close_loan_rejects_return_before_issue() {
        let (loan, _) = issue_loan(
            BookId::new("B001"),
            UserId::new("alice@example.com"),
            date(2024, 3, 10),
            &policy(),
        );
        let result = close_loan(&loan, date(2024, 3, 9), &policy());
        assert_eq!(result.unwrap_err(), ReturnBookError::ReturnedBeforeIssued);
    }

    #[test]
    fn test_fine_is_monotone_in_lateness() {
        let due = date(2024, 3, 15);
        let mut previous = fine_for(due, date(2024, 3, 10), 2);
        for offset in -4..10 {
            let current = fine_for(due, due + Duration::days(offset), 2);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_fine_is_zero_on_or_before_due_date() {
        let due = date(2024, 3, 15);
        assert_eq!(fine_for(due, date(2024, 3, 1), 2), 0);
        assert_eq!(fine_for(due, due, 2), 0);
        assert_eq!(fine_for(due, date(2024, 3, 16), 2), 2);
    }

    #[test]
    fn test_is_overdue_only_after_due_date_while_open() {
        let (loan, _) = issue_loan(
            BookId::new("B001"),
            UserId::new("alice@example.com"),
            date(2024, 3, 1),
            &policy(),
        );
        assert!(!is_overdue(&loan, loan.due_date));
        assert!(is_overdue(&loan, loan.due_date + Duration::days(1)));

        let (closed, _) = close_loan(&loan, date(2024, 3, 20), &policy()).unwrap();
        assert!(!is_overdue(&closed, date(2024, 4, 1)));
    }

    #[test]
    fn test_is_due_within_window() {
        let (loan, _) = issue_loan(
            BookId::new("B001"),
            UserId::new("alice@example.com"),
            date(2024, 3, 1),
            &policy(),
        );
        // 期限は3/15。3/12から3日以内 → 該当
        assert!(is_due_within(&loan, date(2024, 3, 12), 3));
        // 期限当日も該当（残り0日）
        assert!(is_due_within(&loan, date(2024, 3, 15), 3));
        // まだ遠い
        assert!(!is_due_within(&loan, date(2024, 3, 1), 3));
        // 既に延滞しているものは含まない
        assert!(!is_due_within(&loan, date(2024, 3, 16), 3));
    }

    #[test]
    fn test_projected_fine_for_open_overdue_loan() {
        let rate2 = LendingPolicy {
            loan_period_days: 14,
            fine_per_day: 2,
        };
        let (loan, _) = issue_loan(
            BookId::new("B001"),
            UserId::new("alice@example.com"),
            date(2024, 3, 1),
            &rate2,
        );
        assert_eq!(projected_fine(&loan, date(2024, 3, 10), &rate2), 0);
        assert_eq!(projected_fine(&loan, date(2024, 3, 18), &rate2), 6);
    }

    #[test]
    fn test_projected_fine_uses_persisted_fine_once_closed() {
        let rate2 = LendingPolicy {
            loan_period_days: 14,
            fine_per_day: 2,
        };
        let (loan, _) = issue_loan(
            BookId::new("B001"),
            UserId::new("alice@example.com"),
            date(2024, 3, 1),
            &rate2,
        );
        let (closed, _) = close_loan(&loan, date(2024, 3, 18), &rate2).unwrap();
        // 閉じた後は基準日をいくら進めても確定値のまま
        assert_eq!(projected_fine(&closed, date(2024, 12, 31), &rate2), 6);
    }

    #[test]
    fn test_overdue_loans_filters_open_past_due() {
        let p = policy();
        let (open_late, _) = issue_loan(
            BookId::new("B001"),
            UserId::new("alice@example.com"),
            date(2024, 3, 1),
            &p,
        );
        let (open_on_time, _) = issue_loan(
            BookId::new("B002"),
            UserId::new("alice@example.com"),
            date(2024, 3, 20),
            &p,
        );
        let (late, _) = issue_loan(
            BookId::new("B003"),
            UserId::new("alice@example.com"),
            date(2024, 3, 1),
            &p,
        );
        let (closed, _) = close_loan(&late, date(2024, 3, 25), &p).unwrap();

        let loans = vec![open_late.clone(), open_on_time, closed];
        let as_of = date(2024, 3, 25);

        let overdue: Vec<_> = overdue_loans(&loans, as_of).collect();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, open_late.id);

        // 再実行しても同じ結果（カーソル状態を持たない）
        let again: Vec<_> = overdue_loans(&loans, as_of).collect();
        assert_eq!(again.len(), 1);
    }
}
