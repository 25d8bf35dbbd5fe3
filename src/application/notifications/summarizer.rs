use chrono::NaiveDate;

use crate::application::ServiceDependencies;
use crate::domain::{self, Loan, UserId};

use super::errors::{NotificationError, Result};

/// 延滞通知の1行
///
/// `accrued_fine`は基準日時点の料金の射影であり、台帳には書き込まれない。
/// 料金が永続化されるのは実際の返却時のみ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverdueNotice {
    pub loan: Loan,
    pub accrued_fine: i64,
}

async fn ensure_user_exists(deps: &ServiceDependencies, user_id: &UserId) -> Result<()> {
    deps.users
        .get(user_id)
        .await
        .map_err(NotificationError::UserStoreError)?
        .ok_or(NotificationError::UserNotFound)?;
    Ok(())
}

/// 返却期限が近い貸出の一覧
///
/// 利用者のopenな貸出のうち、`0 ≤ 返却期限 - 今日 ≤ within_days`のもの。
pub async fn due_soon(
    deps: &ServiceDependencies,
    user_id: &UserId,
    today: NaiveDate,
    within_days: i64,
) -> Result<Vec<Loan>> {
    if within_days < 0 {
        return Err(NotificationError::InvalidInput(
            "within_days must not be negative".to_string(),
        ));
    }
    ensure_user_exists(deps, user_id).await?;

    let open = deps
        .ledger
        .open_by_user(user_id)
        .await
        .map_err(NotificationError::LedgerError)?;
    Ok(open
        .into_iter()
        .filter(|l| domain::loan::is_due_within(l, today, within_days))
        .collect())
}

/// 延滞中の貸出の一覧（発生料金の射影付き）
pub async fn overdue(
    deps: &ServiceDependencies,
    user_id: &UserId,
    today: NaiveDate,
) -> Result<Vec<OverdueNotice>> {
    ensure_user_exists(deps, user_id).await?;

    let open = deps
        .ledger
        .open_by_user(user_id)
        .await
        .map_err(NotificationError::LedgerError)?;
    Ok(open
        .into_iter()
        .filter(|l| domain::loan::is_overdue(l, today))
        .map(|loan| {
            let accrued_fine = domain::loan::projected_fine(&loan, today, &deps.policy);
            OverdueNotice { loan, accrued_fine }
        })
        .collect())
}

/// 利用者が負っている料金の合計
///
/// 返却済み貸出の確定料金 + openで延滞中の貸出の射影料金。
pub async fn total_fine_owed(
    deps: &ServiceDependencies,
    user_id: &UserId,
    today: NaiveDate,
) -> Result<i64> {
    ensure_user_exists(deps, user_id).await?;

    let loans = deps
        .ledger
        .find_by_user(user_id)
        .await
        .map_err(NotificationError::LedgerError)?;
    Ok(loans
        .iter()
        .map(|l| domain::loan::projected_fine(l, today, &deps.policy))
        .sum())
}
