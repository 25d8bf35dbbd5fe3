pub mod lending;
pub mod notifications;
pub mod recommendation;

use crate::domain::loan::LendingPolicy;
use crate::ports::{CatalogStore, LoanLedger, UserStore};
use std::sync::Arc;

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。振る舞いは持たず、
/// 各ユースケース関数に依存関係として渡される。
///
/// `write_lock`は貸出エンジンのread-check-write列（貸出・返却・削除）を
/// 直列化し、「1冊につきopenな貸出は高々1件」の不変条件を守る。
/// 競合は低いためグローバルロックで足りる。推薦・通知の読み取りは
/// ロックを取らず、最新のコミット済みスナップショットに対して走る。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub catalog: Arc<dyn CatalogStore>,
    pub users: Arc<dyn UserStore>,
    pub ledger: Arc<dyn LoanLedger>,
    pub policy: LendingPolicy,
    pub(crate) write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl ServiceDependencies {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        users: Arc<dyn UserStore>,
        ledger: Arc<dyn LoanLedger>,
        policy: LendingPolicy,
    ) -> Self {
        Self {
            catalog,
            users,
            ledger,
            policy,
            write_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }
}
