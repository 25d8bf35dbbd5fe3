//! フラットファイルJSON永続化
//!
//! 小規模デプロイ向けのアダプタ。書籍・利用者・貸出をそれぞれ
//! `books.json` / `users.json` / `loans.json` に保持する。
//! 各ストアは自分のファイルへのアクセスを非同期ミューテックスで
//! 直列化する。

pub mod catalog_store;
pub mod loan_ledger;
pub mod user_store;

pub use catalog_store::JsonFileCatalogStore;
pub use loan_ledger::JsonFileLoanLedger;
pub use user_store::JsonFileUserStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ファイルからレコード列を読み込む（未作成なら空）
pub(crate) async fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(Box::new(e)),
    }
}

/// レコード列をファイルに書き戻す
pub(crate) async fn save_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    let json = serde_json::to_vec_pretty(records)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
