use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 書籍ID - カタログ上の一意な識別子
///
/// 図書館側で採番される文字列（例: "B003"）。不変。
/// 推薦結果の同点タイブレークに使うため辞書順で比較可能。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 利用者ID - メールアドレスを正規化（小文字化）したもの
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into().trim().to_lowercase())
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 貸出ID - 貸出台帳の集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(Uuid);

impl LoanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LoanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// 利用者ロール
///
/// 継承階層ではなく列挙型で表現し、特権操作ごとにチェックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Librarian,
    Other,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Librarian => "librarian",
            Role::Other => "other",
        }
    }

    /// 貸出を受けられるロールか
    ///
    /// 職員（Librarian）は貸出側であり、借り手にはなれない。
    pub fn can_borrow(&self) -> bool {
        !matches!(self, Role::Librarian)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "librarian" => Ok(Role::Librarian),
            "other" => Ok(Role::Other),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// 認証済みの操作主体
///
/// 認証自体は外部コラボレータ（UI/認証層）の責務。
/// コアは受け取った(user_id, role)のロール妥当性のみを検査する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_librarian(&self) -> bool {
        matches!(self.role, Role::Librarian)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_book_id_preserves_value() {
        let id = BookId::new("B003");
        assert_eq!(id.value(), "B003");
        assert!(!id.is_empty());
    }

    #[test]
    fn test_book_id_orders_lexicographically() {
        let a = BookId::new("B001");
        let b = BookId::new("B010");
        assert!(a < b);
    }

    #[test]
    fn test_user_id_normalizes_email() {
        let id = UserId::new("  Alice@Example.COM ");
        assert_eq!(id.value(), "alice@example.com");
    }

    #[test]
    fn test_loan_id_creation_is_unique() {
        let id1 = LoanId::new();
        let id2 = LoanId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_loan_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = LoanId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Student, Role::Librarian, Role::Other] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_role_from_str_rejects_unknown() {
        assert!(Role::from_str("admin").is_err());
    }

    #[test]
    fn test_librarian_cannot_borrow() {
        assert!(!Role::Librarian.can_borrow());
        assert!(Role::Student.can_borrow());
        assert!(Role::Other.can_borrow());
    }
}
