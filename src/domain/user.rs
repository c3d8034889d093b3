/// ユーザーエンティティ
use serde::{Deserialize, Serialize};

use super::id::{USER_PREFIX, new_id};

/// 介護者として登録されたユーザー
///
/// IDは作成後に変更されない。受給者との関係は`Relationship`で管理する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    /// 新しいIDを採番してユーザーを作成
    pub fn new(email: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            user_id: new_id(USER_PREFIX),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}
