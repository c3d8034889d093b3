/// ユーザーと受給者の関係
///
/// (user_id, receiver_id)の組ごとに高々1件。受給者作成時に主介護者の関係が1件作られ、
/// 招待によって主介護者でない関係が追加される。
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub user_id: String,
    pub receiver_id: String,
    pub primary_care_giver: bool,
    pub email_notifications: bool,
}

impl Relationship {
    /// 受給者登録者としての主介護者関係
    pub fn primary(user_id: impl Into<String>, receiver_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            receiver_id: receiver_id.into(),
            primary_care_giver: true,
            email_notifications: true,
        }
    }

    /// 招待による追加介護者関係
    pub fn additional(user_id: impl Into<String>, receiver_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            receiver_id: receiver_id.into(),
            primary_care_giver: false,
            email_notifications: true,
        }
    }

    /// この関係が指定した組に一致するか
    pub fn links(&self, user_id: &str, receiver_id: &str) -> bool {
        self.user_id == user_id && self.receiver_id == receiver_id
    }
}
