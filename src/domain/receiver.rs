/// 受給者（介護を受ける人）エンティティ
use serde::{Deserialize, Serialize};

use super::id::{RECEIVER_PREFIX, new_id};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receiver {
    pub receiver_id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Receiver {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            receiver_id: new_id(RECEIVER_PREFIX),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}
