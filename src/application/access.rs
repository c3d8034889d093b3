/// 介護者アクセス制御
///
/// 呼び出し元の関係を読み込み、受給者に対する権限を判定する。
use tracing::error;

use super::handler_error::HandlerError;
use super::registry::Dependencies;
use crate::domain::{Relationship, is_caregiver, is_primary_caregiver};

/// `user_id`の関係をすべて読み込む（失敗は500）
pub async fn load_relationships(deps: &Dependencies, user_id: &str) -> Result<Vec<Relationship>, HandlerError> {
    let relationships = deps
        .relationships
        .get_relationships_by_user(user_id)
        .await
        .inspect_err(|err| error!(user_id, error = %err, "関係の取得に失敗"))?;
    Ok(relationships)
}

/// `user_id`が`receiver_id`の介護者であることを要求する（違えば403）
pub async fn require_caregiver(deps: &Dependencies, user_id: &str, receiver_id: &str) -> Result<(), HandlerError> {
    let relationships = load_relationships(deps, user_id).await?;
    if !is_caregiver(&relationships, user_id, receiver_id) {
        error!(user_id, receiver_id, "ユーザーは受給者の介護者ではない");
        return Err(HandlerError::AccessDenied(format!(
            "user {} is not a caregiver for receiver {}",
            user_id, receiver_id
        )));
    }
    Ok(())
}

/// `user_id`が`receiver_id`の主介護者であることを要求する（違えば403）
pub async fn require_primary_caregiver(
    deps: &Dependencies,
    user_id: &str,
    receiver_id: &str,
) -> Result<(), HandlerError> {
    let relationship = deps
        .relationships
        .get_relationship(user_id, receiver_id)
        .await
        .inspect_err(|err| error!(user_id, receiver_id, error = %err, "関係の取得に失敗"))?;
    if !is_primary_caregiver(relationship.as_slice(), user_id, receiver_id) {
        error!(user_id, receiver_id, "ユーザーは受給者の主介護者ではない");
        return Err(HandlerError::AccessDenied(format!(
            "user {} is not the primary caregiver for receiver {}",
            user_id, receiver_id
        )));
    }
    Ok(())
}
