/// ユーザーと受給者の関係テーブルのリポジトリ
///
/// テーブル構成: パーティションキー`user_id`、ソートキー`receiver_id`
/// 属性: `primary_care_giver`（BOOL）、`email_notifications`（BOOL）
use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::types::AttributeValue;

use super::dynamo_item::{Item, Page, bool_or_false, query_all_pages, required_s};
use super::repository_error::{PutOutcome, RepositoryError};
use crate::domain::Relationship;

#[async_trait]
pub trait RelationshipRepository: Send + Sync {
    /// 関係を追加
    ///
    /// 同じ(user_id, receiver_id)の関係が既にあれば上書きせず`PutOutcome::AlreadyExists`を返す。
    async fn add_relationship(&self, relationship: &Relationship) -> Result<PutOutcome, RepositoryError>;

    async fn get_relationship(
        &self,
        user_id: &str,
        receiver_id: &str,
    ) -> Result<Option<Relationship>, RepositoryError>;

    /// ユーザーのすべての関係を取得
    async fn get_relationships_by_user(&self, user_id: &str) -> Result<Vec<Relationship>, RepositoryError>;

    async fn delete_relationship(&self, user_id: &str, receiver_id: &str) -> Result<(), RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct DynamoRelationshipRepository {
    client: DynamoDbClient,
    table_name: String,
}

impl DynamoRelationshipRepository {
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    fn from_item(item: &Item) -> Result<Relationship, RepositoryError> {
        Ok(Relationship {
            user_id: required_s(item, "user_id")?,
            receiver_id: required_s(item, "receiver_id")?,
            primary_care_giver: bool_or_false(item, "primary_care_giver"),
            email_notifications: bool_or_false(item, "email_notifications"),
        })
    }
}

#[async_trait]
impl RelationshipRepository for DynamoRelationshipRepository {
    async fn add_relationship(&self, relationship: &Relationship) -> Result<PutOutcome, RepositoryError> {
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .item("user_id", AttributeValue::S(relationship.user_id.clone()))
            .item("receiver_id", AttributeValue::S(relationship.receiver_id.clone()))
            .item("primary_care_giver", AttributeValue::Bool(relationship.primary_care_giver))
            .item("email_notifications", AttributeValue::Bool(relationship.email_notifications))
            .condition_expression("attribute_not_exists(user_id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(PutOutcome::Created),
            Err(err) => {
                let service_error = err.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    return Ok(PutOutcome::AlreadyExists);
                }
                Err(RepositoryError::WriteError(service_error.to_string()))
            }
        }
    }

    async fn get_relationship(
        &self,
        user_id: &str,
        receiver_id: &str,
    ) -> Result<Option<Relationship>, RepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(user_id.to_string()))
            .key("receiver_id", AttributeValue::S(receiver_id.to_string()))
            .send()
            .await
            .map_err(|e| RepositoryError::ReadError(e.into_service_error().to_string()))?;

        result.item.as_ref().map(Self::from_item).transpose()
    }

    async fn get_relationships_by_user(&self, user_id: &str) -> Result<Vec<Relationship>, RepositoryError> {
        let items = query_all_pages(|start_key| async move {
            let output = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("user_id = :uid")
                .expression_attribute_values(":uid", AttributeValue::S(user_id.to_string()))
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|e| RepositoryError::ReadError(e.into_service_error().to_string()))?;

            Ok::<_, RepositoryError>(Page {
                items: output.items.unwrap_or_default(),
                last_evaluated_key: output.last_evaluated_key,
            })
        })
        .await?;

        items.iter().map(Self::from_item).collect()
    }

    async fn delete_relationship(&self, user_id: &str, receiver_id: &str) -> Result<(), RepositoryError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(user_id.to_string()))
            .key("receiver_id", AttributeValue::S(receiver_id.to_string()))
            .send()
            .await
            .map_err(|e| RepositoryError::WriteError(e.into_service_error().to_string()))?;

        Ok(())
    }
}
