/// 受給者テーブルのリポジトリ
///
/// テーブル構成: パーティションキー`receiver_id`
use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::types::AttributeValue;

use super::dynamo_item::{Item, required_s};
use super::repository_error::RepositoryError;
use crate::domain::Receiver;

#[async_trait]
pub trait ReceiverRepository: Send + Sync {
    async fn create_receiver(&self, receiver: &Receiver) -> Result<(), RepositoryError>;

    /// 見つからなかった場合は`Ok(None)`
    async fn get_receiver(&self, receiver_id: &str) -> Result<Option<Receiver>, RepositoryError>;

    /// 受給者を削除（存在しない場合も成功）
    async fn delete_receiver(&self, receiver_id: &str) -> Result<(), RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct DynamoReceiverRepository {
    client: DynamoDbClient,
    table_name: String,
}

impl DynamoReceiverRepository {
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    fn from_item(item: &Item) -> Result<Receiver, RepositoryError> {
        Ok(Receiver {
            receiver_id: required_s(item, "receiver_id")?,
            first_name: required_s(item, "first_name")?,
            last_name: required_s(item, "last_name")?,
        })
    }
}

#[async_trait]
impl ReceiverRepository for DynamoReceiverRepository {
    async fn create_receiver(&self, receiver: &Receiver) -> Result<(), RepositoryError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("receiver_id", AttributeValue::S(receiver.receiver_id.clone()))
            .item("first_name", AttributeValue::S(receiver.first_name.clone()))
            .item("last_name", AttributeValue::S(receiver.last_name.clone()))
            .condition_expression("attribute_not_exists(receiver_id)")
            .send()
            .await
            .map_err(|e| RepositoryError::WriteError(e.into_service_error().to_string()))?;

        Ok(())
    }

    async fn get_receiver(&self, receiver_id: &str) -> Result<Option<Receiver>, RepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("receiver_id", AttributeValue::S(receiver_id.to_string()))
            .send()
            .await
            .map_err(|e| RepositoryError::ReadError(e.into_service_error().to_string()))?;

        result.item.as_ref().map(Self::from_item).transpose()
    }

    async fn delete_receiver(&self, receiver_id: &str) -> Result<(), RepositoryError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("receiver_id", AttributeValue::S(receiver_id.to_string()))
            .send()
            .await
            .map_err(|e| RepositoryError::WriteError(e.into_service_error().to_string()))?;

        Ok(())
    }
}
