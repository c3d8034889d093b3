/// 介護イベントテーブルのリポジトリ
///
/// テーブル構成: パーティションキー`receiver_id`、ソートキー`event_id`
/// 属性: `user_id`、`timestamp`、`type`、`weight`（N、体重のみ）、`note`（任意）
use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::types::AttributeValue;

use super::dynamo_item::{Item, Page, optional_n, optional_s, query_all_pages, required_s};
use super::repository_error::RepositoryError;
use crate::domain::{EventEntry, EventKind, EventPayload};

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn put_event(&self, event: &EventEntry) -> Result<(), RepositoryError>;

    /// 受給者に記録されたすべてのイベントを取得
    async fn get_events(&self, receiver_id: &str) -> Result<Vec<EventEntry>, RepositoryError>;

    /// (receiver_id, event_id)でイベントを削除（存在しない場合も成功）
    async fn delete_event(&self, receiver_id: &str, event_id: &str) -> Result<(), RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct DynamoEventRepository {
    client: DynamoDbClient,
    table_name: String,
}

impl DynamoEventRepository {
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    fn to_item(event: &EventEntry) -> Item {
        let mut item = Item::new();
        item.insert("receiver_id".to_string(), AttributeValue::S(event.receiver_id.clone()));
        item.insert("event_id".to_string(), AttributeValue::S(event.event_id.clone()));
        item.insert("user_id".to_string(), AttributeValue::S(event.user_id.clone()));
        item.insert("timestamp".to_string(), AttributeValue::S(event.timestamp.clone()));
        item.insert("type".to_string(), AttributeValue::S(event.kind().name().to_string()));

        if let Some(weight) = event.payload.weight() {
            item.insert("weight".to_string(), AttributeValue::N(weight.to_string()));
        }
        if let Some(note) = &event.note {
            item.insert("note".to_string(), AttributeValue::S(note.clone()));
        }

        item
    }

    fn from_item(item: &Item) -> Result<EventEntry, RepositoryError> {
        let kind_name = required_s(item, "type")?;
        let kind = EventKind::from_name(&kind_name)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
        let payload = EventPayload::from_stored(kind, optional_n(item, "weight")?)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        Ok(EventEntry {
            event_id: required_s(item, "event_id")?,
            receiver_id: required_s(item, "receiver_id")?,
            user_id: required_s(item, "user_id")?,
            timestamp: required_s(item, "timestamp")?,
            payload,
            note: optional_s(item, "note"),
        })
    }
}

#[async_trait]
impl EventRepository for DynamoEventRepository {
    async fn put_event(&self, event: &EventEntry) -> Result<(), RepositoryError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(Self::to_item(event)))
            .condition_expression("attribute_not_exists(event_id)")
            .send()
            .await
            .map_err(|e| RepositoryError::WriteError(e.into_service_error().to_string()))?;

        Ok(())
    }

    async fn get_events(&self, receiver_id: &str) -> Result<Vec<EventEntry>, RepositoryError> {
        let items = query_all_pages(|start_key| async move {
            let output = self
                .client
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("receiver_id = :rid")
                .expression_attribute_values(":rid", AttributeValue::S(receiver_id.to_string()))
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

    async fn delete_event(&self, receiver_id: &str, event_id: &str) -> Result<(), RepositoryError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("receiver_id", AttributeValue::S(receiver_id.to_string()))
            .key("event_id", AttributeValue::S(event_id.to_string()))
            .send()
            .await
            .map_err(|e| RepositoryError::WriteError(e.into_service_error().to_string()))?;

        Ok(())
    }
}
