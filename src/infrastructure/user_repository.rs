/// ユーザーテーブルのリポジトリ
///
/// テーブル構成: パーティションキー`user_id`、GSI`email-index`（パーティションキー`email`）
use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::types::AttributeValue;

use super::dynamo_item::{Item, required_s};
use super::repository_error::RepositoryError;
use crate::domain::User;

/// メールアドレス検索用GSI名
pub const EMAIL_INDEX: &str = "email-index";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを保存
    async fn create_user(&self, user: &User) -> Result<(), RepositoryError>;

    /// IDでユーザーを取得
    ///
    /// # 戻り値
    /// * 見つかった場合は`Ok(Some(User))`
    /// * 見つからなかった場合は`Ok(None)`
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, RepositoryError>;

    /// メールアドレスでユーザーを検索（招待時に使用）
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct DynamoUserRepository {
    client: DynamoDbClient,
    table_name: String,
}

impl DynamoUserRepository {
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    fn from_item(item: &Item) -> Result<User, RepositoryError> {
        Ok(User {
            user_id: required_s(item, "user_id")?,
            email: required_s(item, "email")?,
            first_name: required_s(item, "first_name")?,
            last_name: required_s(item, "last_name")?,
        })
    }
}

#[async_trait]
impl UserRepository for DynamoUserRepository {
    async fn create_user(&self, user: &User) -> Result<(), RepositoryError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("user_id", AttributeValue::S(user.user_id.clone()))
            .item("email", AttributeValue::S(user.email.clone()))
            .item("first_name", AttributeValue::S(user.first_name.clone()))
            .item("last_name", AttributeValue::S(user.last_name.clone()))
            .condition_expression("attribute_not_exists(user_id)")
            .send()
            .await
            .map_err(|e| RepositoryError::WriteError(e.into_service_error().to_string()))?;

        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, RepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| RepositoryError::ReadError(e.into_service_error().to_string()))?;

        result.item.as_ref().map(Self::from_item).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(EMAIL_INDEX)
            .key_condition_expression("email = :email")
            .expression_attribute_values(":email", AttributeValue::S(email.to_string()))
            .limit(1)
            .send()
            .await
            .map_err(|e| RepositoryError::ReadError(e.into_service_error().to_string()))?;

        result
            .items()
            .first()
            .map(Self::from_item)
            .transpose()
    }
}
