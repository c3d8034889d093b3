//! フィードバック通知モジュール
//!
//! アプリ利用者からのフィードバックを通知サービス向けのメッセージとして
//! SQSキューに送信する。

use async_trait::async_trait;
use aws_sdk_sqs::Client as SqsClient;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// 通知発行のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PublishError {
    #[error("AWS SQS APIエラー: {0}")]
    AwsSdkError(String),
    #[error("JSONシリアライズエラー: {0}")]
    SerializeError(String),
}

/// 通知サービスが受け取るメッセージ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackNotification {
    pub notification_type: String,
    pub channel: Vec<String>,
    pub execution_data: FeedbackExecutionData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackExecutionData {
    /// 通知の送信先
    pub email: String,
    pub message: String,
}

impl FeedbackNotification {
    /// メール通知用のフィードバックメッセージを作成
    pub fn email(recipient: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            notification_type: "feedback".to_string(),
            channel: vec!["email".to_string()],
            execution_data: FeedbackExecutionData {
                email: recipient.into(),
                message: message.into(),
            },
        }
    }
}

/// フィードバック発行トレイト（テスト用の抽象化）
#[async_trait]
pub trait FeedbackPublisher: Send + Sync {
    /// 通知を発行し、メッセージIDを返す
    async fn publish(&self, notification: &FeedbackNotification) -> Result<String, PublishError>;
}

/// SQSキューに送信する実装
pub struct SqsFeedbackPublisher {
    client: SqsClient,
    queue_url: String,
}

impl SqsFeedbackPublisher {
    pub fn new(client: SqsClient, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }
}

#[async_trait]
impl FeedbackPublisher for SqsFeedbackPublisher {
    async fn publish(&self, notification: &FeedbackNotification) -> Result<String, PublishError> {
        let message =
            serde_json::to_string(notification).map_err(|e| PublishError::SerializeError(e.to_string()))?;

        info!(
            queue_url = %self.queue_url,
            message_length = message.len(),
            "フィードバック通知送信開始"
        );

        let result = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(message)
            .send()
            .await;

        match result {
            Ok(response) => {
                let message_id = response.message_id().unwrap_or("unknown").to_string();
                info!(queue_url = %self.queue_url, message_id = %message_id, "フィードバック通知送信成功");
                Ok(message_id)
            }
            Err(err) => {
                warn!(queue_url = %self.queue_url, error = %err, "フィードバック通知送信エラー");
                Err(PublishError::AwsSdkError(err.to_string()))
            }
        }
    }
}
