/// フィードバック送信ハンドラー（POST /feedback）
///
/// メッセージを通知サービス向けにSQSキューへ送信する。
use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use serde::Deserialize;
use tracing::{error, info};

use super::handler_error::HandlerError;
use super::registry::Dependencies;
use super::response;
use super::validation::{RequestBody, ValidationError, decode_body, require};
use crate::infrastructure::FeedbackNotification;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedbackRequest {
    pub message: String,
}

impl RequestBody for FeedbackRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require("message", &self.message)
    }
}

pub async fn submit_feedback(
    deps: &Dependencies,
    request: &ApiGatewayProxyRequest,
) -> Result<ApiGatewayProxyResponse, HandlerError> {
    let body: FeedbackRequest =
        decode_body(request).inspect_err(|err| error!(error = %err, "リクエストボディの読み取りに失敗"))?;

    let Some(publisher) = deps.feedback.as_ref() else {
        error!("FEEDBACK_QUEUE_URLが未設定のためフィードバックを送信できない");
        return Err(HandlerError::Dependency("feedback queue not configured".to_string()));
    };

    let notification = FeedbackNotification::email(deps.config.feedback_email(), body.message);
    let message_id = publisher
        .publish(&notification)
        .await
        .inspect_err(|err| error!(error = %err, "フィードバックの送信に失敗"))?;

    info!(message_id = %message_id, "フィードバックを送信");
    Ok(response::success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::registry::tests::{Mocks, request};
    use crate::application::response::tests::JsonBody;
    use crate::infrastructure::PublishError;
    use serde_json::json;

    fn feedback_request(body: serde_json::Value) -> ApiGatewayProxyRequest {
        request(json!({
            "httpMethod": "POST",
            "resource": "/feedback",
            "body": body.to_string()
        }))
    }

    #[tokio::test]
    async fn test_submit_feedback_success() {
        let mocks = Mocks::new();
        let req = feedback_request(json!({"message": "The weight chart is great"}));

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body_json().unwrap(), json!({"status": "Success"}));

        let published = mocks.feedback.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].execution_data.email, "team@example.com");
        assert_eq!(published[0].execution_data.message, "The weight chart is great");
        assert_eq!(published[0].channel, vec!["email".to_string()]);
    }

    #[tokio::test]
    async fn test_submit_feedback_empty_message() {
        let mocks = Mocks::new();
        let req = feedback_request(json!({"message": "  "}));

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 400);
        assert!(mocks.feedback.published().is_empty());
    }

    #[tokio::test]
    async fn test_submit_feedback_unknown_field() {
        let mocks = Mocks::new();
        let req = feedback_request(json!({"message": "hi", "rating": 5}));

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn test_submit_feedback_publish_failure() {
        let mocks = Mocks::new();
        mocks
            .feedback
            .set_next_error(PublishError::AwsSdkError("throttled".to_string()));
        let req = feedback_request(json!({"message": "hi"}));

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(response.body_json().unwrap(), json!({"status": "Internal Server Error"}));
    }

    #[tokio::test]
    async fn test_submit_feedback_without_queue() {
        let mocks = Mocks::new();
        let mut deps = mocks.deps();
        deps.feedback = None;

        let result = submit_feedback(&deps, &feedback_request(json!({"message": "hi"}))).await;
        assert!(matches!(result, Err(HandlerError::Dependency(_))));
        assert!(mocks.feedback.published().is_empty());
    }
}
