/// 介護記録REST APIのLambdaエントリポイント
///
/// API Gatewayプロキシイベントを受け取り、ルートレジストリでハンドラーに振り分ける。
/// 依存関係はコールドスタート時に一度だけ構築し、ウォームスタートでは再利用する。
use std::sync::Arc;

use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use care_api::application::{Dependencies, ProxyRequestExt, Registry};
use care_api::infrastructure::{
    AppConfig, AwsClients, DynamoEventRepository, DynamoReceiverRepository, DynamoRelationshipRepository,
    DynamoUserRepository, FeedbackPublisher, SqsFeedbackPublisher, init_logging, load_sdk_config,
};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use tokio::sync::OnceCell;
use tracing::{Instrument, info, info_span, warn};

/// 初期化済みレジストリの静的インスタンス
static REGISTRY: OnceCell<Registry> = OnceCell::const_new();

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    let func = service_fn(handler);
    lambda_runtime::run(func).await?;
    Ok(())
}

/// レジストリを取得（初期化されていなければ初期化）
async fn get_registry() -> Result<&'static Registry, Error> {
    REGISTRY
        .get_or_try_init(|| async {
            let config = AppConfig::from_env()?;
            let sdk_config = load_sdk_config(&config).await;
            let clients = AwsClients::new(&sdk_config, &config);

            let feedback = config.feedback_queue_url().map(|queue_url| {
                Arc::new(SqsFeedbackPublisher::new(clients.sqs.clone(), queue_url)) as Arc<dyn FeedbackPublisher>
            });
            if feedback.is_none() {
                warn!("FEEDBACK_QUEUE_URLが未設定のためフィードバック送信は無効");
            }

            let deps = Dependencies {
                users: Arc::new(DynamoUserRepository::new(
                    clients.dynamodb.clone(),
                    config.user_table().to_string(),
                )),
                receivers: Arc::new(DynamoReceiverRepository::new(
                    clients.dynamodb.clone(),
                    config.receiver_table().to_string(),
                )),
                events: Arc::new(DynamoEventRepository::new(
                    clients.dynamodb.clone(),
                    config.event_table().to_string(),
                )),
                relationships: Arc::new(DynamoRelationshipRepository::new(
                    clients.dynamodb.clone(),
                    config.relationship_table().to_string(),
                )),
                feedback,
                config,
            };

            info!(env = deps.config.env(), local = deps.config.is_local(), "依存関係を初期化");
            Ok::<_, Error>(Registry::new(deps))
        })
        .await
}

/// Lambda関数のメインハンドラー
///
/// # 処理フロー
/// 1. レジストリでルートを解決して実行
/// 2. レスポンスをAPI Gatewayプロキシ形式で返却
async fn handler(event: LambdaEvent<ApiGatewayProxyRequest>) -> Result<ApiGatewayProxyResponse, Error> {
    let registry = get_registry().await?;
    let request = event.payload;

    let span = info_span!(
        "request",
        request_id = %request.request_id(),
        env = registry.dependencies().config.env(),
        stage = ?request.request_context.stage,
        method = %request.http_method.as_str(),
        path = %request.resource_template(),
    );

    Ok(registry.dispatch(&request).instrument(span).await)
}
