/// AWS SDKクライアント構築
///
/// ローカル環境ではダミー認証情報を使い、DynamoDBクライアントのみDynamoDB Localに向ける。
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_sqs::Client as SqsClient;

use super::config::AppConfig;

/// DynamoDB Localのエンドポイント
pub const LOCAL_DYNAMODB_ENDPOINT: &str = "http://dynamodb-local:8000";

/// ローカル環境で使用するリージョン
pub const LOCAL_REGION: &str = "us-east-1";

/// 環境に応じたAWS SDK設定を読み込む
///
/// - local: 固定リージョン、ダミー認証情報
/// - それ以外: aws-configの標準チェーン（環境変数、IAMロールなど）
///
/// エンドポイントは全クライアント共通の設定には含めない。
pub async fn load_sdk_config(config: &AppConfig) -> SdkConfig {
    if config.is_local() {
        aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(LOCAL_REGION))
            .credentials_provider(Credentials::new("dummy", "dummy", None, None, "local"))
            .load()
            .await
    } else {
        aws_config::load_defaults(BehaviorVersion::latest()).await
    }
}

/// DynamoDBクライアントの接続先を上書きするエンドポイント（local以外はNone）
pub fn dynamodb_endpoint(config: &AppConfig) -> Option<&'static str> {
    config.is_local().then_some(LOCAL_DYNAMODB_ENDPOINT)
}

/// SDK設定からAWSクライアントを作成
#[derive(Debug, Clone)]
pub struct AwsClients {
    pub dynamodb: DynamoDbClient,
    pub sqs: SqsClient,
}

impl AwsClients {
    pub fn new(sdk_config: &SdkConfig, config: &AppConfig) -> Self {
        let mut dynamodb_config = aws_sdk_dynamodb::config::Builder::from(sdk_config);
        if let Some(endpoint) = dynamodb_endpoint(config) {
            dynamodb_config = dynamodb_config.endpoint_url(endpoint);
        }

        Self {
            dynamodb: DynamoDbClient::from_conf(dynamodb_config.build()),
            sqs: SqsClient::new(sdk_config),
        }
    }
}
