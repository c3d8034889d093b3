/// アプリケーション設定
///
/// デプロイ環境名、各テーブル名、フィードバック通知先を環境変数から読み込む。
use thiserror::Error;

/// ローカル開発環境の名前
pub const LOCAL_ENV: &str = "local";

/// フィードバック送信先のデフォルトアドレス
pub const DEFAULT_FEEDBACK_EMAIL: &str = "feedback@care-giver.app";

/// 設定読み込みのエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AppConfigError {
    #[error("Empty environment variable: {0}")]
    EmptyValue(String),
}

/// 環境変数から読み込んだアプリケーション設定
///
/// 環境変数:
/// - ENV: デプロイ環境名（デフォルト: local）
/// - USER_TABLE_NAME / RECEIVER_TABLE_NAME / EVENT_TABLE_NAME / RELATIONSHIP_TABLE_NAME:
///   各テーブル名（デフォルト: `<kind>-table-<env>`）
/// - FEEDBACK_QUEUE_URL: フィードバック通知用SQSキュー（任意）
/// - FEEDBACK_EMAIL: フィードバック送信先（任意）
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    env: String,
    user_table: String,
    receiver_table: String,
    event_table: String,
    relationship_table: String,
    feedback_queue_url: Option<String>,
    feedback_email: String,
}

impl AppConfig {
    /// プロセスの環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, AppConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のルックアップ関数から設定を読み込む
    ///
    /// 空文字列がセットされた変数は未設定とは区別してエラーにする。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| -> Result<Option<String>, AppConfigError> {
            match lookup(key) {
                Some(value) if value.trim().is_empty() => Err(AppConfigError::EmptyValue(key.to_string())),
                other => Ok(other),
            }
        };

        let env = read("ENV")?.unwrap_or_else(|| LOCAL_ENV.to_string());
        let table = |key: &str, kind: &str| -> Result<String, AppConfigError> {
            Ok(read(key)?.unwrap_or_else(|| format!("{}-table-{}", kind, env)))
        };

        Ok(Self {
            user_table: table("USER_TABLE_NAME", "user")?,
            receiver_table: table("RECEIVER_TABLE_NAME", "receiver")?,
            event_table: table("EVENT_TABLE_NAME", "event")?,
            relationship_table: table("RELATIONSHIP_TABLE_NAME", "relationship")?,
            feedback_queue_url: read("FEEDBACK_QUEUE_URL")?,
            feedback_email: read("FEEDBACK_EMAIL")?.unwrap_or_else(|| DEFAULT_FEEDBACK_EMAIL.to_string()),
            env,
        })
    }

    /// 明示的な値で設定を作成（テスト用）
    pub fn new(
        env: impl Into<String>,
        user_table: impl Into<String>,
        receiver_table: impl Into<String>,
        event_table: impl Into<String>,
        relationship_table: impl Into<String>,
    ) -> Self {
        Self {
            env: env.into(),
            user_table: user_table.into(),
            receiver_table: receiver_table.into(),
            event_table: event_table.into(),
            relationship_table: relationship_table.into(),
            feedback_queue_url: None,
            feedback_email: DEFAULT_FEEDBACK_EMAIL.to_string(),
        }
    }

    /// フィードバック通知先を設定
    pub fn with_feedback(mut self, queue_url: impl Into<String>, email: impl Into<String>) -> Self {
        self.feedback_queue_url = Some(queue_url.into());
        self.feedback_email = email.into();
        self
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn is_local(&self) -> bool {
        self.env == LOCAL_ENV
    }

    pub fn user_table(&self) -> &str {
        &self.user_table
    }

    pub fn receiver_table(&self) -> &str {
        &self.receiver_table
    }

    pub fn event_table(&self) -> &str {
        &self.event_table
    }

    pub fn relationship_table(&self) -> &str {
        &self.relationship_table
    }

    pub fn feedback_queue_url(&self) -> Option<&str> {
        self.feedback_queue_url.as_deref()
    }

    pub fn feedback_email(&self) -> &str {
        &self.feedback_email
    }
}
