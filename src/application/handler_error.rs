/// ハンドラー共通のエラー型
///
/// すべての失敗は3種類のいずれかに分類され、それぞれ1つのレスポンスに対応する。
use aws_lambda_events::apigw::ApiGatewayProxyResponse;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::response;
use super::validation::ValidationError;
use crate::domain::EventError;
use crate::infrastructure::{PublishError, RepositoryError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HandlerError {
    /// 入力不正（400）
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 介護者として紐づいていない（403）
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// ストア・通知・シリアライズの失敗、参照先アイテムの欠落（500）
    #[error("dependency failure: {0}")]
    Dependency(String),
}

impl HandlerError {
    pub fn status_code(&self) -> i64 {
        match self {
            HandlerError::BadRequest(_) => 400,
            HandlerError::AccessDenied(_) => 403,
            HandlerError::Dependency(_) => 500,
        }
    }

    pub fn status_text(&self) -> &'static str {
        match self {
            HandlerError::BadRequest(_) => "Bad Request",
            HandlerError::AccessDenied(_) => "Access Denied",
            HandlerError::Dependency(_) => "Internal Server Error",
        }
    }

    /// 呼び出し元に返すレスポンス（詳細はログのみに残す）
    pub fn to_response(&self) -> ApiGatewayProxyResponse {
        response::error(self.status_code(), self.status_text())
    }
}

impl From<ValidationError> for HandlerError {
    fn from(err: ValidationError) -> Self {
        HandlerError::BadRequest(err.to_string())
    }
}

impl From<EventError> for HandlerError {
    fn from(err: EventError) -> Self {
        HandlerError::BadRequest(err.to_string())
    }
}

impl From<RepositoryError> for HandlerError {
    fn from(err: RepositoryError) -> Self {
        HandlerError::Dependency(err.to_string())
    }
}

impl From<PublishError> for HandlerError {
    fn from(err: PublishError) -> Self {
        HandlerError::Dependency(err.to_string())
    }
}

/// 値をJSONに変換（失敗は500）
pub fn to_json<T: Serialize>(value: &T) -> Result<Value, HandlerError> {
    serde_json::to_value(value).map_err(|e| HandlerError::Dependency(format!("response serialization: {}", e)))
}
