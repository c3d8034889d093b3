/// リクエスト検証ヘルパー
///
/// パスパラメータ・クエリパラメータの抽出と、未知フィールドを拒否する厳密なボディデコードを行う。
use std::collections::HashMap;

use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use aws_lambda_events::query_map::QueryMap;
use serde::de::DeserializeOwned;
use thiserror::Error;

const ID_SEPARATOR: &str = "#";
const ID_SEPARATOR_URL_ESCAPED: &str = "%23";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("no path parameters provided")]
    NoPathParameters,

    #[error("too many path parameters provided")]
    TooManyPathParameters,

    #[error("invalid path parameters")]
    InvalidPathParameters,

    #[error("id is not formatted correctly")]
    IdNotFormatted,

    #[error("no query parameters provided")]
    NoQueryParameters,

    #[error("query parameter {0} is empty")]
    EmptyQueryParameter(String),

    #[error("query parameter {0} not found")]
    QueryParameterNotFound(String),

    #[error("request body is missing")]
    MissingBody,

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("required field {0} is missing")]
    MissingField(&'static str),
}

/// 唯一のパスパラメータ`name`を取り出し、`<prefix>#<英数字とハイフン>`形式であることを検証する
///
/// `%23`でエンコードされた区切り文字は`#`に戻してから検証する。
pub fn path_parameter(
    params: &HashMap<String, String>,
    name: &str,
    prefix: &str,
) -> Result<String, ValidationError> {
    path_parameter_with_prefixes(params, name, &[prefix])
}

/// `path_parameter`と同じ検証を、いずれかのプレフィックスに一致すればよい形で行う
pub fn path_parameter_with_prefixes(
    params: &HashMap<String, String>,
    name: &str,
    prefixes: &[&str],
) -> Result<String, ValidationError> {
    match params.len() {
        0 => Err(ValidationError::NoPathParameters),
        1 => {
            let raw = params.get(name).ok_or(ValidationError::InvalidPathParameters)?;
            prefixes
                .iter()
                .find_map(|prefix| normalize_id(raw, prefix))
                .ok_or(ValidationError::IdNotFormatted)
        }
        _ => Err(ValidationError::TooManyPathParameters),
    }
}

/// IDを`<prefix>#<suffix>`に正規化する。形式が合わなければ`None`
fn normalize_id(raw: &str, prefix: &str) -> Option<String> {
    let escaped = format!("{}{}", prefix, ID_SEPARATOR_URL_ESCAPED);
    let separated = format!("{}{}", prefix, ID_SEPARATOR);
    let id = raw.replacen(&escaped, &separated, 1);

    let suffix = id.strip_prefix(&separated)?;
    let valid = !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    valid.then_some(id)
}

/// クエリパラメータ`name`を取り出す（複数値の場合は先頭）
pub fn query_parameter(params: &QueryMap, name: &str) -> Result<String, ValidationError> {
    if params.is_empty() {
        return Err(ValidationError::NoQueryParameters);
    }

    match params.first(name) {
        Some("") => Err(ValidationError::EmptyQueryParameter(name.to_string())),
        Some(value) => Ok(value.to_string()),
        None => Err(ValidationError::QueryParameterNotFound(name.to_string())),
    }
}

/// リクエストボディの型
///
/// 実装する型には`#[serde(deny_unknown_fields)]`を付け、未知フィールドを拒否すること。
pub trait RequestBody: DeserializeOwned {
    /// デコード後のフィールド検証（必須項目など）
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// ボディを厳密にデコードし、フィールド検証まで行う
pub fn decode_body<T: RequestBody>(request: &ApiGatewayProxyRequest) -> Result<T, ValidationError> {
    if request.is_base64_encoded {
        return Err(ValidationError::InvalidBody(
            "base64 encoded bodies are not supported".to_string(),
        ));
    }

    let body = request
        .body
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .ok_or(ValidationError::MissingBody)?;

    let decoded: T = serde_json::from_str(body).map_err(|e| ValidationError::InvalidBody(e.to_string()))?;
    decoded.validate()?;
    Ok(decoded)
}

/// 必須の文字列フィールドが空でないことを検証
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

/// ボディ内のIDフィールドが`<prefix>#<suffix>`形式であることを検証
pub fn require_id(field: &'static str, value: &str, prefix: &str) -> Result<(), ValidationError> {
    require(field, value)?;
    normalize_id(value, prefix)
        .filter(|id| id == value)
        .map(|_| ())
        .ok_or(ValidationError::IdNotFormatted)
}
