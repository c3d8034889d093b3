/// DynamoDBアイテムの属性読み取りとクエリのページングヘルパー
use std::collections::HashMap;
use std::future::Future;

use aws_sdk_dynamodb::types::AttributeValue;

use super::repository_error::RepositoryError;

pub type Item = HashMap<String, AttributeValue>;

/// 必須の文字列属性を取得
pub fn required_s(item: &Item, name: &str) -> Result<String, RepositoryError> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| RepositoryError::SerializationError(format!("Missing {} field", name)))
}

/// 任意の文字列属性を取得
pub fn optional_s(item: &Item, name: &str) -> Option<String> {
    item.get(name).and_then(|v| v.as_s().ok()).cloned()
}

/// 任意の数値属性を取得（数値として解釈できない場合はエラー）
pub fn optional_n(item: &Item, name: &str) -> Result<Option<f64>, RepositoryError> {
    match item.get(name).and_then(|v| v.as_n().ok()) {
        Some(n) => n
            .parse::<f64>()
            .map(Some)
            .map_err(|_| RepositoryError::SerializationError(format!("Invalid {} field: {}", name, n))),
        None => Ok(None),
    }
}

/// 真偽値属性を取得（欠落時はfalse）
pub fn bool_or_false(item: &Item, name: &str) -> bool {
    item.get(name)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .unwrap_or(false)
}

/// クエリ1ページ分の結果
#[derive(Debug, Default)]
pub struct Page {
    pub items: Vec<Item>,
    pub last_evaluated_key: Option<Item>,
}

/// LastEvaluatedKeyが返らなくなるまでページを読み続ける
///
/// `fetch_page`には前ページのLastEvaluatedKey（初回はNone）が渡される。
pub async fn query_all_pages<F, Fut>(mut fetch_page: F) -> Result<Vec<Item>, RepositoryError>
where
    F: FnMut(Option<Item>) -> Fut,
    Fut: Future<Output = Result<Page, RepositoryError>>,
{
    let mut items = Vec::new();
    let mut start_key = None;

    loop {
        let page = fetch_page(start_key).await?;
        items.extend(page.items);

        match page.last_evaluated_key {
            Some(key) if !key.is_empty() => start_key = Some(key),
            _ => return Ok(items),
        }
    }
}
