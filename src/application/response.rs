/// API Gatewayプロキシ統合のレスポンス
///
/// ボディは常にJSON。エラーは`{"status": "<status>"}`の汎用形のみを返す。
use aws_lambda_events::apigw::ApiGatewayProxyResponse;
use aws_lambda_events::encodings::Body;
use http::HeaderMap;
use http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, HeaderValue};
use serde_json::{Value, json};

/// 成功レスポンスのステータス文字列
pub const SUCCESS: &str = "Success";

/// JSONボディのレスポンスを作成
pub fn json_response(status_code: i64, body: &Value) -> ApiGatewayProxyResponse {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

    let mut response = ApiGatewayProxyResponse::default();
    response.status_code = status_code;
    response.headers = headers;
    response.body = Some(Body::Text(body.to_string()));
    response
}

pub fn ok(body: &Value) -> ApiGatewayProxyResponse {
    json_response(200, body)
}

/// `{"status": "Success"}`のみのレスポンス
pub fn success() -> ApiGatewayProxyResponse {
    ok(&json!({ "status": SUCCESS }))
}

pub fn error(status_code: i64, status: &str) -> ApiGatewayProxyResponse {
    json_response(status_code, &json!({ "status": status }))
}
