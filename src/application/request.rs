/// API Gatewayプロキシ統合のリクエスト
///
/// `aws_lambda_events`のリクエスト型から、ルーティングとログに使う値を取り出す。
use aws_lambda_events::apigw::ApiGatewayProxyRequest;

pub trait ProxyRequestExt {
    /// ルーティングに使うリソーステンプレート
    ///
    /// `requestContext.resourcePath`（ステージ名を含む場合がある）を優先し、無ければ`resource`を使う。
    fn resource_template(&self) -> &str;

    fn request_id(&self) -> &str;
}

impl ProxyRequestExt for ApiGatewayProxyRequest {
    fn resource_template(&self) -> &str {
        self.request_context
            .resource_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(self.resource.as_deref())
            .unwrap_or_default()
    }

    fn request_id(&self) -> &str {
        self.request_context.request_id.as_deref().unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_gateway_event() {
        let event = json!({
            "resource": "/receiver/{receiverId}",
            "path": "/receiver/Receiver%23123",
            "httpMethod": "GET",
            "headers": {"Content-Type": "application/json"},
            "multiValueHeaders": {"Content-Type": ["application/json"]},
            "queryStringParameters": {"userId": "User#123"},
            "multiValueQueryStringParameters": {"userId": ["User#123"]},
            "pathParameters": {"receiverId": "Receiver%23123"},
            "stageVariables": null,
            "requestContext": {
                "accountId": "123456789012",
                "resourceId": "abc123",
                "stage": "Prod",
                "requestId": "req-1",
                "identity": {"sourceIp": "203.0.113.1"},
                "resourcePath": "/Prod/receiver/{receiverId}",
                "httpMethod": "GET",
                "apiId": "api123"
            },
            "body": null,
            "isBase64Encoded": false
        });

        let request: ApiGatewayProxyRequest = serde_json::from_value(event).unwrap();
        assert_eq!(request.http_method.as_str(), "GET");
        assert_eq!(request.path_parameters["receiverId"], "Receiver%23123");
        assert_eq!(request.query_string_parameters.first("userId"), Some("User#123"));
        assert_eq!(request.resource_template(), "/Prod/receiver/{receiverId}");
        assert_eq!(request.request_id(), "req-1");
        assert_eq!(request.body, None);
    }

    #[test]
    fn test_resource_template_falls_back_to_resource() {
        let mut request = ApiGatewayProxyRequest::default();
        request.resource = Some("/user".to_string());

        assert_eq!(request.resource_template(), "/user");
        assert_eq!(request.request_id(), "unknown");

        request.request_context.resource_path = Some(String::new());
        assert_eq!(request.resource_template(), "/user");
    }

    #[test]
    fn test_resource_template_without_any_path() {
        assert_eq!(ApiGatewayProxyRequest::default().resource_template(), "");
    }
}
