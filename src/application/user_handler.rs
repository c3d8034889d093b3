/// ユーザー関連のハンドラー
///
/// - POST /user
/// - GET /user/{userId}
/// - GET /user/relationships/{userId}
/// - POST /user/primary-receiver
/// - POST /user/additional-receiver
use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use super::access::{load_relationships, require_primary_caregiver};
use super::handler_error::{HandlerError, to_json};
use super::registry::Dependencies;
use super::response::{self, SUCCESS};
use super::validation::{RequestBody, ValidationError, decode_body, path_parameter, require, require_id};
use crate::domain::{RECEIVER_PREFIX, Receiver, Relationship, USER_PREFIX, User};
use crate::infrastructure::PutOutcome;

/// ユーザーIDのパスパラメータ名
const USER_ID_PARAM: &str = "userId";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl RequestBody for CreateUserRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require("email", &self.email)?;
        require("firstName", &self.first_name)?;
        require("lastName", &self.last_name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PrimaryReceiverRequest {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
}

impl RequestBody for PrimaryReceiverRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_id("userId", &self.user_id, USER_PREFIX)?;
        require("firstName", &self.first_name)?;
        require("lastName", &self.last_name)
    }
}

/// 主介護者が別のユーザーをメールアドレスで招待するリクエスト
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AdditionalReceiverRequest {
    pub user_id: String,
    pub receiver_id: String,
    pub email: String,
}

impl RequestBody for AdditionalReceiverRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_id("userId", &self.user_id, USER_PREFIX)?;
        require_id("receiverId", &self.receiver_id, RECEIVER_PREFIX)?;
        require("email", &self.email)
    }
}

pub async fn create_user(
    deps: &Dependencies,
    request: &ApiGatewayProxyRequest,
) -> Result<ApiGatewayProxyResponse, HandlerError> {
    let body: CreateUserRequest =
        decode_body(request).inspect_err(|err| error!(error = %err, "リクエストボディの読み取りに失敗"))?;

    let user = User::new(body.email, body.first_name, body.last_name);
    deps.users
        .create_user(&user)
        .await
        .inspect_err(|err| error!(user_id = %user.user_id, error = %err, "ユーザーの作成に失敗"))?;

    info!(user_id = %user.user_id, "ユーザー作成");
    Ok(response::ok(&json!({
        "userId": user.user_id,
        "status": SUCCESS,
    })))
}

pub async fn get_user(
    deps: &Dependencies,
    request: &ApiGatewayProxyRequest,
) -> Result<ApiGatewayProxyResponse, HandlerError> {
    let user_id = path_parameter(&request.path_parameters, USER_ID_PARAM, USER_PREFIX)
        .inspect_err(|err| error!(path_parameters = ?request.path_parameters, error = %err, "パスパラメータの検証に失敗"))?;

    let user = deps
        .users
        .get_user(&user_id)
        .await
        .inspect_err(|err| error!(user_id = %user_id, error = %err, "ユーザーの取得に失敗"))?
        .ok_or_else(|| {
            error!(user_id = %user_id, "ユーザーが存在しない");
            HandlerError::Dependency(format!("user {} not found", user_id))
        })?;

    Ok(response::ok(&to_json(&user)?))
}

pub async fn get_user_relationships(
    deps: &Dependencies,
    request: &ApiGatewayProxyRequest,
) -> Result<ApiGatewayProxyResponse, HandlerError> {
    let user_id = path_parameter(&request.path_parameters, USER_ID_PARAM, USER_PREFIX)
        .inspect_err(|err| error!(path_parameters = ?request.path_parameters, error = %err, "パスパラメータの検証に失敗"))?;

    let relationships = load_relationships(deps, &user_id).await?;

    Ok(response::ok(&json!({
        "relationships": to_json(&relationships)?,
        "status": SUCCESS,
    })))
}

/// 受給者を作成し、呼び出し元を主介護者として関係を登録する
///
/// 関係の登録に失敗した場合は作成した受給者を削除してから500を返す。
pub async fn add_primary_receiver(
    deps: &Dependencies,
    request: &ApiGatewayProxyRequest,
) -> Result<ApiGatewayProxyResponse, HandlerError> {
    let body: PrimaryReceiverRequest =
        decode_body(request).inspect_err(|err| error!(error = %err, "リクエストボディの読み取りに失敗"))?;
    let user_id = body.user_id;

    let receiver = Receiver::new(body.first_name, body.last_name);
    let receiver_id = receiver.receiver_id.clone();
    deps.receivers
        .create_receiver(&receiver)
        .await
        .inspect_err(|err| error!(user_id = %user_id, receiver_id = %receiver_id, error = %err, "受給者の作成に失敗"))?;

    let relationship = Relationship::primary(user_id.as_str(), receiver_id.as_str());
    if let Err(err) = deps.relationships.add_relationship(&relationship).await {
        error!(user_id = %user_id, receiver_id = %receiver_id, error = %err, "主介護者の関係登録に失敗");

        // 介護者のいない受給者を残さない
        if let Err(cleanup_err) = deps.receivers.delete_receiver(&receiver_id).await {
            error!(receiver_id = %receiver_id, error = %cleanup_err, "受給者の削除に失敗");
        }
        return Err(err.into());
    }

    info!(user_id = %user_id, receiver_id = %receiver_id, "主介護者として受給者を登録");
    Ok(response::ok(&json!({
        "receiverId": receiver_id,
        "status": SUCCESS,
    })))
}

/// 主介護者が、メールアドレスで指定した別のユーザーを追加介護者として登録する
///
/// 既に関係がある場合は既存の関係を変更せず成功とする。
pub async fn add_additional_receiver(
    deps: &Dependencies,
    request: &ApiGatewayProxyRequest,
) -> Result<ApiGatewayProxyResponse, HandlerError> {
    let body: AdditionalReceiverRequest =
        decode_body(request).inspect_err(|err| error!(error = %err, "リクエストボディの読み取りに失敗"))?;

    require_primary_caregiver(deps, &body.user_id, &body.receiver_id).await?;

    let invitee = deps
        .users
        .find_user_by_email(&body.email)
        .await
        .inspect_err(|err| error!(user_id = %body.user_id, error = %err, "招待ユーザーの検索に失敗"))?
        .ok_or_else(|| {
            error!(user_id = %body.user_id, receiver_id = %body.receiver_id, "招待ユーザーが存在しない");
            HandlerError::Dependency("invited user not found".to_string())
        })?;

    let relationship = Relationship::additional(invitee.user_id.as_str(), body.receiver_id.as_str());
    let outcome = deps
        .relationships
        .add_relationship(&relationship)
        .await
        .inspect_err(|err| {
            error!(
                user_id = %body.user_id,
                invitee_id = %invitee.user_id,
                receiver_id = %body.receiver_id,
                error = %err,
                "追加介護者の関係登録に失敗"
            )
        })?;

    match outcome {
        PutOutcome::Created => {
            info!(invitee_id = %invitee.user_id, receiver_id = %body.receiver_id, "追加介護者を登録")
        }
        PutOutcome::AlreadyExists => {
            info!(invitee_id = %invitee.user_id, receiver_id = %body.receiver_id, "関係は登録済み")
        }
    }

    Ok(response::success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::registry::tests::{Mocks, request};
    use crate::application::response::tests::JsonBody;
    use crate::infrastructure::RepositoryError;
    use serde_json::Value;

    fn post(resource: &str, body: Value) -> ApiGatewayProxyRequest {
        request(json!({
            "httpMethod": "POST",
            "resource": resource,
            "body": body.to_string()
        }))
    }

    fn get_with_path(resource: &str, name: &str, value: &str) -> ApiGatewayProxyRequest {
        request(json!({
            "httpMethod": "GET",
            "resource": resource,
            "pathParameters": { name: value }
        }))
    }

    fn sample_user() -> User {
        User {
            user_id: "User#123".to_string(),
            email: "jane@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
        }
    }

    // ==================== POST /user ====================

    #[tokio::test]
    async fn test_create_user_success() {
        let mocks = Mocks::new();
        let req = post(
            "/user",
            json!({"email": "jane@example.com", "firstName": "Jane", "lastName": "Doe"}),
        );

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 200);

        let body = response.body_json().unwrap();
        let user_id = body["userId"].as_str().unwrap();
        assert!(user_id.starts_with("User#"));
        assert_eq!(body["status"], "Success");
        assert_eq!(mocks.users.stored(user_id).unwrap().email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_create_user_ids_are_unique() {
        let mocks = Mocks::new();
        let registry = mocks.registry();
        let req = post(
            "/user",
            json!({"email": "jane@example.com", "firstName": "Jane", "lastName": "Doe"}),
        );

        let first = registry.dispatch(&req).await.body_json().unwrap();
        let second = registry.dispatch(&req).await.body_json().unwrap();
        assert_ne!(first["userId"], second["userId"]);
        assert_eq!(mocks.users.user_count(), 2);
    }

    #[tokio::test]
    async fn test_create_user_unknown_field_is_bad_request() {
        let mocks = Mocks::new();
        let req = post(
            "/user",
            json!({"email": "jane@example.com", "firstName": "Jane", "lastName": "Doe", "password": "x"}),
        );

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 400);
        assert_eq!(response.body_json().unwrap(), json!({"status": "Bad Request"}));
        assert_eq!(mocks.users.user_count(), 0);
    }

    #[tokio::test]
    async fn test_create_user_missing_field_is_bad_request() {
        let mocks = Mocks::new();
        let req = post("/user", json!({"email": "jane@example.com", "firstName": "Jane"}));

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn test_create_user_store_failure() {
        let mocks = Mocks::new();
        mocks
            .users
            .set_next_error(RepositoryError::WriteError("DynamoDB unavailable".to_string()));
        let req = post(
            "/user",
            json!({"email": "jane@example.com", "firstName": "Jane", "lastName": "Doe"}),
        );

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(response.body_json().unwrap()["status"], "Internal Server Error");
    }

    // ==================== GET /user/{userId} ====================

    #[tokio::test]
    async fn test_get_user_success() {
        let mut mocks = Mocks::new();
        mocks.users = mocks.users.clone().with_user(sample_user());
        let req = get_with_path("/user/{userId}", "userId", "User%23123");

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body_json().unwrap(), json!({
            "userId": "User#123",
            "email": "jane@example.com",
            "firstName": "Jane",
            "lastName": "Doe"
        }));
    }

    #[tokio::test]
    async fn test_get_user_is_idempotent() {
        let mut mocks = Mocks::new();
        mocks.users = mocks.users.clone().with_user(sample_user());
        let registry = mocks.registry();
        let req = get_with_path("/user/{userId}", "userId", "User#123");

        let first = registry.dispatch(&req).await;
        let second = registry.dispatch(&req).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_get_user_missing_is_internal_error() {
        let mocks = Mocks::new();
        let req = get_with_path("/user/{userId}", "userId", "User%23missing");

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(response.body_json().unwrap(), json!({"status": "Internal Server Error"}));
    }

    #[tokio::test]
    async fn test_get_user_malformed_id() {
        let mocks = Mocks::new();
        let req = get_with_path("/user/{userId}", "userId", "Receiver#123");

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn test_get_user_store_failure() {
        let mocks = Mocks::new();
        mocks
            .users
            .set_next_error(RepositoryError::ReadError("DynamoDB unavailable".to_string()));
        let req = get_with_path("/user/{userId}", "userId", "User#123");

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 500);
    }

    // ==================== GET /user/relationships/{userId} ====================

    #[tokio::test]
    async fn test_get_user_relationships() {
        let mut mocks = Mocks::new();
        mocks.relationships = mocks
            .relationships
            .clone()
            .with_relationship(Relationship::primary("User#123", "Receiver#1"))
            .with_relationship(Relationship::additional("User#123", "Receiver#2"))
            .with_relationship(Relationship::primary("User#456", "Receiver#3"));
        let req = get_with_path("/user/relationships/{userId}", "userId", "User#123");

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 200);

        let body = response.body_json().unwrap();
        assert_eq!(body["status"], "Success");
        let relationships = body["relationships"].as_array().unwrap();
        assert_eq!(relationships.len(), 2);
        assert_eq!(relationships[0]["receiverId"], "Receiver#1");
        assert_eq!(relationships[0]["primaryCareGiver"], true);
        assert_eq!(relationships[1]["primaryCareGiver"], false);
    }

    #[tokio::test]
    async fn test_get_user_relationships_empty() {
        let mocks = Mocks::new();
        let req = get_with_path("/user/relationships/{userId}", "userId", "User#123");

        let body = mocks.registry().dispatch(&req).await.body_json().unwrap();
        assert_eq!(body["relationships"], json!([]));
    }

    // ==================== POST /user/primary-receiver ====================

    #[tokio::test]
    async fn test_add_primary_receiver_success() {
        let mut mocks = Mocks::new();
        mocks.users = mocks.users.clone().with_user(sample_user());
        let req = post(
            "/user/primary-receiver",
            json!({"userId": "User#123", "firstName": "John", "lastName": "Doe"}),
        );

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 200);

        let body = response.body_json().unwrap();
        let receiver_id = body["receiverId"].as_str().unwrap();
        assert!(receiver_id.starts_with("Receiver#"));
        assert_eq!(mocks.receivers.receiver_count(), 1);

        let relationship = mocks.relationships.stored("User#123", receiver_id).unwrap();
        assert!(relationship.primary_care_giver);
    }

    #[tokio::test]
    async fn test_add_primary_receiver_does_not_read_caller() {
        let mocks = Mocks::new();
        // ユーザーテーブルを読むと失敗する状態でも登録できる
        mocks
            .users
            .set_next_error(RepositoryError::ReadError("DynamoDB unavailable".to_string()));
        let req = post(
            "/user/primary-receiver",
            json!({"userId": "User#nobody", "firstName": "John", "lastName": "Doe"}),
        );

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(mocks.receivers.receiver_count(), 1);
        assert_eq!(mocks.relationships.relationship_count(), 1);
    }

    #[tokio::test]
    async fn test_add_primary_receiver_removes_receiver_when_relationship_fails() {
        let mut mocks = Mocks::new();
        mocks.users = mocks.users.clone().with_user(sample_user());
        mocks
            .relationships
            .set_next_error(RepositoryError::WriteError("DynamoDB unavailable".to_string()));
        let req = post(
            "/user/primary-receiver",
            json!({"userId": "User#123", "firstName": "John", "lastName": "Doe"}),
        );

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(mocks.receivers.receiver_count(), 0);
        assert_eq!(mocks.relationships.relationship_count(), 0);
    }

    #[tokio::test]
    async fn test_add_primary_receiver_rejects_malformed_user_id() {
        let mocks = Mocks::new();
        let req = post(
            "/user/primary-receiver",
            json!({"userId": "123", "firstName": "John", "lastName": "Doe"}),
        );

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 400);
    }

    // ==================== POST /user/additional-receiver ====================

    fn invite_mocks() -> Mocks {
        let mut mocks = Mocks::new();
        mocks.users = mocks.users.clone().with_user(sample_user()).with_user(User {
            user_id: "User#456".to_string(),
            email: "helper@example.com".to_string(),
            first_name: "Helper".to_string(),
            last_name: "Smith".to_string(),
        });
        mocks.relationships = mocks
            .relationships
            .clone()
            .with_relationship(Relationship::primary("User#123", "Receiver#1"));
        mocks
    }

    #[tokio::test]
    async fn test_add_additional_receiver_success() {
        let mocks = invite_mocks();
        let req = post(
            "/user/additional-receiver",
            json!({"userId": "User#123", "receiverId": "Receiver#1", "email": "helper@example.com"}),
        );

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body_json().unwrap(), json!({"status": "Success"}));

        let relationship = mocks.relationships.stored("User#456", "Receiver#1").unwrap();
        assert!(!relationship.primary_care_giver);
    }

    #[tokio::test]
    async fn test_add_additional_receiver_requires_primary() {
        let mut mocks = invite_mocks();
        mocks.relationships = mocks
            .relationships
            .clone()
            .with_relationship(Relationship::additional("User#456", "Receiver#2"));
        let req = post(
            "/user/additional-receiver",
            json!({"userId": "User#456", "receiverId": "Receiver#2", "email": "jane@example.com"}),
        );

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 403);
        assert_eq!(response.body_json().unwrap()["status"], "Access Denied");
        assert!(mocks.relationships.stored("User#123", "Receiver#2").is_none());
    }

    #[tokio::test]
    async fn test_add_additional_receiver_unrelated_user() {
        let mocks = invite_mocks();
        let req = post(
            "/user/additional-receiver",
            json!({"userId": "User#456", "receiverId": "Receiver#1", "email": "jane@example.com"}),
        );

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 403);
    }

    #[tokio::test]
    async fn test_add_additional_receiver_unknown_email() {
        let mocks = invite_mocks();
        let req = post(
            "/user/additional-receiver",
            json!({"userId": "User#123", "receiverId": "Receiver#1", "email": "nobody@example.com"}),
        );

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(response.body_json().unwrap(), json!({"status": "Internal Server Error"}));
        assert_eq!(mocks.relationships.relationship_count(), 1);
    }

    #[tokio::test]
    async fn test_add_additional_receiver_existing_relationship_kept() {
        let mocks = invite_mocks();
        // 主介護者が自分自身を招待しても主介護者の関係は維持される
        let req = post(
            "/user/additional-receiver",
            json!({"userId": "User#123", "receiverId": "Receiver#1", "email": "jane@example.com"}),
        );

        let response = mocks.registry().dispatch(&req).await;
        assert_eq!(response.status_code, 200);
        assert!(mocks.relationships.stored("User#123", "Receiver#1").unwrap().primary_care_giver);
    }
}
