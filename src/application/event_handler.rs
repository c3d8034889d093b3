/// 介護イベントのハンドラー
///
/// - POST /event
/// - DELETE /event/{eventId}?receiverId=&userId=
/// - GET /events/{receiverId}?userId=
use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};

use super::access::require_caregiver;
use super::handler_error::{HandlerError, to_json};
use super::registry::Dependencies;
use super::response::{self, SUCCESS};
use super::validation::{
    RequestBody, ValidationError, decode_body, path_parameter, path_parameter_with_prefixes, query_parameter,
    require, require_id,
};
use crate::domain::{EventEntry, EventKind, EventOptions, RECEIVER_PREFIX, USER_PREFIX};

const EVENT_ID_PARAM: &str = "eventId";
const RECEIVER_ID_PARAM: &str = "receiverId";
const USER_ID_PARAM: &str = "userId";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AddEventRequest {
    pub receiver_id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// 種別ごとのペイロード（種別の検証後にデコードする）
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub note: Option<String>,
}

impl RequestBody for AddEventRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_id("receiverId", &self.receiver_id, RECEIVER_PREFIX)?;
        require_id("userId", &self.user_id, USER_PREFIX)?;
        require("type", &self.kind)
    }
}

pub async fn add_event(
    deps: &Dependencies,
    request: &ApiGatewayProxyRequest,
) -> Result<ApiGatewayProxyResponse, HandlerError> {
    let body: AddEventRequest =
        decode_body(request).inspect_err(|err| error!(error = %err, "リクエストボディの読み取りに失敗"))?;

    require_caregiver(deps, &body.user_id, &body.receiver_id).await?;

    let entry = EventEntry::new(body.receiver_id.as_str(), body.user_id.as_str(), &body.kind, EventOptions {
        timestamp: body.timestamp,
        data: body.data,
        note: body.note,
    })
    .inspect_err(|err| {
        error!(
            user_id = %body.user_id,
            receiver_id = %body.receiver_id,
            event_type = %body.kind,
            error = %err,
            "イベントの作成に失敗"
        )
    })?;

    deps.events
        .put_event(&entry)
        .await
        .inspect_err(|err| error!(receiver_id = %entry.receiver_id, event_id = %entry.event_id, error = %err, "イベントの保存に失敗"))?;

    info!(receiver_id = %entry.receiver_id, event_id = %entry.event_id, "イベントを記録");
    Ok(response::ok(&json!({
        "receiverId": entry.receiver_id,
        "eventId": entry.event_id,
        "status": SUCCESS,
    })))
}

pub async fn delete_event(
    deps: &Dependencies,
    request: &ApiGatewayProxyRequest,
) -> Result<ApiGatewayProxyResponse, HandlerError> {
    let prefixes = EventKind::ALL.map(|kind| kind.name());
    let event_id = path_parameter_with_prefixes(&request.path_parameters, EVENT_ID_PARAM, &prefixes)
        .inspect_err(|err| error!(param_id = EVENT_ID_PARAM, error = %err, "パスパラメータの検証に失敗"))?;
    let receiver_id = query_parameter(&request.query_string_parameters, RECEIVER_ID_PARAM)
        .inspect_err(|err| error!(param_id = RECEIVER_ID_PARAM, error = %err, "クエリパラメータの検証に失敗"))?;
    let user_id = query_parameter(&request.query_string_parameters, USER_ID_PARAM)
        .inspect_err(|err| error!(param_id = USER_ID_PARAM, error = %err, "クエリパラメータの検証に失敗"))?;

    require_caregiver(deps, &user_id, &receiver_id).await?;

    deps.events
        .delete_event(&receiver_id, &event_id)
        .await
        .inspect_err(|err| error!(receiver_id = %receiver_id, event_id = %event_id, error = %err, "イベントの削除に失敗"))?;

    info!(receiver_id = %receiver_id, event_id = %event_id, "イベントを削除");
    Ok(response::success())
}

pub async fn get_events(
    deps: &Dependencies,
    request: &ApiGatewayProxyRequest,
) -> Result<ApiGatewayProxyResponse, HandlerError> {
    let receiver_id = path_parameter(&request.path_parameters, RECEIVER_ID_PARAM, RECEIVER_PREFIX)
        .inspect_err(|err| error!(param_id = RECEIVER_ID_PARAM, error = %err, "パスパラメータの検証に失敗"))?;
    let user_id = query_parameter(&request.query_string_parameters, USER_ID_PARAM)
        .inspect_err(|err| error!(param_id = USER_ID_PARAM, error = %err, "クエリパラメータの検証に失敗"))?;

    require_caregiver(deps, &user_id, &receiver_id).await?;

    let events = deps
        .events
        .get_events(&receiver_id)
        .await
        .inspect_err(|err| error!(receiver_id = %receiver_id, error = %err, "イベントの取得に失敗"))?;

    Ok(response::ok(&to_json(&events)?))
}
