/// 受給者取得ハンドラー（GET /receiver/{receiverId}?userId=）
use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use tracing::error;

use super::access::require_caregiver;
use super::handler_error::{HandlerError, to_json};
use super::registry::Dependencies;
use super::response;
use super::validation::{path_parameter, query_parameter};
use crate::domain::RECEIVER_PREFIX;

pub const RECEIVER_ID_PARAM: &str = "receiverId";
pub const USER_ID_QUERY: &str = "userId";

pub async fn get_receiver(
    deps: &Dependencies,
    request: &ApiGatewayProxyRequest,
) -> Result<ApiGatewayProxyResponse, HandlerError> {
    let receiver_id = path_parameter(&request.path_parameters, RECEIVER_ID_PARAM, RECEIVER_PREFIX)
        .inspect_err(|err| error!(path_parameters = ?request.path_parameters, error = %err, "パスパラメータの検証に失敗"))?;
    let user_id = query_parameter(&request.query_string_parameters, USER_ID_QUERY)
        .inspect_err(|err| error!(param_id = USER_ID_QUERY, error = %err, "クエリパラメータの検証に失敗"))?;

    require_caregiver(deps, &user_id, &receiver_id).await?;

    let receiver = deps
        .receivers
        .get_receiver(&receiver_id)
        .await
        .inspect_err(|err| error!(receiver_id = %receiver_id, error = %err, "受給者の取得に失敗"))?
        .ok_or_else(|| {
            error!(receiver_id = %receiver_id, "受給者が存在しない");
            HandlerError::Dependency(format!("receiver {} not found", receiver_id))
        })?;

    Ok(response::ok(&to_json(&receiver)?))
}
