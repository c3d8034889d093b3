/// ルートレジストリとディスパッチ
///
/// (リソーステンプレート, HTTPメソッド)の完全一致で`Route`を解決し、
/// 共有依存関係をハンドラーに渡して実行する。
/// `{userId}`のようなテンプレートはAPI Gateway側で解決済みのものをそのまま照合する。
use std::sync::Arc;

use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use tracing::{info, warn};

use super::handler_error::HandlerError;
use super::request::ProxyRequestExt;
use super::{event_handler, feedback_handler, receiver_handler, user_handler};
use crate::infrastructure::{
    AppConfig, EventRepository, FeedbackPublisher, ReceiverRepository, RelationshipRepository, UserRepository,
};

/// 取り除くデプロイステージのパスプレフィックス
const STAGE_PREFIXES: [&str; 2] = ["/Stage", "/Prod"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub path: &'static str,
    pub method: &'static str,
}

/// 登録済みのハンドラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    CreateUser,
    GetUser,
    GetUserRelationships,
    AddPrimaryReceiver,
    AddAdditionalReceiver,
    GetReceiver,
    AddEvent,
    DeleteEvent,
    GetEvents,
    SubmitFeedback,
}

impl Route {
    /// ログ用の操作名
    pub fn operation(&self) -> &'static str {
        match self {
            Route::CreateUser => "create user",
            Route::GetUser => "get user",
            Route::GetUserRelationships => "get user relationships",
            Route::AddPrimaryReceiver => "add primary receiver",
            Route::AddAdditionalReceiver => "add additional receiver",
            Route::GetReceiver => "get receiver",
            Route::AddEvent => "add receiver event",
            Route::DeleteEvent => "delete receiver event",
            Route::GetEvents => "get receiver events",
            Route::SubmitFeedback => "submit feedback",
        }
    }
}

pub const ROUTES: &[(Endpoint, Route)] = &[
    (Endpoint { path: "/user", method: "POST" }, Route::CreateUser),
    (Endpoint { path: "/user/{userId}", method: "GET" }, Route::GetUser),
    (Endpoint { path: "/user/relationships/{userId}", method: "GET" }, Route::GetUserRelationships),
    (Endpoint { path: "/user/primary-receiver", method: "POST" }, Route::AddPrimaryReceiver),
    (Endpoint { path: "/user/additional-receiver", method: "POST" }, Route::AddAdditionalReceiver),
    (Endpoint { path: "/receiver/{receiverId}", method: "GET" }, Route::GetReceiver),
    (Endpoint { path: "/event", method: "POST" }, Route::AddEvent),
    (Endpoint { path: "/event/{eventId}", method: "DELETE" }, Route::DeleteEvent),
    (Endpoint { path: "/events/{receiverId}", method: "GET" }, Route::GetEvents),
    (Endpoint { path: "/feedback", method: "POST" }, Route::SubmitFeedback),
];

/// 先頭の`/Stage`・`/Prod`セグメントを1つだけ取り除く
pub fn normalize_path(path: &str) -> &str {
    for prefix in STAGE_PREFIXES {
        if let Some(rest) = path.strip_prefix(prefix) {
            if rest.is_empty() {
                return "/";
            }
            if rest.starts_with('/') {
                return rest;
            }
        }
    }
    path
}

/// パスとメソッドの完全一致でルートを引く
pub fn lookup(path: &str, method: &str) -> Option<Route> {
    let path = normalize_path(path);
    ROUTES
        .iter()
        .find(|(endpoint, _)| endpoint.path == path && endpoint.method == method)
        .map(|(_, route)| *route)
}

/// すべてのハンドラーが共有する依存関係
///
/// プロセス起動時に一度だけ構築し、以降は読み取り専用で参照する。
#[derive(Clone)]
pub struct Dependencies {
    pub config: AppConfig,
    pub users: Arc<dyn UserRepository>,
    pub receivers: Arc<dyn ReceiverRepository>,
    pub events: Arc<dyn EventRepository>,
    pub relationships: Arc<dyn RelationshipRepository>,
    /// FEEDBACK_QUEUE_URL未設定時はNone
    pub feedback: Option<Arc<dyn FeedbackPublisher>>,
}

pub struct Registry {
    deps: Dependencies,
}

impl Registry {
    pub fn new(deps: Dependencies) -> Self {
        Self { deps }
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.deps
    }

    pub fn resolve(&self, request: &ApiGatewayProxyRequest) -> Option<Route> {
        lookup(request.resource_template(), request.http_method.as_str())
    }

    /// ルートのハンドラーを実行し、失敗を対応するエラーレスポンスに変換する
    pub async fn run(&self, route: Route, request: &ApiGatewayProxyRequest) -> ApiGatewayProxyResponse {
        let operation = route.operation();
        info!(operation, "リクエスト処理開始");

        let result = match route {
            Route::CreateUser => user_handler::create_user(&self.deps, request).await,
            Route::GetUser => user_handler::get_user(&self.deps, request).await,
            Route::GetUserRelationships => user_handler::get_user_relationships(&self.deps, request).await,
            Route::AddPrimaryReceiver => user_handler::add_primary_receiver(&self.deps, request).await,
            Route::AddAdditionalReceiver => user_handler::add_additional_receiver(&self.deps, request).await,
            Route::GetReceiver => receiver_handler::get_receiver(&self.deps, request).await,
            Route::AddEvent => event_handler::add_event(&self.deps, request).await,
            Route::DeleteEvent => event_handler::delete_event(&self.deps, request).await,
            Route::GetEvents => event_handler::get_events(&self.deps, request).await,
            Route::SubmitFeedback => feedback_handler::submit_feedback(&self.deps, request).await,
        };

        match result {
            Ok(response) => {
                info!(operation, status_code = response.status_code, "リクエスト処理成功");
                response
            }
            Err(err) => {
                warn!(operation, status_code = err.status_code(), error = %err, "リクエスト処理失敗");
                err.to_response()
            }
        }
    }

    /// ルートを解決して実行する。未登録のルートは400
    pub async fn dispatch(&self, request: &ApiGatewayProxyRequest) -> ApiGatewayProxyResponse {
        match self.resolve(request) {
            Some(route) => self.run(route, request).await,
            None => {
                let err = HandlerError::BadRequest(format!(
                    "no handler for {} {}",
                    request.http_method.as_str(),
                    request.resource_template()
                ));
                warn!(error = %err, "未登録のルート");
                err.to_response()
            }
        }
    }
}
