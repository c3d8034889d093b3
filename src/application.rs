// アプリケーション層モジュール
pub mod access;
pub mod event_handler;
pub mod feedback_handler;
pub mod handler_error;
pub mod receiver_handler;
pub mod registry;
pub mod request;
pub mod response;
pub mod user_handler;
pub mod validation;

// 再エクスポート
pub use handler_error::HandlerError;
pub use registry::{Dependencies, Registry, Route};
pub use request::ProxyRequestExt;
pub use validation::ValidationError;
