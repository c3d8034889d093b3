// Infrastructure layer modules
pub mod aws;
pub mod config;
pub mod dynamo_item;
pub mod event_repository;
pub mod feedback_publisher;
pub mod logging;
pub mod receiver_repository;
pub mod relationship_repository;
pub mod repository_error;
pub mod user_repository;

// Re-exports
pub use aws::{AwsClients, load_sdk_config};
pub use config::{AppConfig, AppConfigError};
pub use event_repository::{DynamoEventRepository, EventRepository};
pub use feedback_publisher::{FeedbackNotification, FeedbackPublisher, PublishError, SqsFeedbackPublisher};
pub use logging::init_logging;
pub use receiver_repository::{DynamoReceiverRepository, ReceiverRepository};
pub use relationship_repository::{DynamoRelationshipRepository, RelationshipRepository};
pub use repository_error::{PutOutcome, RepositoryError};
pub use user_repository::{DynamoUserRepository, UserRepository};
