// Domain layer modules
pub mod authorization;
pub mod event_entry;
pub mod event_kind;
pub mod id;
pub mod receiver;
pub mod relationship;
pub mod user;

// Re-exports
pub use authorization::{is_caregiver, is_primary_caregiver};
pub use event_entry::{EventEntry, EventOptions, EventPayload, WeightData};
pub use event_kind::{EventError, EventKind};
pub use id::{RECEIVER_PREFIX, USER_PREFIX, new_id};
pub use receiver::Receiver;
pub use relationship::Relationship;
pub use user::User;
