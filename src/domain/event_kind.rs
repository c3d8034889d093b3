/// Care event kinds
///
/// The catalog is closed: adding a kind means adding a variant here and a payload
/// variant in `EventPayload`.
use thiserror::Error;

/// Errors raised while resolving or validating a care event
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EventError {
    #[error("unsupported event kind: {0}")]
    UnsupportedKind(String),

    /// The kind requires a data payload and none was supplied
    #[error("event data is required for {0}")]
    MissingData(&'static str),

    #[error("invalid event data for {kind}: {reason}")]
    InvalidData { kind: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Shower,
    Medication,
    Urination,
    BowelMovement,
    /// Requires a numeric `weight` payload
    Weight,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Shower,
        EventKind::Medication,
        EventKind::Urination,
        EventKind::BowelMovement,
        EventKind::Weight,
    ];

    /// Resolve a kind from its exact name (`"Shower"`, `"BowelMovement"`, ...)
    pub fn from_name(name: &str) -> Result<Self, EventError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| EventError::UnsupportedKind(name.to_string()))
    }

    /// Kind name, also used as the event ID prefix
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Shower => "Shower",
            EventKind::Medication => "Medication",
            EventKind::Urination => "Urination",
            EventKind::BowelMovement => "BowelMovement",
            EventKind::Weight => "Weight",
        }
    }

    /// Whether the kind carries payload fields
    pub fn has_data(&self) -> bool {
        matches!(self, EventKind::Weight)
    }
}
