//! Domain event abstractions and the clock that timestamps them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Abstraction over system time so event timestamps are reproducible in tests.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that reads the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Metadata attached to every domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name, e.g. `game.zone_started`.
    pub event_type: String,
    /// Position in the journal, starting at 1.
    pub sequence_number: u64,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Builds metadata for the next event in a journal.
    #[must_use]
    pub fn next(event_type: &str, sequence_number: u64, clock: &dyn Clock) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.to_owned(),
            sequence_number,
            occurred_at: clock.now(),
        }
    }
}

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;
}

/// Flat, serializable view of any [`DomainEvent`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name, e.g. `game.zone_started`.
    pub event_type: &'static str,
    /// Position in the journal, starting at 1.
    pub sequence_number: u64,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
    /// Event-specific payload.
    pub payload: serde_json::Value,
}

impl EventRecord {
    /// Flattens `event` into its metadata and payload.
    #[must_use]
    pub fn from_event(event: &dyn DomainEvent) -> Self {
        let metadata = event.metadata();
        Self {
            event_id: metadata.event_id,
            event_type: event.event_type(),
            sequence_number: metadata.sequence_number,
            occurred_at: metadata.occurred_at,
            payload: event.to_payload(),
        }
    }
}
