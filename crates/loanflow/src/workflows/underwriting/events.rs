use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicationId, ApplicationStatus, Decision, QueueItemId, StipulationId, UnderwriterId,
};

/// Domain events emitted by the underwriting service so downstream consumers
/// (notifications, document generation, workflow automation) subscribe
/// explicitly instead of hooking persistence side effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UnderwritingEvent {
    QueueItemAssigned {
        queue_item_id: QueueItemId,
        application_id: ApplicationId,
        underwriter: UnderwriterId,
    },
    ReviewStarted {
        queue_item_id: QueueItemId,
        application_id: ApplicationId,
    },
    QueueItemReturned {
        queue_item_id: QueueItemId,
        application_id: ApplicationId,
    },
    DecisionRecorded {
        application_id: ApplicationId,
        decision: Decision,
        status: ApplicationStatus,
    },
    StipulationSatisfied {
        stipulation_id: StipulationId,
        application_id: ApplicationId,
    },
}

/// Trait describing outbound event hooks (notification dispatch, document
/// generation, audit feeds).
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: UnderwritingEvent) -> Result<(), EventError>;
}

/// Event dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("event transport unavailable: {0}")]
    Transport(String),
}
