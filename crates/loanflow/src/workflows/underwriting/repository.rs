use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{ApplicationId, ApplicationStatus, QueueItemId, StipulationId};
use super::queue::QueueItem;
use super::records::{DecisionRecord, Stipulation};

/// Storage abstraction over the underwriting aggregates so the service module
/// can be exercised in isolation.
///
/// `update_queue_item` and `update_stipulation` are compare-and-swap writes:
/// the store accepts the record only when its persisted `version` matches the
/// incoming one, returns the record with the version bumped, and reports
/// `StoreError::Conflict` otherwise. Racing state transitions therefore
/// resolve to exactly one winner.
pub trait UnderwritingStore: Send + Sync {
    fn insert_queue_item(&self, item: QueueItem) -> Result<QueueItem, StoreError>;
    fn update_queue_item(&self, item: QueueItem) -> Result<QueueItem, StoreError>;
    fn fetch_queue_item(&self, id: &QueueItemId) -> Result<Option<QueueItem>, StoreError>;
    fn pending_queue(&self, limit: usize) -> Result<Vec<QueueItem>, StoreError>;

    fn insert_decision(&self, record: DecisionRecord) -> Result<DecisionRecord, StoreError>;
    fn fetch_decision(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<DecisionRecord>, StoreError>;

    fn insert_stipulations(
        &self,
        stipulations: Vec<Stipulation>,
    ) -> Result<Vec<Stipulation>, StoreError>;
    fn update_stipulation(&self, stipulation: Stipulation) -> Result<Stipulation, StoreError>;
    fn fetch_stipulation(&self, id: &StipulationId) -> Result<Option<Stipulation>, StoreError>;
    fn stipulations_for(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<Stipulation>, StoreError>;

    /// Push the decision-mapped status onto the externally-owned application
    /// record. The only write underwriting performs outside its own tables.
    fn set_application_status(
        &self,
        application_id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists or was modified concurrently")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized queue-entry representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct QueueItemView {
    pub queue_item_id: QueueItemId,
    pub application_id: ApplicationId,
    pub status: &'static str,
    pub priority: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub due_date: DateTime<Utc>,
    pub overdue: bool,
}

impl QueueItemView {
    pub fn from_item(item: &QueueItem, now: DateTime<Utc>) -> Self {
        Self {
            queue_item_id: item.id.clone(),
            application_id: item.application_id.clone(),
            status: item.status.label(),
            priority: item.priority.label(),
            assigned_to: item
                .assigned_to
                .as_ref()
                .map(|underwriter| underwriter.0.clone()),
            due_date: item.due_date,
            overdue: item.is_overdue(now),
        }
    }
}
