use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationId, QueueItemId, QueuePriority, QueueStatus, UnderwriterId};

/// One application's place in the underwriting review queue.
///
/// Transitions are guarded methods returning `bool`: a rejected transition is
/// an expected negative-path outcome for callers to surface, not an error.
/// `version` is the optimistic-concurrency token checked by stores on update,
/// so two racing transitions resolve to one winner and one conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: QueueItemId,
    pub application_id: ApplicationId,
    pub priority: QueuePriority,
    pub status: QueueStatus,
    pub assigned_to: Option<UnderwriterId>,
    pub assignment_date: Option<DateTime<Utc>>,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub version: u32,
}

impl QueueItem {
    /// Create a pending queue entry with the due date derived from the
    /// priority's turnaround target.
    pub fn new(
        id: QueueItemId,
        application_id: ApplicationId,
        priority: QueuePriority,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            application_id,
            priority,
            status: QueueStatus::Pending,
            assigned_to: None,
            assignment_date: None,
            due_date: now + Duration::hours(priority.sla_hours()),
            created_at: now,
            version: 0,
        }
    }

    /// Override the derived due date (e.g., an operator-set deadline).
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Hand the item to an underwriter. Rejects a blank underwriter id.
    pub fn assign(&mut self, underwriter: UnderwriterId, now: DateTime<Utc>) -> bool {
        if underwriter.0.trim().is_empty() {
            return false;
        }

        self.assigned_to = Some(underwriter);
        self.assignment_date = Some(now);
        self.status = QueueStatus::Assigned;
        true
    }

    /// Begin review. Requires an assignee.
    pub fn start_review(&mut self) -> bool {
        if self.assigned_to.is_none() {
            return false;
        }

        self.status = QueueStatus::InProgress;
        true
    }

    /// Close out the item once a decision is recorded. Requires an in-progress review.
    pub fn complete(&mut self) -> bool {
        if self.status != QueueStatus::InProgress {
            return false;
        }

        self.status = QueueStatus::Completed;
        true
    }

    /// Send the item back to the pool, dropping the assignment.
    pub fn return_to_queue(&mut self) -> bool {
        self.status = QueueStatus::Returned;
        self.assigned_to = None;
        self.assignment_date = None;
        true
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now && self.status != QueueStatus::Completed
    }
}
