use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use super::domain::{
    ApplicationId, ApplicationSnapshot, CreditInformation, QueueItemId, QueuePriority, QueueStatus,
    ReasonCode, StipulationId, StipulationStatus, StipulationType, UnderwriterId,
};
use super::evaluation::{AutoDecision, EvaluationOutcome, UnderwritingRuleEngine};
use super::events::{EventError, EventPublisher, UnderwritingEvent};
use super::queue::QueueItem;
use super::records::{DecisionReason, DecisionRecord, DecisionRuling, Stipulation};
use super::repository::{StoreError, UnderwritingStore};

/// Service composing the rule engine, the underwriting store, and the event
/// publisher into the operations the API layer exposes.
pub struct UnderwritingService<S, E> {
    store: Arc<S>,
    events: Arc<E>,
    engine: UnderwritingRuleEngine,
}

static QUEUE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static STIPULATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_queue_item_id() -> QueueItemId {
    let id = QUEUE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    QueueItemId(format!("uwq-{id:06}"))
}

fn next_stipulation_id() -> StipulationId {
    let id = STIPULATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    StipulationId(format!("stip-{id:06}"))
}

/// Everything needed to record a verdict against an in-progress queue item.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordDecisionRequest {
    pub application_id: ApplicationId,
    pub ruling: DecisionRuling,
    pub underwriter: UnderwriterId,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub reasons: Vec<ReasonCode>,
    #[serde(default)]
    pub stipulations: Vec<StipulationType>,
    pub stipulations_required_by: NaiveDate,
}

impl<S, E> UnderwritingService<S, E>
where
    S: UnderwritingStore + 'static,
    E: EventPublisher + 'static,
{
    pub fn new(store: Arc<S>, events: Arc<E>) -> Self {
        Self {
            store,
            events,
            engine: UnderwritingRuleEngine::new(),
        }
    }

    /// Place an application into the review queue with an SLA-derived due date.
    pub fn enqueue(
        &self,
        application_id: ApplicationId,
        priority: QueuePriority,
    ) -> Result<QueueItem, ServiceError> {
        let item = QueueItem::new(next_queue_item_id(), application_id, priority, Utc::now());
        let stored = self.store.insert_queue_item(item)?;
        Ok(stored)
    }

    pub fn assign(
        &self,
        queue_item_id: &QueueItemId,
        underwriter: UnderwriterId,
    ) -> Result<QueueItem, ServiceError> {
        let mut item = self
            .store
            .fetch_queue_item(queue_item_id)?
            .ok_or(StoreError::NotFound)?;

        if !item.assign(underwriter.clone(), Utc::now()) {
            return Err(ServiceError::QueueTransitionRejected {
                operation: "assign",
                status: item.status,
            });
        }

        let stored = self.store.update_queue_item(item)?;
        self.events.publish(UnderwritingEvent::QueueItemAssigned {
            queue_item_id: stored.id.clone(),
            application_id: stored.application_id.clone(),
            underwriter,
        })?;
        Ok(stored)
    }

    pub fn start_review(&self, queue_item_id: &QueueItemId) -> Result<QueueItem, ServiceError> {
        let mut item = self
            .store
            .fetch_queue_item(queue_item_id)?
            .ok_or(StoreError::NotFound)?;

        if !item.start_review() {
            return Err(ServiceError::QueueTransitionRejected {
                operation: "start_review",
                status: item.status,
            });
        }

        let stored = self.store.update_queue_item(item)?;
        self.events.publish(UnderwritingEvent::ReviewStarted {
            queue_item_id: stored.id.clone(),
            application_id: stored.application_id.clone(),
        })?;
        Ok(stored)
    }

    pub fn return_to_queue(&self, queue_item_id: &QueueItemId) -> Result<QueueItem, ServiceError> {
        let mut item = self
            .store
            .fetch_queue_item(queue_item_id)?
            .ok_or(StoreError::NotFound)?;

        item.return_to_queue();

        let stored = self.store.update_queue_item(item)?;
        self.events.publish(UnderwritingEvent::QueueItemReturned {
            queue_item_id: stored.id.clone(),
            application_id: stored.application_id.clone(),
        })?;
        Ok(stored)
    }

    /// Full evaluation of an application and its credit pull. Pure; no writes.
    pub fn evaluate(
        &self,
        application: &ApplicationSnapshot,
        credit: &CreditInformation,
    ) -> EvaluationOutcome {
        self.engine.evaluate(application, credit)
    }

    /// Fast-path verdict for unambiguous profiles, when one exists.
    pub fn auto_decision(
        &self,
        application: &ApplicationSnapshot,
        credit: &CreditInformation,
    ) -> Option<AutoDecision> {
        self.engine.auto_decision(application, credit)
    }

    /// 0-100 display score for queue prioritization and reporting.
    pub fn risk_score(
        &self,
        application: &ApplicationSnapshot,
        credit: &CreditInformation,
    ) -> f64 {
        self.engine.risk_score(application, credit)
    }

    /// Record a verdict: persist the decision exactly once, push the mapped
    /// application status, materialize stipulations, and close the queue item.
    ///
    /// The decision insert is the idempotency gate; a duplicate surfaces as a
    /// store conflict before any other write happens.
    pub fn record_decision(
        &self,
        queue_item_id: &QueueItemId,
        request: RecordDecisionRequest,
    ) -> Result<DecisionRecord, ServiceError> {
        let mut item = self
            .store
            .fetch_queue_item(queue_item_id)?
            .ok_or(StoreError::NotFound)?;

        if !item.complete() {
            return Err(ServiceError::QueueTransitionRejected {
                operation: "complete",
                status: item.status,
            });
        }

        let RecordDecisionRequest {
            application_id,
            ruling,
            underwriter,
            comments,
            reasons,
            stipulations,
            stipulations_required_by,
        } = request;

        let decision = ruling.decision();
        let status = ruling.application_status();
        let reasons = reasons
            .into_iter()
            .enumerate()
            .map(|(index, code)| {
                let reason = DecisionReason::new(code);
                if index == 0 {
                    reason.primary()
                } else {
                    reason
                }
            })
            .collect();

        let record = DecisionRecord::new(
            application_id.clone(),
            ruling,
            underwriter.clone(),
            comments,
            reasons,
            Utc::now(),
        );

        let stored = self.store.insert_decision(record)?;
        self.store.update_queue_item(item)?;
        self.store.set_application_status(&application_id, status)?;

        if !stipulations.is_empty() {
            let records = stipulations
                .into_iter()
                .map(|stipulation_type| {
                    Stipulation::new(
                        next_stipulation_id(),
                        application_id.clone(),
                        stipulation_type,
                        stipulations_required_by,
                        underwriter.clone(),
                    )
                })
                .collect();
            self.store.insert_stipulations(records)?;
        }

        self.events.publish(UnderwritingEvent::DecisionRecorded {
            application_id: application_id.clone(),
            decision,
            status,
        })?;

        info!(
            application_id = %application_id.0,
            decision = decision.label(),
            "underwriting decision recorded"
        );

        Ok(stored)
    }

    pub fn satisfy_stipulation(
        &self,
        stipulation_id: &StipulationId,
        user: UnderwriterId,
    ) -> Result<Stipulation, ServiceError> {
        let mut stipulation = self
            .store
            .fetch_stipulation(stipulation_id)?
            .ok_or(StoreError::NotFound)?;

        if !stipulation.satisfy(user, Utc::now()) {
            return Err(ServiceError::StipulationTransitionRejected {
                status: stipulation.status,
            });
        }

        let stored = self.store.update_stipulation(stipulation)?;
        self.events
            .publish(UnderwritingEvent::StipulationSatisfied {
                stipulation_id: stored.id.clone(),
                application_id: stored.application_id.clone(),
            })?;
        Ok(stored)
    }

    pub fn pending_queue(&self, limit: usize) -> Result<Vec<QueueItem>, ServiceError> {
        Ok(self.store.pending_queue(limit)?)
    }

    pub fn decision_for(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<DecisionRecord>, ServiceError> {
        Ok(self.store.fetch_decision(application_id)?)
    }

    pub fn stipulations_for(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<Stipulation>, ServiceError> {
        Ok(self.store.stipulations_for(application_id)?)
    }
}

/// Error raised by the underwriting service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("'{operation}' is not a legal transition for a queue item in status {status:?}")]
    QueueTransitionRejected {
        operation: &'static str,
        status: QueueStatus,
    },
    #[error("stipulation cannot be satisfied in status {status:?}")]
    StipulationTransitionRejected { status: StipulationStatus },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Event(#[from] EventError),
}
