use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::underwriting::domain::{
    ApplicationId, ApplicationSnapshot, ApplicationStatus, BorrowerProfile, CitizenshipStatus,
    CreditInformation, EmploymentInfo, LoanDetails, ProgramSnapshot, ProgramStatus, QueueItemId,
    StipulationId,
};
use crate::workflows::underwriting::events::{EventError, EventPublisher, UnderwritingEvent};
use crate::workflows::underwriting::queue::QueueItem;
use crate::workflows::underwriting::records::{DecisionRecord, Stipulation};
use crate::workflows::underwriting::repository::{StoreError, UnderwritingStore};
use crate::workflows::underwriting::router::underwriting_router;
use crate::workflows::underwriting::service::UnderwritingService;

pub(super) fn strong_borrower() -> BorrowerProfile {
    BorrowerProfile {
        citizenship_status: Some(CitizenshipStatus::UsCitizen),
        employment: Some(EmploymentInfo {
            employer: "Cedar Analytics".to_string(),
            months_employed: 36,
        }),
        annual_income: Some(80_000.0),
        monthly_income: Some(6_600.0),
        monthly_housing_payment: Some(1_320.0),
    }
}

pub(super) fn active_program() -> ProgramSnapshot {
    ProgramSnapshot {
        program_code: "CS-BS".to_string(),
        status: ProgramStatus::Active,
    }
}

pub(super) fn application(suffix: &str) -> ApplicationSnapshot {
    ApplicationSnapshot {
        application_id: ApplicationId(format!("app-{suffix}")),
        loan: LoanDetails {
            requested_amount: 20_000.0,
        },
        borrower: strong_borrower(),
        program: Some(active_program()),
        status: ApplicationStatus::InReview,
    }
}

pub(super) fn credit(score: Option<u16>, dti: Option<f64>) -> CreditInformation {
    CreditInformation {
        credit_score: score,
        debt_to_income_ratio: dti,
        monthly_debt: dti.map(|ratio| ratio * 6_600.0),
        report_reference: Some("bureau-ref-001".to_string()),
        report_date: NaiveDate::from_ymd_opt(2025, 6, 1),
        is_co_borrower: false,
    }
}

pub(super) fn strong_credit() -> CreditInformation {
    credit(Some(750), Some(0.25))
}

pub(super) fn required_by() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 30).expect("valid date")
}

pub(super) fn build_service() -> (
    UnderwritingService<MemoryStore, RecordingPublisher>,
    Arc<MemoryStore>,
    Arc<RecordingPublisher>,
) {
    let store = Arc::new(MemoryStore::default());
    let events = Arc::new(RecordingPublisher::default());
    let service = UnderwritingService::new(store.clone(), events.clone());
    (service, store, events)
}

pub(super) fn underwriting_router_with_service(
    service: UnderwritingService<MemoryStore, RecordingPublisher>,
) -> axum::Router {
    underwriting_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default)]
struct MemoryStoreInner {
    queue: HashMap<QueueItemId, QueueItem>,
    decisions: HashMap<ApplicationId, DecisionRecord>,
    stipulations: HashMap<StipulationId, Stipulation>,
    application_statuses: HashMap<ApplicationId, ApplicationStatus>,
}

/// In-memory store with the same compare-and-swap contract a SQL adapter
/// would honor.
#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

impl MemoryStore {
    pub(super) fn application_status(&self, id: &ApplicationId) -> Option<ApplicationStatus> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        guard.application_statuses.get(id).copied()
    }
}

impl UnderwritingStore for MemoryStore {
    fn insert_queue_item(&self, item: QueueItem) -> Result<QueueItem, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        if guard.queue.contains_key(&item.id) {
            return Err(StoreError::Conflict);
        }
        guard.queue.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    fn update_queue_item(&self, mut item: QueueItem) -> Result<QueueItem, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let stored = guard.queue.get(&item.id).ok_or(StoreError::NotFound)?;
        if stored.version != item.version {
            return Err(StoreError::Conflict);
        }
        item.version += 1;
        guard.queue.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    fn fetch_queue_item(&self, id: &QueueItemId) -> Result<Option<QueueItem>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.queue.get(id).cloned())
    }

    fn pending_queue(&self, limit: usize) -> Result<Vec<QueueItem>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard
            .queue
            .values()
            .filter(|item| {
                item.status == crate::workflows::underwriting::domain::QueueStatus::Pending
            })
            .take(limit)
            .cloned()
            .collect())
    }

    fn insert_decision(&self, record: DecisionRecord) -> Result<DecisionRecord, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        if guard.decisions.contains_key(&record.application_id) {
            return Err(StoreError::Conflict);
        }
        guard
            .decisions
            .insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch_decision(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<DecisionRecord>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.decisions.get(application_id).cloned())
    }

    fn insert_stipulations(
        &self,
        stipulations: Vec<Stipulation>,
    ) -> Result<Vec<Stipulation>, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        for stipulation in &stipulations {
            if guard.stipulations.contains_key(&stipulation.id) {
                return Err(StoreError::Conflict);
            }
        }
        for stipulation in &stipulations {
            guard
                .stipulations
                .insert(stipulation.id.clone(), stipulation.clone());
        }
        Ok(stipulations)
    }

    fn update_stipulation(&self, mut stipulation: Stipulation) -> Result<Stipulation, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let stored = guard
            .stipulations
            .get(&stipulation.id)
            .ok_or(StoreError::NotFound)?;
        if stored.version != stipulation.version {
            return Err(StoreError::Conflict);
        }
        stipulation.version += 1;
        guard
            .stipulations
            .insert(stipulation.id.clone(), stipulation.clone());
        Ok(stipulation)
    }

    fn fetch_stipulation(&self, id: &StipulationId) -> Result<Option<Stipulation>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.stipulations.get(id).cloned())
    }

    fn stipulations_for(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<Stipulation>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard
            .stipulations
            .values()
            .filter(|stipulation| &stipulation.application_id == application_id)
            .cloned()
            .collect())
    }

    fn set_application_status(
        &self,
        application_id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard
            .application_statuses
            .insert(application_id.clone(), status);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingPublisher {
    events: Arc<Mutex<Vec<UnderwritingEvent>>>,
}

impl RecordingPublisher {
    pub(super) fn events(&self) -> Vec<UnderwritingEvent> {
        self.events.lock().expect("event mutex poisoned").clone()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: UnderwritingEvent) -> Result<(), EventError> {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .push(event);
        Ok(())
    }
}

/// Store double that reports the backing database offline.
pub(super) struct UnavailableStore;

impl UnderwritingStore for UnavailableStore {
    fn insert_queue_item(&self, _item: QueueItem) -> Result<QueueItem, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update_queue_item(&self, _item: QueueItem) -> Result<QueueItem, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch_queue_item(&self, _id: &QueueItemId) -> Result<Option<QueueItem>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn pending_queue(&self, _limit: usize) -> Result<Vec<QueueItem>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn insert_decision(&self, _record: DecisionRecord) -> Result<DecisionRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch_decision(
        &self,
        _application_id: &ApplicationId,
    ) -> Result<Option<DecisionRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn insert_stipulations(
        &self,
        _stipulations: Vec<Stipulation>,
    ) -> Result<Vec<Stipulation>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update_stipulation(&self, _stipulation: Stipulation) -> Result<Stipulation, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch_stipulation(&self, _id: &StipulationId) -> Result<Option<Stipulation>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn stipulations_for(
        &self,
        _application_id: &ApplicationId,
    ) -> Result<Vec<Stipulation>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn set_application_status(
        &self,
        _application_id: &ApplicationId,
        _status: ApplicationStatus,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}
