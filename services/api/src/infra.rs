use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use loanflow::workflows::underwriting::{
    ApplicationId, ApplicationStatus, DecisionRecord, EventError, EventPublisher, QueueItem,
    QueueItemId, QueueStatus, Stipulation, StipulationId, StoreError, UnderwritingEvent,
    UnderwritingStore,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct StoreInner {
    queue: HashMap<QueueItemId, QueueItem>,
    decisions: HashMap<ApplicationId, DecisionRecord>,
    stipulations: HashMap<StipulationId, Stipulation>,
    application_statuses: HashMap<ApplicationId, ApplicationStatus>,
}

/// Process-local store backing the service until the SQL adapter lands.
/// Honors the same version compare-and-swap contract the trait documents.
#[derive(Default, Clone)]
pub(crate) struct InMemoryUnderwritingStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl InMemoryUnderwritingStore {
    pub(crate) fn application_status(&self, id: &ApplicationId) -> Option<ApplicationStatus> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        guard.application_statuses.get(id).copied()
    }
}

impl UnderwritingStore for InMemoryUnderwritingStore {
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
            .filter(|item| item.status == QueueStatus::Pending)
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

/// Event sink that keeps the emitted history for demos and inspection.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEventPublisher {
    events: Arc<Mutex<Vec<UnderwritingEvent>>>,
}

impl InMemoryEventPublisher {
    pub(crate) fn events(&self) -> Vec<UnderwritingEvent> {
        self.events.lock().expect("event mutex poisoned").clone()
    }
}

impl EventPublisher for InMemoryEventPublisher {
    fn publish(&self, event: UnderwritingEvent) -> Result<(), EventError> {
        let mut guard = self.events.lock().expect("event mutex poisoned");
        guard.push(event);
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
