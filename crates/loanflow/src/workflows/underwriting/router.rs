use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    ApplicationId, ApplicationSnapshot, CreditInformation, Decision, QueueItemId, QueuePriority,
    ReasonCode, StipulationId, StipulationType, UnderwriterId,
};
use super::evaluation::EvaluationResults;
use super::events::EventPublisher;
use super::repository::{QueueItemView, StoreError, UnderwritingStore};
use super::service::{RecordDecisionRequest, ServiceError, UnderwritingService};

/// Router builder exposing the underwriting queue, evaluation, and decision
/// endpoints.
pub fn underwriting_router<S, E>(service: Arc<UnderwritingService<S, E>>) -> Router
where
    S: UnderwritingStore + 'static,
    E: EventPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/underwriting/queue",
            post(enqueue_handler::<S, E>).get(pending_queue_handler::<S, E>),
        )
        .route(
            "/api/v1/underwriting/queue/:queue_item_id/assign",
            post(assign_handler::<S, E>),
        )
        .route(
            "/api/v1/underwriting/queue/:queue_item_id/start",
            post(start_review_handler::<S, E>),
        )
        .route(
            "/api/v1/underwriting/queue/:queue_item_id/return",
            post(return_handler::<S, E>),
        )
        .route(
            "/api/v1/underwriting/queue/:queue_item_id/decision",
            post(decision_handler::<S, E>),
        )
        .route(
            "/api/v1/underwriting/evaluations",
            post(evaluate_handler::<S, E>),
        )
        .route(
            "/api/v1/underwriting/applications/:application_id/stipulations",
            get(stipulations_handler::<S, E>),
        )
        .route(
            "/api/v1/underwriting/stipulations/:stipulation_id/satisfy",
            post(satisfy_handler::<S, E>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnqueueRequest {
    pub(crate) application_id: String,
    pub(crate) priority: QueuePriority,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignRequest {
    pub(crate) underwriter: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SatisfyRequest {
    pub(crate) user: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluationRequest {
    pub(crate) application: ApplicationSnapshot,
    pub(crate) credit: CreditInformation,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluationResponse {
    pub(crate) application_id: ApplicationId,
    pub(crate) decision: Decision,
    pub(crate) reasons: Vec<ReasonCode>,
    pub(crate) stipulations: Vec<StipulationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) score: Option<f64>,
    pub(crate) risk_score: f64,
    pub(crate) fast_path: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) results: Option<EvaluationResults>,
}

fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::Store(StoreError::Conflict)
        | ServiceError::QueueTransitionRejected { .. }
        | ServiceError::StipulationTransitionRejected { .. } => StatusCode::CONFLICT,
        ServiceError::Store(StoreError::Unavailable(_)) | ServiceError::Event(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn enqueue_handler<S, E>(
    State(service): State<Arc<UnderwritingService<S, E>>>,
    axum::Json(request): axum::Json<EnqueueRequest>,
) -> Response
where
    S: UnderwritingStore + 'static,
    E: EventPublisher + 'static,
{
    match service.enqueue(ApplicationId(request.application_id), request.priority) {
        Ok(item) => {
            let view = QueueItemView::from_item(&item, Utc::now());
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn pending_queue_handler<S, E>(
    State(service): State<Arc<UnderwritingService<S, E>>>,
) -> Response
where
    S: UnderwritingStore + 'static,
    E: EventPublisher + 'static,
{
    match service.pending_queue(100) {
        Ok(items) => {
            let now = Utc::now();
            let views: Vec<QueueItemView> = items
                .iter()
                .map(|item| QueueItemView::from_item(item, now))
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assign_handler<S, E>(
    State(service): State<Arc<UnderwritingService<S, E>>>,
    Path(queue_item_id): Path<String>,
    axum::Json(request): axum::Json<AssignRequest>,
) -> Response
where
    S: UnderwritingStore + 'static,
    E: EventPublisher + 'static,
{
    let id = QueueItemId(queue_item_id);
    match service.assign(&id, UnderwriterId(request.underwriter)) {
        Ok(item) => {
            let view = QueueItemView::from_item(&item, Utc::now());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn start_review_handler<S, E>(
    State(service): State<Arc<UnderwritingService<S, E>>>,
    Path(queue_item_id): Path<String>,
) -> Response
where
    S: UnderwritingStore + 'static,
    E: EventPublisher + 'static,
{
    let id = QueueItemId(queue_item_id);
    match service.start_review(&id) {
        Ok(item) => {
            let view = QueueItemView::from_item(&item, Utc::now());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn return_handler<S, E>(
    State(service): State<Arc<UnderwritingService<S, E>>>,
    Path(queue_item_id): Path<String>,
) -> Response
where
    S: UnderwritingStore + 'static,
    E: EventPublisher + 'static,
{
    let id = QueueItemId(queue_item_id);
    match service.return_to_queue(&id) {
        Ok(item) => {
            let view = QueueItemView::from_item(&item, Utc::now());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decision_handler<S, E>(
    State(service): State<Arc<UnderwritingService<S, E>>>,
    Path(queue_item_id): Path<String>,
    axum::Json(request): axum::Json<RecordDecisionRequest>,
) -> Response
where
    S: UnderwritingStore + 'static,
    E: EventPublisher + 'static,
{
    let id = QueueItemId(queue_item_id);
    match service.record_decision(&id, request) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluate_handler<S, E>(
    State(service): State<Arc<UnderwritingService<S, E>>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response
where
    S: UnderwritingStore + 'static,
    E: EventPublisher + 'static,
{
    let EvaluationRequest {
        application,
        credit,
    } = request;

    let risk_score = service.risk_score(&application, &credit);

    let response = match service.auto_decision(&application, &credit) {
        Some(auto) => EvaluationResponse {
            application_id: application.application_id.clone(),
            decision: auto.decision,
            reasons: auto.reasons,
            stipulations: auto.stipulations,
            score: None,
            risk_score,
            fast_path: true,
            results: None,
        },
        None => {
            let outcome = service.evaluate(&application, &credit);
            EvaluationResponse {
                application_id: outcome.application_id,
                decision: outcome.decision,
                reasons: outcome.reasons,
                stipulations: outcome.stipulations,
                score: Some(outcome.score),
                risk_score,
                fast_path: false,
                results: Some(outcome.results),
            }
        }
    };

    (StatusCode::OK, axum::Json(response)).into_response()
}

pub(crate) async fn stipulations_handler<S, E>(
    State(service): State<Arc<UnderwritingService<S, E>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: UnderwritingStore + 'static,
    E: EventPublisher + 'static,
{
    let id = ApplicationId(application_id);
    match service.stipulations_for(&id) {
        Ok(stipulations) => (StatusCode::OK, axum::Json(stipulations)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn satisfy_handler<S, E>(
    State(service): State<Arc<UnderwritingService<S, E>>>,
    Path(stipulation_id): Path<String>,
    axum::Json(request): axum::Json<SatisfyRequest>,
) -> Response
where
    S: UnderwritingStore + 'static,
    E: EventPublisher + 'static,
{
    let id = StipulationId(stipulation_id);
    match service.satisfy_stipulation(&id, UnderwriterId(request.user)) {
        Ok(stipulation) => (StatusCode::OK, axum::Json(stipulation)).into_response(),
        Err(error) => error_response(error),
    }
}
