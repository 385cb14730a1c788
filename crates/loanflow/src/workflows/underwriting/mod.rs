//! Underwriting queue management, rules-based evaluation, and decision
//! recording for student-loan applications.
//!
//! The evaluation engine is pure: application and credit data come in as
//! read-only snapshots, a verdict with its factor trail comes out. Persistent
//! state (queue entries, decisions, stipulations) lives behind the
//! [`repository::UnderwritingStore`] trait, and side effects leave through
//! [`events::EventPublisher`].

pub mod domain;
pub(crate) mod evaluation;
pub mod events;
pub mod queue;
pub mod records;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, ApplicationSnapshot, ApplicationStatus, BorrowerProfile, CitizenshipStatus,
    CreditInformation, Decision, EmploymentInfo, LoanDetails, ProgramSnapshot, ProgramStatus,
    QueueItemId, QueuePriority, QueueStatus, ReasonCode, StipulationId, StipulationStatus,
    StipulationType, UnderwriterId,
};
pub use evaluation::{
    calculate_weighted_score, determine_required_stipulations, evaluate_application,
    get_decision_reasons, AutoDecision, EvaluationOutcome, EvaluationResults, FactorEvaluation,
    FactorStatus, UnderwritingRuleEngine,
};
pub use events::{EventError, EventPublisher, UnderwritingEvent};
pub use queue::QueueItem;
pub use records::{
    ApprovalTerms, DecisionReason, DecisionRecord, DecisionRuling, Stipulation,
};
pub use repository::{QueueItemView, StoreError, UnderwritingStore};
pub use router::underwriting_router;
pub use service::{RecordDecisionRequest, ServiceError, UnderwritingService};
