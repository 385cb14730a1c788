use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicationId, ApplicationStatus, Decision, ReasonCode, StipulationId, StipulationStatus,
    StipulationType, UnderwriterId,
};

/// Loan terms offered with an approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalTerms {
    pub approved_amount: f64,
    pub interest_rate: f64,
    pub term_months: u16,
}

/// A recorded verdict. Approval terms travel inside the approve variant, so a
/// denial or revision cannot carry them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum DecisionRuling {
    Approve(ApprovalTerms),
    Deny,
    Revise,
}

impl DecisionRuling {
    pub const fn decision(&self) -> Decision {
        match self {
            DecisionRuling::Approve(_) => Decision::Approve,
            DecisionRuling::Deny => Decision::Deny,
            DecisionRuling::Revise => Decision::Revise,
        }
    }

    pub const fn application_status(&self) -> ApplicationStatus {
        self.decision().application_status()
    }

    pub fn terms(&self) -> Option<&ApprovalTerms> {
        match self {
            DecisionRuling::Approve(terms) => Some(terms),
            DecisionRuling::Deny | DecisionRuling::Revise => None,
        }
    }
}

/// One machine-readable reason attached to a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionReason {
    pub code: ReasonCode,
    pub description: String,
    #[serde(default)]
    pub is_primary: bool,
}

impl DecisionReason {
    /// Build a reason with the code's stock description.
    pub fn new(code: ReasonCode) -> Self {
        Self {
            code,
            description: code.default_description().to_string(),
            is_primary: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }
}

/// The persisted underwriting decision for one application. One per
/// application; stores reject duplicates so the application-status push
/// happens exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub application_id: ApplicationId,
    pub ruling: DecisionRuling,
    pub decision_date: DateTime<Utc>,
    pub underwriter: UnderwriterId,
    pub comments: Option<String>,
    pub reasons: Vec<DecisionReason>,
}

impl DecisionRecord {
    pub fn new(
        application_id: ApplicationId,
        ruling: DecisionRuling,
        underwriter: UnderwriterId,
        comments: Option<String>,
        reasons: Vec<DecisionReason>,
        decision_date: DateTime<Utc>,
    ) -> Self {
        Self {
            application_id,
            ruling,
            decision_date,
            underwriter,
            comments,
            reasons,
        }
    }
}

/// A documentation requirement the borrower or school must clear before the
/// loan can fund. `satisfied_by` and `satisfied_at` are set together or not
/// at all; `satisfy` is the only writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stipulation {
    pub id: StipulationId,
    pub application_id: ApplicationId,
    pub stipulation_type: StipulationType,
    pub description: String,
    pub required_by_date: NaiveDate,
    pub status: StipulationStatus,
    pub created_by: UnderwriterId,
    pub satisfied_by: Option<UnderwriterId>,
    pub satisfied_at: Option<DateTime<Utc>>,
    pub version: u32,
}

impl Stipulation {
    pub fn new(
        id: StipulationId,
        application_id: ApplicationId,
        stipulation_type: StipulationType,
        required_by_date: NaiveDate,
        created_by: UnderwriterId,
    ) -> Self {
        Self {
            id,
            application_id,
            stipulation_type,
            description: format!("Provide {}", stipulation_type.label().replace('_', " ")),
            required_by_date,
            status: StipulationStatus::Pending,
            created_by,
            satisfied_by: None,
            satisfied_at: None,
            version: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the requirement met. Only a pending stipulation can be satisfied.
    pub fn satisfy(&mut self, user: UnderwriterId, now: DateTime<Utc>) -> bool {
        if self.status != StipulationStatus::Pending {
            return false;
        }

        self.status = StipulationStatus::Satisfied;
        self.satisfied_by = Some(user);
        self.satisfied_at = Some(now);
        true
    }

    /// Waive the requirement. Only a pending stipulation can be waived.
    pub fn waive(&mut self) -> bool {
        if self.status != StipulationStatus::Pending {
            return false;
        }

        self.status = StipulationStatus::Waived;
        true
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.required_by_date < today
            && !matches!(
                self.status,
                StipulationStatus::Satisfied | StipulationStatus::Waived
            )
    }
}
