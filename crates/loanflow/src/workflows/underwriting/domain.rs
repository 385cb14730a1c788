use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for loan applications owned by the application-management subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for underwriting queue entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueItemId(pub String);

/// Identifier wrapper for stipulation records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StipulationId(pub String);

/// Identifier wrapper for underwriters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnderwriterId(pub String);

/// Lifecycle of a loan application as tracked by the surrounding platform.
/// Underwriting only ever writes this field through the decision mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    InReview,
    Approved,
    Denied,
    RevisionRequested,
    ReadyToFund,
    Funded,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::InReview => "in_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Denied => "denied",
            ApplicationStatus::RevisionRequested => "revision_requested",
            ApplicationStatus::ReadyToFund => "ready_to_fund",
            ApplicationStatus::Funded => "funded",
        }
    }
}

/// The three-way underwriting verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Deny,
    Revise,
}

impl Decision {
    pub const fn label(self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Deny => "deny",
            Decision::Revise => "revise",
        }
    }

    /// Fixed mapping applied to the application record when a decision is recorded.
    pub const fn application_status(self) -> ApplicationStatus {
        match self {
            Decision::Approve => ApplicationStatus::Approved,
            Decision::Deny => ApplicationStatus::Denied,
            Decision::Revise => ApplicationStatus::RevisionRequested,
        }
    }
}

/// Borrower citizenship classifications collected at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitizenshipStatus {
    UsCitizen,
    PermanentResident,
    EligibleNonCitizen,
    ForeignNational,
}

impl CitizenshipStatus {
    /// Federal student-loan eligibility gate.
    pub const fn is_loan_eligible(self) -> bool {
        matches!(
            self,
            CitizenshipStatus::UsCitizen
                | CitizenshipStatus::PermanentResident
                | CitizenshipStatus::EligibleNonCitizen
        )
    }
}

/// Enrollment status of the school program attached to an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramStatus {
    Active,
    Suspended,
    Discontinued,
}

/// Machine-readable reason codes attached to adverse decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    CreditScore,
    DebtToIncome,
    EmploymentHistory,
    HousingPayment,
    IncomeInsufficient,
    CitizenshipStatus,
    ProgramEligibility,
    DocumentationIssues,
    IdentityVerification,
    Other,
}

impl ReasonCode {
    pub const fn default_description(self) -> &'static str {
        match self {
            ReasonCode::CreditScore => "Credit score below lending guidelines",
            ReasonCode::DebtToIncome => "Debt-to-income ratio exceeds lending guidelines",
            ReasonCode::EmploymentHistory => "Insufficient employment history",
            ReasonCode::HousingPayment => "Housing payment obligation too high relative to income",
            ReasonCode::IncomeInsufficient => "Income insufficient for requested loan amount",
            ReasonCode::CitizenshipStatus => "Citizenship status not eligible for this loan program",
            ReasonCode::ProgramEligibility => "School program is not active for new originations",
            ReasonCode::DocumentationIssues => "Submitted documentation incomplete or inconsistent",
            ReasonCode::IdentityVerification => "Borrower identity could not be verified",
            ReasonCode::Other => "See underwriter comments",
        }
    }
}

/// Documentation requirements a borrower must clear before funding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StipulationType {
    EnrollmentAgreement,
    ProofOfIncome,
    ProofOfIdentity,
    ProofOfResidence,
    AdditionalDocumentation,
}

impl StipulationType {
    pub const fn label(self) -> &'static str {
        match self {
            StipulationType::EnrollmentAgreement => "enrollment_agreement",
            StipulationType::ProofOfIncome => "proof_of_income",
            StipulationType::ProofOfIdentity => "proof_of_identity",
            StipulationType::ProofOfResidence => "proof_of_residence",
            StipulationType::AdditionalDocumentation => "additional_documentation",
        }
    }
}

/// Review-turnaround tiers for queue entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueuePriority {
    High,
    Medium,
    Low,
}

impl QueuePriority {
    /// Target turnaround, in hours, for a queue item of this priority.
    pub const fn sla_hours(self) -> i64 {
        match self {
            QueuePriority::High => 24,
            QueuePriority::Medium => 48,
            QueuePriority::Low => 72,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            QueuePriority::High => "high",
            QueuePriority::Medium => "medium",
            QueuePriority::Low => "low",
        }
    }
}

/// Workflow states of an underwriting queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Returned,
}

impl QueueStatus {
    pub const fn label(self) -> &'static str {
        match self {
            QueueStatus::Pending => "pending",
            QueueStatus::Assigned => "assigned",
            QueueStatus::InProgress => "in_progress",
            QueueStatus::Completed => "completed",
            QueueStatus::Returned => "returned",
        }
    }
}

/// Lifecycle of a stipulation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StipulationStatus {
    Pending,
    Satisfied,
    Waived,
    Expired,
}

impl StipulationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            StipulationStatus::Pending => "pending",
            StipulationStatus::Satisfied => "satisfied",
            StipulationStatus::Waived => "waived",
            StipulationStatus::Expired => "expired",
        }
    }
}

/// Loan terms requested on the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDetails {
    pub requested_amount: f64,
}

/// Employment record attached to a borrower, when one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentInfo {
    pub employer: String,
    pub months_employed: u32,
}

/// Borrower financial profile as supplied by intake. Every field an intake
/// form can leave blank is optional; the evaluators degrade to a
/// consideration verdict rather than fail on missing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerProfile {
    pub citizenship_status: Option<CitizenshipStatus>,
    pub employment: Option<EmploymentInfo>,
    pub annual_income: Option<f64>,
    pub monthly_income: Option<f64>,
    pub monthly_housing_payment: Option<f64>,
}

/// Minimal program descriptor read from the school-management subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSnapshot {
    pub program_code: String,
    pub status: ProgramStatus,
}

/// Read-only view of a loan application handed to the underwriting core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSnapshot {
    pub application_id: ApplicationId,
    pub loan: LoanDetails,
    pub borrower: BorrowerProfile,
    pub program: Option<ProgramSnapshot>,
    pub status: ApplicationStatus,
}

/// Credit-bureau pull for one borrower on one application. Created by the
/// external credit workflow and consumed read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditInformation {
    pub credit_score: Option<u16>,
    pub debt_to_income_ratio: Option<f64>,
    pub monthly_debt: Option<f64>,
    pub report_reference: Option<String>,
    pub report_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_co_borrower: bool,
}
