use serde::{Deserialize, Serialize};

use super::super::domain::{CitizenshipStatus, ProgramSnapshot, ProgramStatus, ReasonCode};
use super::thresholds;

/// Per-factor verdict feeding the weighted blend and the short-circuit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorStatus {
    Approved,
    Denied,
    Consideration,
}

/// One factor's contribution to an evaluation.
///
/// Range-scored factors always carry a normalized score in [0, 1]; the binary
/// gates carry one only for the missing-input consideration default. A reason
/// code is present exactly when the factor denied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorEvaluation {
    pub status: FactorStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
}

impl FactorEvaluation {
    fn approved(score: Option<f64>) -> Self {
        Self {
            status: FactorStatus::Approved,
            score,
            reason: None,
        }
    }

    fn denied(score: Option<f64>, reason: ReasonCode) -> Self {
        Self {
            status: FactorStatus::Denied,
            score,
            reason: Some(reason),
        }
    }

    fn consideration(score: f64) -> Self {
        Self {
            status: FactorStatus::Consideration,
            score: Some(score),
            reason: None,
        }
    }

    /// Missing-input default: route toward manual review, never auto-deny.
    fn missing_input() -> Self {
        Self::consideration(0.5)
    }
}

/// Normalize `value` between the denial and approval thresholds.
///
/// The denial threshold maps to 0.0 and the approval threshold to 1.0, so the
/// same expression handles lower-is-better factors (where denial > approval).
/// A collapsed threshold span falls back to the neutral midpoint.
fn normalize_between(value: f64, denial: f64, approval: f64) -> f64 {
    let span = approval - denial;
    if span.abs() < f64::EPSILON {
        return 0.5;
    }
    ((value - denial) / span).clamp(0.0, 1.0)
}

pub fn evaluate_credit_score(credit_score: Option<u16>) -> FactorEvaluation {
    let Some(score) = credit_score else {
        return FactorEvaluation::missing_input();
    };

    if score >= thresholds::CREDIT_SCORE_APPROVAL {
        FactorEvaluation::approved(Some(1.0))
    } else if score <= thresholds::CREDIT_SCORE_DENIAL {
        FactorEvaluation::denied(Some(0.0), ReasonCode::CreditScore)
    } else {
        FactorEvaluation::consideration(normalize_between(
            f64::from(score),
            f64::from(thresholds::CREDIT_SCORE_DENIAL),
            f64::from(thresholds::CREDIT_SCORE_APPROVAL),
        ))
    }
}

pub fn evaluate_debt_to_income(ratio: Option<f64>) -> FactorEvaluation {
    let Some(ratio) = ratio else {
        return FactorEvaluation::missing_input();
    };

    if ratio <= thresholds::DEBT_TO_INCOME_APPROVAL {
        FactorEvaluation::approved(Some(1.0))
    } else if ratio >= thresholds::DEBT_TO_INCOME_DENIAL {
        FactorEvaluation::denied(Some(0.0), ReasonCode::DebtToIncome)
    } else {
        FactorEvaluation::consideration(normalize_between(
            ratio,
            thresholds::DEBT_TO_INCOME_DENIAL,
            thresholds::DEBT_TO_INCOME_APPROVAL,
        ))
    }
}

pub fn evaluate_employment_history(months_employed: Option<u32>) -> FactorEvaluation {
    let Some(months) = months_employed else {
        return FactorEvaluation::missing_input();
    };

    if months >= thresholds::EMPLOYMENT_MONTHS_APPROVAL {
        FactorEvaluation::approved(Some(1.0))
    } else if months <= thresholds::EMPLOYMENT_MONTHS_DENIAL {
        FactorEvaluation::denied(Some(0.0), ReasonCode::EmploymentHistory)
    } else {
        FactorEvaluation::consideration(normalize_between(
            f64::from(months),
            f64::from(thresholds::EMPLOYMENT_MONTHS_DENIAL),
            f64::from(thresholds::EMPLOYMENT_MONTHS_APPROVAL),
        ))
    }
}

pub fn evaluate_housing_payment(ratio: Option<f64>) -> FactorEvaluation {
    let Some(ratio) = ratio else {
        return FactorEvaluation::missing_input();
    };

    if ratio <= thresholds::HOUSING_RATIO_APPROVAL {
        FactorEvaluation::approved(Some(1.0))
    } else if ratio >= thresholds::HOUSING_RATIO_DENIAL {
        FactorEvaluation::denied(Some(0.0), ReasonCode::HousingPayment)
    } else {
        FactorEvaluation::consideration(normalize_between(
            ratio,
            thresholds::HOUSING_RATIO_DENIAL,
            thresholds::HOUSING_RATIO_APPROVAL,
        ))
    }
}

/// Binary gate: annual income must cover the requested amount at the minimum
/// multiple. A non-positive requested amount passes trivially.
pub fn evaluate_income_to_loan(
    annual_income: Option<f64>,
    requested_amount: Option<f64>,
) -> FactorEvaluation {
    let (Some(income), Some(amount)) = (annual_income, requested_amount) else {
        return FactorEvaluation::missing_input();
    };

    if amount <= 0.0 {
        return FactorEvaluation::approved(None);
    }

    if income / amount >= thresholds::MINIMUM_INCOME_TO_LOAN_RATIO {
        FactorEvaluation::approved(None)
    } else {
        FactorEvaluation::denied(None, ReasonCode::IncomeInsufficient)
    }
}

/// Binary gate on federal loan eligibility of the borrower's citizenship status.
pub fn evaluate_citizenship(status: Option<CitizenshipStatus>) -> FactorEvaluation {
    let Some(status) = status else {
        return FactorEvaluation::missing_input();
    };

    if status.is_loan_eligible() {
        FactorEvaluation::approved(None)
    } else {
        FactorEvaluation::denied(None, ReasonCode::CitizenshipStatus)
    }
}

/// Binary gate: the attached school program must be active for new originations.
pub fn evaluate_program_eligibility(program: Option<&ProgramSnapshot>) -> FactorEvaluation {
    let Some(program) = program else {
        return FactorEvaluation::missing_input();
    };

    if program.status == ProgramStatus::Active {
        FactorEvaluation::approved(None)
    } else {
        FactorEvaluation::denied(None, ReasonCode::ProgramEligibility)
    }
}
