use serde::{Deserialize, Serialize};

use super::super::domain::{
    ApplicationId, ApplicationSnapshot, CreditInformation, Decision, ReasonCode, StipulationType,
};
use super::factors::{
    evaluate_citizenship, evaluate_credit_score, evaluate_debt_to_income,
    evaluate_employment_history, evaluate_housing_payment, evaluate_income_to_loan,
    evaluate_program_eligibility, FactorEvaluation, FactorStatus,
};
use super::thresholds;

/// All seven factor verdicts for one application, kept by name so decision
/// records and API responses expose a transparent audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResults {
    pub credit_score: FactorEvaluation,
    pub debt_to_income: FactorEvaluation,
    pub employment_history: FactorEvaluation,
    pub housing_payment: FactorEvaluation,
    pub income_to_loan: FactorEvaluation,
    pub citizenship: FactorEvaluation,
    pub program_eligibility: FactorEvaluation,
}

impl EvaluationResults {
    pub fn iter(&self) -> impl Iterator<Item = &FactorEvaluation> {
        [
            &self.credit_score,
            &self.debt_to_income,
            &self.employment_history,
            &self.housing_payment,
            &self.income_to_loan,
            &self.citizenship,
            &self.program_eligibility,
        ]
        .into_iter()
    }

    pub fn any_denied(&self) -> bool {
        self.iter()
            .any(|factor| factor.status == FactorStatus::Denied)
    }
}

/// Evaluation output: the verdict, its machine-readable reasons, the derived
/// documentation requirements, and the factor trail behind all of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub application_id: ApplicationId,
    pub decision: Decision,
    pub reasons: Vec<ReasonCode>,
    pub stipulations: Vec<StipulationType>,
    pub results: EvaluationResults,
    pub score: f64,
}

/// Run the seven factor evaluators against an application and its credit pull.
///
/// Inputs the snapshots cannot supply (no employment record, no monthly
/// income to ratio against) evaluate as missing rather than erroring.
pub(crate) fn evaluate_factors(
    application: &ApplicationSnapshot,
    credit: &CreditInformation,
) -> EvaluationResults {
    let borrower = &application.borrower;

    let employment_months = borrower
        .employment
        .as_ref()
        .map(|employment| employment.months_employed);

    let housing_ratio = match (borrower.monthly_housing_payment, borrower.monthly_income) {
        (Some(payment), Some(income)) if income > 0.0 => Some(payment / income),
        _ => None,
    };

    EvaluationResults {
        credit_score: evaluate_credit_score(credit.credit_score),
        debt_to_income: evaluate_debt_to_income(credit.debt_to_income_ratio),
        employment_history: evaluate_employment_history(employment_months),
        housing_payment: evaluate_housing_payment(housing_ratio),
        income_to_loan: evaluate_income_to_loan(
            borrower.annual_income,
            Some(application.loan.requested_amount),
        ),
        citizenship: evaluate_citizenship(borrower.citizenship_status),
        program_eligibility: evaluate_program_eligibility(application.program.as_ref()),
    }
}

/// Blend the four range-scored factors into one [0, 1] risk score.
/// A factor without a score contributes the neutral midpoint.
pub fn calculate_weighted_score(results: &EvaluationResults) -> f64 {
    let component = |factor: &FactorEvaluation| factor.score.unwrap_or(0.5);

    component(&results.credit_score) * thresholds::CREDIT_SCORE_WEIGHT
        + component(&results.debt_to_income) * thresholds::DEBT_TO_INCOME_WEIGHT
        + component(&results.employment_history) * thresholds::EMPLOYMENT_HISTORY_WEIGHT
        + component(&results.housing_payment) * thresholds::HOUSING_PAYMENT_WEIGHT
}

/// Documentation requirements implied by a decision plus any factors that
/// landed in consideration. Deduplicated; order is not significant.
pub fn determine_required_stipulations(
    decision: Decision,
    results: &EvaluationResults,
) -> Vec<StipulationType> {
    let mut required: Vec<StipulationType> = match decision {
        Decision::Approve => vec![
            StipulationType::EnrollmentAgreement,
            StipulationType::ProofOfIncome,
        ],
        Decision::Revise => vec![
            StipulationType::ProofOfIncome,
            StipulationType::AdditionalDocumentation,
        ],
        Decision::Deny => Vec::new(),
    };

    let mut add = |stipulation: StipulationType| {
        if !required.contains(&stipulation) {
            required.push(stipulation);
        }
    };

    if results.credit_score.status == FactorStatus::Consideration {
        add(StipulationType::ProofOfIdentity);
    }
    if results.debt_to_income.status == FactorStatus::Consideration {
        add(StipulationType::ProofOfIncome);
    }
    if results.employment_history.status == FactorStatus::Consideration {
        add(StipulationType::AdditionalDocumentation);
    }

    required
}

/// Collect the reason codes carried by denied factors, deduplicated.
pub fn get_decision_reasons(results: &EvaluationResults) -> Vec<ReasonCode> {
    let mut reasons = Vec::new();
    for factor in results.iter() {
        if let Some(reason) = factor.reason {
            if !reasons.contains(&reason) {
                reasons.push(reason);
            }
        }
    }
    reasons
}

/// Full evaluation of one application.
///
/// Any single denied factor is a hard gate: the application denies outright
/// and the weighted blend never runs. The blend only arbitrates among
/// applicants who cleared every gate.
pub fn evaluate_application(
    application: &ApplicationSnapshot,
    credit: &CreditInformation,
) -> EvaluationOutcome {
    let results = evaluate_factors(application, credit);

    if results.any_denied() {
        let reasons = get_decision_reasons(&results);
        return EvaluationOutcome {
            application_id: application.application_id.clone(),
            decision: Decision::Deny,
            reasons,
            stipulations: Vec::new(),
            results,
            score: 0.0,
        };
    }

    let score = calculate_weighted_score(&results);
    let decision = if score >= thresholds::APPROVAL_SCORE_FLOOR {
        Decision::Approve
    } else if score < thresholds::DENIAL_SCORE_CEILING {
        Decision::Deny
    } else {
        Decision::Revise
    };

    let reasons = get_decision_reasons(&results);
    let stipulations = determine_required_stipulations(decision, &results);

    EvaluationOutcome {
        application_id: application.application_id.clone(),
        decision,
        reasons,
        stipulations,
        results,
        score,
    }
}
