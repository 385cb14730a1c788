use serde::{Deserialize, Serialize};

use super::super::domain::{
    ApplicationSnapshot, CreditInformation, Decision, ReasonCode, StipulationType,
};
use super::rules::{
    calculate_weighted_score, determine_required_stipulations, evaluate_application,
    evaluate_factors, EvaluationOutcome,
};
use super::thresholds;

/// Verdict produced by the fast path, without a factor trail or blended score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoDecision {
    pub decision: Decision,
    pub reasons: Vec<ReasonCode>,
    pub stipulations: Vec<StipulationType>,
}

/// Stateless facade over the evaluation rules.
///
/// Routine strong or routine weak profiles short-cut through `auto_decision`;
/// anything borderline falls through to the full weighted evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnderwritingRuleEngine;

impl UnderwritingRuleEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(
        &self,
        application: &ApplicationSnapshot,
        credit: &CreditInformation,
    ) -> EvaluationOutcome {
        evaluate_application(application, credit)
    }

    /// Fast path for unambiguous profiles.
    ///
    /// Denial bar: credit at/below its denial threshold or DTI at/above its.
    /// Approval bar: credit, DTI, and employment all at/past their approval
    /// thresholds. Missing credit data, or a missing employment record on the
    /// approval bar, defers to the full evaluation instead of deciding.
    pub fn auto_decision(
        &self,
        application: &ApplicationSnapshot,
        credit: &CreditInformation,
    ) -> Option<AutoDecision> {
        let (Some(score), Some(dti)) = (credit.credit_score, credit.debt_to_income_ratio) else {
            return None;
        };

        if score <= thresholds::CREDIT_SCORE_DENIAL || dti >= thresholds::DEBT_TO_INCOME_DENIAL {
            let mut reasons = Vec::new();
            if score <= thresholds::CREDIT_SCORE_DENIAL {
                reasons.push(ReasonCode::CreditScore);
            }
            if dti >= thresholds::DEBT_TO_INCOME_DENIAL {
                reasons.push(ReasonCode::DebtToIncome);
            }
            return Some(AutoDecision {
                decision: Decision::Deny,
                reasons,
                stipulations: Vec::new(),
            });
        }

        let months = application
            .borrower
            .employment
            .as_ref()
            .map(|employment| employment.months_employed)?;

        if score >= thresholds::CREDIT_SCORE_APPROVAL
            && dti <= thresholds::DEBT_TO_INCOME_APPROVAL
            && months >= thresholds::EMPLOYMENT_MONTHS_APPROVAL
        {
            let stipulations = vec![
                StipulationType::EnrollmentAgreement,
                StipulationType::ProofOfIncome,
            ];
            return Some(AutoDecision {
                decision: Decision::Approve,
                reasons: Vec::new(),
                stipulations,
            });
        }

        None
    }

    /// The same weighted blend as the full evaluation, rescaled to 0-100 for
    /// queue prioritization and reporting. Not used for decisioning.
    pub fn risk_score(
        &self,
        application: &ApplicationSnapshot,
        credit: &CreditInformation,
    ) -> f64 {
        let results = evaluate_factors(application, credit);
        calculate_weighted_score(&results) * 100.0
    }

    /// Documentation requirements for a decision reached outside the full
    /// evaluation path (e.g., an underwriter overriding the engine).
    pub fn stipulations_for(
        &self,
        decision: Decision,
        application: &ApplicationSnapshot,
        credit: &CreditInformation,
    ) -> Vec<StipulationType> {
        let results = evaluate_factors(application, credit);
        determine_required_stipulations(decision, &results)
    }
}
