mod engine;
mod factors;
mod rules;
pub(crate) mod thresholds;

pub use engine::{AutoDecision, UnderwritingRuleEngine};
pub use factors::{FactorEvaluation, FactorStatus};
pub use rules::{
    calculate_weighted_score, determine_required_stipulations, evaluate_application,
    get_decision_reasons, EvaluationOutcome, EvaluationResults,
};

#[cfg(test)]
pub(crate) use factors::{
    evaluate_citizenship, evaluate_credit_score, evaluate_debt_to_income,
    evaluate_employment_history, evaluate_housing_payment, evaluate_income_to_loan,
    evaluate_program_eligibility,
};
