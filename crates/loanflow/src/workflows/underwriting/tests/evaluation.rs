use super::common::*;
use crate::workflows::underwriting::domain::{
    CitizenshipStatus, Decision, ProgramSnapshot, ProgramStatus, ReasonCode, StipulationType,
};
use crate::workflows::underwriting::evaluation::{
    calculate_weighted_score, determine_required_stipulations, evaluate_application,
    evaluate_citizenship, evaluate_credit_score, evaluate_debt_to_income,
    evaluate_employment_history, evaluate_housing_payment, evaluate_income_to_loan,
    evaluate_program_eligibility, get_decision_reasons, FactorStatus,
};
use crate::workflows::underwriting::evaluation::thresholds;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn factor_weights_sum_to_one() {
    let sum = thresholds::CREDIT_SCORE_WEIGHT
        + thresholds::DEBT_TO_INCOME_WEIGHT
        + thresholds::EMPLOYMENT_HISTORY_WEIGHT
        + thresholds::HOUSING_PAYMENT_WEIGHT;
    assert_close(sum, 1.0);
}

#[test]
fn credit_score_factor_bands() {
    let approved = evaluate_credit_score(Some(720));
    assert_eq!(approved.status, FactorStatus::Approved);
    assert_close(approved.score.expect("score present"), 1.0);

    let denied = evaluate_credit_score(Some(560));
    assert_eq!(denied.status, FactorStatus::Denied);
    assert_close(denied.score.expect("score present"), 0.0);
    assert_eq!(denied.reason, Some(ReasonCode::CreditScore));

    let midpoint = evaluate_credit_score(Some(640));
    assert_eq!(midpoint.status, FactorStatus::Consideration);
    assert_close(midpoint.score.expect("score present"), 0.5);
    assert_eq!(midpoint.reason, None);
}

#[test]
fn credit_score_factor_is_monotonic() {
    let samples = [500u16, 580, 600, 640, 680, 700, 780];
    let scores: Vec<f64> = samples
        .iter()
        .map(|score| {
            evaluate_credit_score(Some(*score))
                .score
                .expect("score present")
        })
        .collect();

    for window in scores.windows(2) {
        assert!(
            window[0] <= window[1],
            "score dropped as credit improved: {scores:?}"
        );
    }
}

#[test]
fn debt_to_income_factor_inverts_direction() {
    let approved = evaluate_debt_to_income(Some(0.30));
    assert_eq!(approved.status, FactorStatus::Approved);

    let denied = evaluate_debt_to_income(Some(0.55));
    assert_eq!(denied.status, FactorStatus::Denied);
    assert_eq!(denied.reason, Some(ReasonCode::DebtToIncome));

    let consideration = evaluate_debt_to_income(Some(0.45));
    assert_eq!(consideration.status, FactorStatus::Consideration);
    assert_close(consideration.score.expect("score present"), 1.0 / 3.0);

    // A lower ratio is a better profile, so its score never drops.
    let samples = [0.60, 0.50, 0.48, 0.40, 0.36, 0.35, 0.20];
    let scores: Vec<f64> = samples
        .iter()
        .map(|ratio| {
            evaluate_debt_to_income(Some(*ratio))
                .score
                .expect("score present")
        })
        .collect();
    for window in scores.windows(2) {
        assert!(window[0] <= window[1], "score dropped as DTI improved");
    }
}

#[test]
fn employment_and_housing_factor_bands() {
    assert_eq!(
        evaluate_employment_history(Some(24)).status,
        FactorStatus::Approved
    );
    assert_eq!(
        evaluate_employment_history(Some(6)).status,
        FactorStatus::Denied
    );
    let mid = evaluate_employment_history(Some(15));
    assert_eq!(mid.status, FactorStatus::Consideration);
    assert_close(mid.score.expect("score present"), 0.5);

    assert_eq!(
        evaluate_housing_payment(Some(0.20)).status,
        FactorStatus::Approved
    );
    let heavy = evaluate_housing_payment(Some(0.47));
    assert_eq!(heavy.status, FactorStatus::Denied);
    assert_eq!(heavy.reason, Some(ReasonCode::HousingPayment));
}

#[test]
fn missing_inputs_land_in_consideration() {
    for factor in [
        evaluate_credit_score(None),
        evaluate_debt_to_income(None),
        evaluate_employment_history(None),
        evaluate_housing_payment(None),
        evaluate_income_to_loan(None, Some(10_000.0)),
        evaluate_income_to_loan(Some(50_000.0), None),
        evaluate_citizenship(None),
        evaluate_program_eligibility(None),
    ] {
        assert_eq!(factor.status, FactorStatus::Consideration);
        assert_close(factor.score.expect("score present"), 0.5);
        assert_eq!(factor.reason, None);
    }
}

#[test]
fn income_gate_checks_the_minimum_multiple() {
    let passing = evaluate_income_to_loan(Some(80_000.0), Some(20_000.0));
    assert_eq!(passing.status, FactorStatus::Approved);

    let failing = evaluate_income_to_loan(Some(30_000.0), Some(20_000.0));
    assert_eq!(failing.status, FactorStatus::Denied);
    assert_eq!(failing.reason, Some(ReasonCode::IncomeInsufficient));

    let trivial = evaluate_income_to_loan(Some(10_000.0), Some(0.0));
    assert_eq!(trivial.status, FactorStatus::Approved);
}

#[test]
fn citizenship_gate_follows_eligibility() {
    for status in [
        CitizenshipStatus::UsCitizen,
        CitizenshipStatus::PermanentResident,
        CitizenshipStatus::EligibleNonCitizen,
    ] {
        assert_eq!(
            evaluate_citizenship(Some(status)).status,
            FactorStatus::Approved
        );
    }

    let denied = evaluate_citizenship(Some(CitizenshipStatus::ForeignNational));
    assert_eq!(denied.status, FactorStatus::Denied);
    assert_eq!(denied.reason, Some(ReasonCode::CitizenshipStatus));
}

#[test]
fn program_gate_requires_active_status() {
    let suspended = ProgramSnapshot {
        program_code: "CS-BS".to_string(),
        status: ProgramStatus::Suspended,
    };
    let denied = evaluate_program_eligibility(Some(&suspended));
    assert_eq!(denied.status, FactorStatus::Denied);
    assert_eq!(denied.reason, Some(ReasonCode::ProgramEligibility));

    let active = active_program();
    assert_eq!(
        evaluate_program_eligibility(Some(&active)).status,
        FactorStatus::Approved
    );
}

#[test]
fn strong_profile_approves_with_base_stipulations() {
    let outcome = evaluate_application(&application("strong"), &strong_credit());

    assert_eq!(outcome.decision, Decision::Approve);
    assert!(outcome.reasons.is_empty());
    assert_close(outcome.score, 1.0);
    assert!(outcome
        .stipulations
        .contains(&StipulationType::EnrollmentAgreement));
    assert!(outcome
        .stipulations
        .contains(&StipulationType::ProofOfIncome));
}

#[test]
fn low_credit_short_circuits_to_denial() {
    let outcome = evaluate_application(&application("credit-low"), &credit(Some(550), Some(0.25)));

    assert_eq!(outcome.decision, Decision::Deny);
    assert!(outcome.reasons.contains(&ReasonCode::CreditScore));
    assert!(outcome.stipulations.is_empty());
    assert_close(outcome.score, 0.0);
}

#[test]
fn any_denied_gate_overrides_strong_financials() {
    let mut snapshot = application("program-suspended");
    snapshot.program = Some(ProgramSnapshot {
        program_code: "CS-BS".to_string(),
        status: ProgramStatus::Discontinued,
    });

    let outcome = evaluate_application(&snapshot, &strong_credit());

    assert_eq!(outcome.decision, Decision::Deny);
    assert_eq!(outcome.reasons, vec![ReasonCode::ProgramEligibility]);
    assert!(outcome.stipulations.is_empty());
}

#[test]
fn borderline_profile_lands_in_revision() {
    let mut snapshot = application("borderline");
    snapshot.borrower.employment = Some(crate::workflows::underwriting::domain::EmploymentInfo {
        employer: "Midtown Cafe".to_string(),
        months_employed: 15,
    });
    snapshot.borrower.monthly_income = Some(4_000.0);
    snapshot.borrower.monthly_housing_payment = Some(1_400.0);
    snapshot.borrower.annual_income = Some(48_000.0);

    let outcome = evaluate_application(&snapshot, &credit(Some(640), Some(0.45)));

    assert_eq!(outcome.decision, Decision::Revise);
    assert!(outcome.score >= 0.40 && outcome.score < 0.70, "score was {}", outcome.score);
    assert!(outcome.reasons.is_empty());
    assert!(outcome
        .stipulations
        .contains(&StipulationType::ProofOfIdentity));
    assert!(outcome
        .stipulations
        .contains(&StipulationType::ProofOfIncome));
}

#[test]
fn income_gate_denies_despite_good_credit() {
    let mut snapshot = application("thin-income");
    snapshot.borrower.annual_income = Some(30_000.0);

    let outcome = evaluate_application(&snapshot, &strong_credit());

    assert_eq!(outcome.decision, Decision::Deny);
    assert!(outcome.reasons.contains(&ReasonCode::IncomeInsufficient));
}

#[test]
fn evaluation_is_idempotent() {
    let snapshot = application("repeat");
    let pull = credit(Some(660), Some(0.40));

    let first = evaluate_application(&snapshot, &pull);
    let second = evaluate_application(&snapshot, &pull);

    assert_eq!(first, second);
}

#[test]
fn weighted_score_blends_with_fixed_weights() {
    let results = crate::workflows::underwriting::evaluation::EvaluationResults {
        credit_score: evaluate_credit_score(Some(640)),
        debt_to_income: evaluate_debt_to_income(Some(0.45)),
        employment_history: evaluate_employment_history(Some(15)),
        housing_payment: evaluate_housing_payment(Some(0.35)),
        income_to_loan: evaluate_income_to_loan(Some(60_000.0), Some(20_000.0)),
        citizenship: evaluate_citizenship(Some(CitizenshipStatus::UsCitizen)),
        program_eligibility: evaluate_program_eligibility(Some(&active_program())),
    };

    let expected = 0.5 * thresholds::CREDIT_SCORE_WEIGHT
        + (1.0 / 3.0) * thresholds::DEBT_TO_INCOME_WEIGHT
        + 0.5 * thresholds::EMPLOYMENT_HISTORY_WEIGHT
        + ((0.35 - thresholds::HOUSING_RATIO_DENIAL)
            / (thresholds::HOUSING_RATIO_APPROVAL - thresholds::HOUSING_RATIO_DENIAL))
            * thresholds::HOUSING_PAYMENT_WEIGHT;
    assert_close(calculate_weighted_score(&results), expected);
}

#[test]
fn stipulations_deduplicate_consideration_additions() {
    let results = crate::workflows::underwriting::evaluation::EvaluationResults {
        credit_score: evaluate_credit_score(Some(640)),
        debt_to_income: evaluate_debt_to_income(Some(0.45)),
        employment_history: evaluate_employment_history(Some(15)),
        housing_payment: evaluate_housing_payment(Some(0.20)),
        income_to_loan: evaluate_income_to_loan(Some(60_000.0), Some(20_000.0)),
        citizenship: evaluate_citizenship(Some(CitizenshipStatus::UsCitizen)),
        program_eligibility: evaluate_program_eligibility(Some(&active_program())),
    };

    let required = determine_required_stipulations(Decision::Revise, &results);

    let expected = [
        StipulationType::ProofOfIncome,
        StipulationType::AdditionalDocumentation,
        StipulationType::ProofOfIdentity,
    ];
    assert_eq!(required.len(), expected.len());
    for stipulation in expected {
        assert!(required.contains(&stipulation), "missing {stipulation:?}");
    }

    assert!(determine_required_stipulations(Decision::Deny, &results).is_empty());

    // Deterministic: same inputs, same set.
    assert_eq!(
        required,
        determine_required_stipulations(Decision::Revise, &results)
    );
}

#[test]
fn reasons_collect_without_repeats() {
    let results = crate::workflows::underwriting::evaluation::EvaluationResults {
        credit_score: evaluate_credit_score(Some(550)),
        debt_to_income: evaluate_debt_to_income(Some(0.60)),
        employment_history: evaluate_employment_history(Some(3)),
        housing_payment: evaluate_housing_payment(Some(0.50)),
        income_to_loan: evaluate_income_to_loan(Some(20_000.0), Some(20_000.0)),
        citizenship: evaluate_citizenship(Some(CitizenshipStatus::ForeignNational)),
        program_eligibility: evaluate_program_eligibility(Some(&active_program())),
    };

    let reasons = get_decision_reasons(&results);

    assert_eq!(reasons.len(), 6);
    for code in [
        ReasonCode::CreditScore,
        ReasonCode::DebtToIncome,
        ReasonCode::EmploymentHistory,
        ReasonCode::HousingPayment,
        ReasonCode::IncomeInsufficient,
        ReasonCode::CitizenshipStatus,
    ] {
        assert!(reasons.contains(&code), "missing {code:?}");
    }

    assert_eq!(reasons, get_decision_reasons(&results));
}
