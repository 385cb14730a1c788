use crate::infra::{parse_date, InMemoryEventPublisher, InMemoryUnderwritingStore};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use std::io;
use std::sync::Arc;

use loanflow::error::AppError;
use loanflow::workflows::underwriting::{
    ApplicationId, ApplicationSnapshot, ApplicationStatus, ApprovalTerms, BorrowerProfile,
    CitizenshipStatus, CreditInformation, Decision, DecisionRuling, EmploymentInfo, LoanDetails,
    ProgramSnapshot, ProgramStatus, QueuePriority, RecordDecisionRequest, UnderwriterId,
    UnderwritingService,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Underwriter handle used for the demo assignment
    #[arg(long, default_value = "demo.underwriter")]
    pub(crate) underwriter: String,
    /// Deadline for generated stipulations (YYYY-MM-DD). Defaults to today + 30 days.
    #[arg(long, value_parser = parse_date)]
    pub(crate) stipulations_due: Option<NaiveDate>,
    /// Walk a borderline profile through the full weighted evaluation instead
    /// of the automatic fast path.
    #[arg(long)]
    pub(crate) borderline: bool,
}

fn demo_application(borderline: bool) -> (ApplicationSnapshot, CreditInformation) {
    let (months_employed, monthly_income, housing_payment, annual_income) = if borderline {
        (15, 4_000.0, 1_400.0, 48_000.0)
    } else {
        (36, 6_600.0, 1_320.0, 80_000.0)
    };

    let snapshot = ApplicationSnapshot {
        application_id: ApplicationId("app-demo-001".to_string()),
        loan: LoanDetails {
            requested_amount: 20_000.0,
        },
        borrower: BorrowerProfile {
            citizenship_status: Some(CitizenshipStatus::UsCitizen),
            employment: Some(EmploymentInfo {
                employer: "Riverside Medical Group".to_string(),
                months_employed,
            }),
            annual_income: Some(annual_income),
            monthly_income: Some(monthly_income),
            monthly_housing_payment: Some(housing_payment),
        },
        program: Some(ProgramSnapshot {
            program_code: "RN-ADN".to_string(),
            status: ProgramStatus::Active,
        }),
        status: ApplicationStatus::InReview,
    };

    let credit = if borderline {
        CreditInformation {
            credit_score: Some(640),
            debt_to_income_ratio: Some(0.45),
            monthly_debt: Some(1_800.0),
            report_reference: Some("bureau-demo-ref".to_string()),
            report_date: None,
            is_co_borrower: false,
        }
    } else {
        CreditInformation {
            credit_score: Some(750),
            debt_to_income_ratio: Some(0.25),
            monthly_debt: Some(1_650.0),
            report_reference: Some("bureau-demo-ref".to_string()),
            report_date: None,
            is_co_borrower: false,
        }
    };

    (snapshot, credit)
}

fn demo_failure(err: loanflow::workflows::underwriting::ServiceError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        underwriter,
        stipulations_due,
        borderline,
    } = args;

    let stipulations_due =
        stipulations_due.unwrap_or_else(|| Local::now().date_naive() + Duration::days(30));

    let store = Arc::new(InMemoryUnderwritingStore::default());
    let events = Arc::new(InMemoryEventPublisher::default());
    let service = UnderwritingService::new(store.clone(), events.clone());

    let (snapshot, credit) = demo_application(borderline);
    let application_id = snapshot.application_id.clone();
    let underwriter = UnderwriterId(underwriter);

    println!("Underwriting workflow demo");
    println!("==========================");

    let item = service
        .enqueue(application_id.clone(), QueuePriority::High)
        .map_err(demo_failure)?;
    println!(
        "Queued {} as {} (due {})",
        application_id.0,
        item.id.0,
        item.due_date.format("%Y-%m-%d %H:%M UTC")
    );

    let item = service
        .assign(&item.id, underwriter.clone())
        .and_then(|_| service.start_review(&item.id))
        .map_err(demo_failure)?;
    println!("Assigned to {} and review started", underwriter.0);

    if let Some(auto) = service.auto_decision(&snapshot, &credit) {
        println!(
            "Fast path verdict: {} ({} stipulation(s))",
            auto.decision.label(),
            auto.stipulations.len()
        );
    } else {
        println!("Fast path deferred; running the full weighted evaluation");
    }

    let outcome = service.evaluate(&snapshot, &credit);
    let risk = service.risk_score(&snapshot, &credit);
    println!(
        "Evaluation: {} (weighted score {:.3}, display risk score {:.1})",
        outcome.decision.label(),
        outcome.score,
        risk
    );
    for reason in &outcome.reasons {
        println!("  reason: {reason:?}");
    }

    let ruling = match outcome.decision {
        Decision::Approve => DecisionRuling::Approve(ApprovalTerms {
            approved_amount: snapshot.loan.requested_amount,
            interest_rate: 6.25,
            term_months: 120,
        }),
        Decision::Deny => DecisionRuling::Deny,
        Decision::Revise => DecisionRuling::Revise,
    };

    let record = service
        .record_decision(
            &item.id,
            RecordDecisionRequest {
                application_id: application_id.clone(),
                ruling,
                underwriter: underwriter.clone(),
                comments: Some("Recorded by the CLI demo".to_string()),
                reasons: outcome.reasons.clone(),
                stipulations: outcome.stipulations.clone(),
                stipulations_required_by: stipulations_due,
            },
        )
        .map_err(demo_failure)?;

    println!(
        "Decision recorded: {} -> application status {}",
        record.ruling.decision().label(),
        record.ruling.application_status().label()
    );
    if let Some(status) = store.application_status(&application_id) {
        println!("Application record now reads: {}", status.label());
    }

    let stipulations = service
        .stipulations_for(&application_id)
        .map_err(demo_failure)?;
    if stipulations.is_empty() {
        println!("No stipulations required");
    } else {
        println!("Stipulations (due {stipulations_due}):");
        for stipulation in &stipulations {
            println!(
                "  {} [{}]",
                stipulation.description,
                stipulation.status.label()
            );
        }
    }

    println!("Events emitted:");
    for event in events.events() {
        println!("  {event:?}");
    }

    Ok(())
}
