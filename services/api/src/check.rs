use crate::infra::{load_catalog, parse_amount, parse_date};
use chrono::{NaiveDate, Utc};
use clap::Args;
use loan_eligibility::config::AppConfig;
use loan_eligibility::eligibility::{
    EligibilityRequest, EligibilityService, Evaluation, FixedClock, LoanTypeId, LoanTypeSummary,
};
use loan_eligibility::error::AppError;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Catalog id of the loan product
    #[arg(long)]
    pub(crate) loan_type_id: i32,
    /// Requested principal
    #[arg(long, value_parser = parse_amount)]
    pub(crate) amount: Decimal,
    /// Repayment period in months
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) tenure: i32,
    /// Applicant date of birth (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) dob: NaiveDate,
    /// Employment type, e.g. "Salaried" or "Self Employed"
    #[arg(long)]
    pub(crate) employment: String,
    /// Gross monthly income
    #[arg(long, value_parser = parse_amount)]
    pub(crate) income: Decimal,
    /// Installments already being paid each month
    #[arg(long, value_parser = parse_amount)]
    pub(crate) existing_emi: Option<Decimal>,
    /// Bureau credit score
    #[arg(long)]
    pub(crate) credit_score: i32,
    /// Evaluate as of this date (defaults to today, UTC)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the decision payload as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

impl CheckArgs {
    fn request(&self) -> EligibilityRequest {
        EligibilityRequest {
            loan_type_id: LoanTypeId(self.loan_type_id),
            requested_amount: self.amount,
            tenure_in_months: self.tenure,
            date_of_birth: self.dob,
            employment_type: self.employment.clone(),
            monthly_income: self.income,
            existing_emi: self.existing_emi.unwrap_or(Decimal::ZERO),
            credit_score: self.credit_score,
        }
    }
}

pub(crate) async fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = Arc::new(load_catalog(&config.catalog.seed)?);
    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());
    let service = EligibilityService::with_clock(catalog.clone(), catalog, FixedClock(today));

    let request = args.request();
    let evaluation = service
        .evaluate(&request, &CancellationToken::new())
        .await?;

    if args.json {
        match serde_json::to_string_pretty(&evaluation.decision) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Decision payload unavailable: {err}"),
        }
    } else {
        for line in decision_lines(&evaluation, today) {
            println!("{line}");
        }
    }

    Ok(())
}

pub(crate) async fn run_loan_types() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = Arc::new(load_catalog(&config.catalog.seed)?);
    let service = EligibilityService::new(catalog.clone(), catalog);

    let listed = service.loan_types(&CancellationToken::new()).await?;
    for line in loan_type_lines(&listed) {
        println!("{line}");
    }

    Ok(())
}

fn decision_lines(evaluation: &Evaluation, today: NaiveDate) -> Vec<String> {
    let decision = &evaluation.decision;
    let mut lines = vec![
        format!("Eligibility decision as of {today}"),
        format!("  Status: {}", decision.eligibility_status.label()),
        format!("  Remarks: {}", decision.remarks),
        format!("  Decided at: {}", evaluation.stage.label()),
    ];

    if let Some(rule_id) = evaluation.rule_id {
        lines.push(format!("  Rule applied: #{}", rule_id.0));
    }
    if let Some(emi) = decision.calculated_emi {
        lines.push(format!("  Monthly installment: {emi}"));
    }
    if let Some(ratio) = decision.emi_to_income_pct {
        lines.push(format!("  EMI to income: {ratio}%"));
    }

    lines
}

fn loan_type_lines(listed: &[LoanTypeSummary]) -> Vec<String> {
    if listed.is_empty() {
        return vec!["No active loan types".to_string()];
    }

    let mut lines = vec![format!("Active loan types ({})", listed.len())];
    lines.extend(
        listed
            .iter()
            .map(|entry| format!("  {:>4}  {}", entry.loan_type_id.0, entry.name)),
    );
    lines
}
