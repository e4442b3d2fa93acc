use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::catalog::InMemoryCatalog;
use crate::eligibility::{
    eligibility_router, EligibilityRequest, EligibilityRule, EligibilityRuleLookup,
    EligibilityService, FixedClock, LoanType, LoanTypeId, LoanTypeLookup, LoanTypeSummary,
    LookupError, RuleId,
};

pub(super) const PERSONAL_LOAN: LoanTypeId = LoanTypeId(1);
pub(super) const BUSINESS_LOAN: LoanTypeId = LoanTypeId(2);
pub(super) const GOLD_LOAN: LoanTypeId = LoanTypeId(3);
pub(super) const RETIRED_LOAN: LoanTypeId = LoanTypeId(4);
pub(super) const UNRULED_LOAN: LoanTypeId = LoanTypeId(5);

pub(super) type TestService = EligibilityService<InMemoryCatalog, InMemoryCatalog, FixedClock>;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
}

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn loan_type(id: LoanTypeId, name: &str, rate: Option<Decimal>, active: bool) -> LoanType {
    LoanType {
        loan_type_id: id,
        name: name.to_string(),
        interest_rate_pct: rate,
        is_active: active,
        created_at: at(2023, 1, 1),
    }
}

pub(super) fn loan_types() -> Vec<LoanType> {
    vec![
        loan_type(PERSONAL_LOAN, "Personal Loan (Salaried)", Some(dec!(12)), true),
        loan_type(
            BUSINESS_LOAN,
            "Business Loan (Self-Employed)",
            Some(dec!(14.5)),
            true,
        ),
        loan_type(GOLD_LOAN, "Gold Loan", None, true),
        loan_type(RETIRED_LOAN, "Festival Loan (Salaried)", Some(dec!(9)), false),
        loan_type(UNRULED_LOAN, "Education Loan", Some(dec!(8)), true),
    ]
}

pub(super) fn standard_rule(
    rule_id: i32,
    loan_type_id: LoanTypeId,
    created_at: DateTime<Utc>,
) -> EligibilityRule {
    EligibilityRule {
        rule_id: RuleId(rule_id),
        loan_type_id,
        min_age: 21,
        max_age: 60,
        min_monthly_income: dec!(20000),
        min_credit_score: Some(650),
        max_emi_to_income_pct: Some(dec!(50)),
        is_active: true,
        created_at,
    }
}

pub(super) fn rules() -> Vec<EligibilityRule> {
    vec![
        standard_rule(1, PERSONAL_LOAN, at(2024, 1, 1)),
        standard_rule(2, BUSINESS_LOAN, at(2024, 1, 1)),
        standard_rule(3, GOLD_LOAN, at(2024, 1, 1)),
        standard_rule(4, RETIRED_LOAN, at(2024, 1, 1)),
        EligibilityRule {
            is_active: false,
            ..standard_rule(5, UNRULED_LOAN, at(2024, 1, 1))
        },
    ]
}

pub(super) fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(loan_types(), rules())
}

/// Salaried applicant, 30 years old on [`today`], asking for 100000 over 12 months.
pub(super) fn request() -> EligibilityRequest {
    EligibilityRequest {
        loan_type_id: PERSONAL_LOAN,
        requested_amount: dec!(100000),
        tenure_in_months: 12,
        date_of_birth: NaiveDate::from_ymd_opt(1994, 1, 10).expect("valid date"),
        employment_type: "Salaried".to_string(),
        monthly_income: dec!(50000),
        existing_emi: Decimal::ZERO,
        credit_score: 750,
    }
}

pub(super) fn build_service(catalog: InMemoryCatalog) -> TestService {
    build_service_on(catalog, today())
}

pub(super) fn build_service_on(catalog: InMemoryCatalog, today: NaiveDate) -> TestService {
    let shared = Arc::new(catalog);
    EligibilityService::with_clock(shared.clone(), shared, FixedClock(today))
}

pub(super) fn router_with_service<L, R>(
    service: EligibilityService<L, R, FixedClock>,
) -> axum::Router
where
    L: LoanTypeLookup + 'static,
    R: EligibilityRuleLookup + 'static,
{
    eligibility_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) struct UnavailableCatalog;

#[async_trait]
impl LoanTypeLookup for UnavailableCatalog {
    async fn get_active_by_id(
        &self,
        _id: LoanTypeId,
        _cancel: &CancellationToken,
    ) -> Result<Option<LoanType>, LookupError> {
        Err(LookupError::Unavailable("database offline".to_string()))
    }

    async fn list_active(
        &self,
        _cancel: &CancellationToken,
    ) -> Result<Vec<LoanTypeSummary>, LookupError> {
        Err(LookupError::Unavailable("database offline".to_string()))
    }
}

#[async_trait]
impl EligibilityRuleLookup for UnavailableCatalog {
    async fn get_latest_active_for_loan_type(
        &self,
        _loan_type_id: LoanTypeId,
        _cancel: &CancellationToken,
    ) -> Result<Option<EligibilityRule>, LookupError> {
        Err(LookupError::Unavailable("database offline".to_string()))
    }
}

/// Loan type lookup that answers successfully but cancels the caller's token on the way out,
/// as if the request was aborted while the query was in flight.
pub(super) struct AbortingLoanTypes(pub(super) InMemoryCatalog);

#[async_trait]
impl LoanTypeLookup for AbortingLoanTypes {
    async fn get_active_by_id(
        &self,
        id: LoanTypeId,
        cancel: &CancellationToken,
    ) -> Result<Option<LoanType>, LookupError> {
        let found = self.0.get_active_by_id(id, cancel).await;
        cancel.cancel();
        found
    }

    async fn list_active(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<LoanTypeSummary>, LookupError> {
        self.0.list_active(cancel).await
    }
}
