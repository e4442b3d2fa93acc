//! End-to-end scenarios for the eligibility engine driven through the public crate API: a
//! catalog seeded from CSV exports, the service facade, and the HTTP router.

mod common {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use loan_eligibility::catalog::{load_loan_types, load_rules, InMemoryCatalog};
    use loan_eligibility::eligibility::{EligibilityService, FixedClock};

    pub(super) const LOAN_TYPES_CSV: &str = "\
LoanTypeId,LoanTypeName,InterestRatePct,IsActive,CreatedAt
1,Personal Loan (Salaried),12,true,2023-01-01T00:00:00Z
2,Business Loan (Self Employed),15,true,2023-01-01T00:00:00Z
3,Consumer Durable Loan,,true,2023-06-01
";

    pub(super) const RULES_CSV: &str = "\
RuleId,LoanTypeId,MinAge,MaxAge,MinMonthlyIncome,MinCreditScore,MaxEmiToIncomePct,IsActive,CreatedAt
1,1,18,65,10000,600,60,true,2023-01-01T00:00:00Z
2,1,21,60,20000,650,50,true,2024-01-01T00:00:00Z
3,2,25,65,30000,700,40,true,2024-01-01T00:00:00Z
4,3,18,70,5000,,,true,2024-01-01T00:00:00Z
";

    pub(super) type Service = EligibilityService<InMemoryCatalog, InMemoryCatalog, FixedClock>;

    pub(super) fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new(
            load_loan_types(LOAN_TYPES_CSV.as_bytes()).expect("loan types parse"),
            load_rules(RULES_CSV.as_bytes()).expect("rules parse"),
        )
    }

    pub(super) fn service_on(catalog: InMemoryCatalog, today: NaiveDate) -> Service {
        let shared = Arc::new(catalog);
        EligibilityService::with_clock(shared.clone(), shared, FixedClock(today))
    }

    pub(super) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::NaiveDate;
use loan_eligibility::eligibility::{
    eligibility_router, EligibilityRequest, EligibilityStatus, LoanTypeId,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use common::*;

fn applicant() -> EligibilityRequest {
    EligibilityRequest {
        loan_type_id: LoanTypeId(1),
        requested_amount: dec!(100000),
        tenure_in_months: 12,
        date_of_birth: NaiveDate::from_ymd_opt(1994, 2, 20).expect("valid"),
        employment_type: " salaried ".to_string(),
        monthly_income: dec!(50000),
        existing_emi: Decimal::ZERO,
        credit_score: 750,
    }
}

#[tokio::test]
async fn csv_seeded_catalog_produces_reference_decision() {
    let service = service_on(catalog(), today());

    let decision = service
        .check(&applicant(), &CancellationToken::new())
        .await
        .expect("decision produced");

    assert!(decision.is_eligible);
    assert_eq!(decision.eligibility_status, EligibilityStatus::Eligible);
    assert_eq!(decision.calculated_emi, Some(dec!(8884.88)));
    assert_eq!(decision.emi_to_income_pct, Some(dec!(17.77)));
}

#[tokio::test]
async fn latest_rule_version_overrides_older_thresholds() {
    let service = service_on(catalog(), today());
    let mut applicant = applicant();
    applicant.monthly_income = dec!(15000);

    let decision = service
        .check(&applicant, &CancellationToken::new())
        .await
        .expect("decision produced");

    assert!(!decision.is_eligible);
    assert_eq!(
        decision.remarks,
        "Monthly income below minimum required threshold"
    );
}

#[tokio::test]
async fn self_employed_product_rejects_salaried_applicant() {
    let service = service_on(catalog(), today());
    let mut applicant = applicant();
    applicant.loan_type_id = LoanTypeId(2);
    applicant.monthly_income = dec!(1000000);

    let decision = service
        .check(&applicant, &CancellationToken::new())
        .await
        .expect("decision produced");

    assert_eq!(
        decision.remarks,
        "Employment type does not match selected loan type"
    );
}

#[tokio::test]
async fn rate_free_product_without_limits_accepts_any_credit_score() {
    let service = service_on(catalog(), today());
    let mut applicant = applicant();
    applicant.loan_type_id = LoanTypeId(3);
    applicant.requested_amount = dec!(60000);
    applicant.tenure_in_months = 24;
    applicant.monthly_income = dec!(6000);
    applicant.existing_emi = dec!(4000);
    applicant.credit_score = 0;

    let decision = service
        .check(&applicant, &CancellationToken::new())
        .await
        .expect("decision produced");

    assert!(decision.is_eligible);
    assert_eq!(decision.calculated_emi, Some(dec!(2500.00)));
    assert_eq!(decision.emi_to_income_pct, Some(dec!(108.33)));
}

#[tokio::test]
async fn http_route_serves_decisions_and_catalog() {
    let router = eligibility_router(Arc::new(service_on(catalog(), today())));

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/loans/eligibility")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&applicant()).expect("request encodes"),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(payload["eligibilityStatus"], json!("Eligible"));
    assert_eq!(payload["calculatedEmi"], json!(8884.88));

    let response = router
        .oneshot(
            Request::get("/api/v1/loans/loan-types")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(
        payload,
        json!([
            { "loanTypeId": 2, "name": "Business Loan (Self Employed)" },
            { "loanTypeId": 3, "name": "Consumer Durable Loan" },
            { "loanTypeId": 1, "name": "Personal Loan (Salaried)" }
        ])
    );
}
