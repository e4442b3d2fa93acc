use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::domain::EligibilityRequest;
use super::repository::{EligibilityRuleLookup, LoanTypeLookup};
use super::service::{Clock, EligibilityError, EligibilityService};

/// Non-standard status used when the caller went away before a decision was produced.
const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Router builder exposing the eligibility check and the loan type listing.
pub fn eligibility_router<L, R, C>(service: Arc<EligibilityService<L, R, C>>) -> Router
where
    L: LoanTypeLookup + 'static,
    R: EligibilityRuleLookup + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/api/v1/loans/eligibility", post(check_handler::<L, R, C>))
        .route("/api/v1/loans/loan-types", get(loan_types_handler::<L, R, C>))
        .with_state(service)
}

pub(crate) async fn check_handler<L, R, C>(
    State(service): State<Arc<EligibilityService<L, R, C>>>,
    axum::Json(request): axum::Json<EligibilityRequest>,
) -> Response
where
    L: LoanTypeLookup + 'static,
    R: EligibilityRuleLookup + 'static,
    C: Clock + 'static,
{
    let cancel = CancellationToken::new();
    let _abort_on_drop = cancel.clone().drop_guard();

    match service.check(&request, &cancel).await {
        Ok(decision) => (StatusCode::OK, axum::Json(decision)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn loan_types_handler<L, R, C>(
    State(service): State<Arc<EligibilityService<L, R, C>>>,
) -> Response
where
    L: LoanTypeLookup + 'static,
    R: EligibilityRuleLookup + 'static,
    C: Clock + 'static,
{
    let cancel = CancellationToken::new();
    let _abort_on_drop = cancel.clone().drop_guard();

    match service.loan_types(&cancel).await {
        Ok(loan_types) => (StatusCode::OK, axum::Json(loan_types)).into_response(),
        Err(error) => error_response(error),
    }
}

/// HTTP status for a fault that prevented a decision.
pub(crate) fn status_for(error: &EligibilityError) -> StatusCode {
    match error {
        EligibilityError::Cancelled => {
            StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::SERVICE_UNAVAILABLE)
        }
        EligibilityError::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: EligibilityError) -> Response {
    let status = status_for(&error);
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
