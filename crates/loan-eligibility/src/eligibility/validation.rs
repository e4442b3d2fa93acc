use std::num::NonZeroU32;

use rust_decimal::Decimal;

use super::domain::EligibilityRequest;
use super::evaluation::{first_rejection, Check, RejectionReason};

const INPUT_CHECKS: [Check<EligibilityRequest>; 4] = [
    Check {
        rejects: |request| request.tenure_in_months <= 0,
        reason: |_| RejectionReason::InvalidTenure,
    },
    Check {
        rejects: |request| request.monthly_income <= Decimal::ZERO,
        reason: |_| RejectionReason::InvalidMonthlyIncome,
    },
    Check {
        rejects: |request| request.requested_amount <= Decimal::ZERO,
        reason: |_| RejectionReason::InvalidRequestedAmount,
    },
    Check {
        rejects: |request| request.employment_type.trim().is_empty(),
        reason: |_| RejectionReason::MissingEmploymentType,
    },
];

/// Structural preconditions on a raw request, checked in a fixed order.
///
/// Returns the tenure as a non-zero month count on success.
pub fn validate_request(request: &EligibilityRequest) -> Result<NonZeroU32, RejectionReason> {
    if let Some(reason) = first_rejection(&INPUT_CHECKS, request) {
        return Err(reason);
    }

    u32::try_from(request.tenure_in_months)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(RejectionReason::InvalidTenure)
}
