use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::domain::{EligibilityRule, LoanType, LoanTypeId};
use super::employment::employment_type_matches;
use super::evaluation::RejectionReason;
use super::repository::{EligibilityRuleLookup, LoanTypeLookup, LookupError};
use super::service::EligibilityError;

/// Loan type and rule version that apply to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProduct {
    pub loan_type: LoanType,
    pub rule: EligibilityRule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedProduct),
    Rejected(RejectionReason),
}

/// Picks the current rule for `loan_type_id` among `rules`.
///
/// Only active rules for the loan type are candidates. The latest `created_at` wins and
/// identical timestamps fall back to the highest rule id.
pub fn current_rule<'a, I>(rules: I, loan_type_id: LoanTypeId) -> Option<&'a EligibilityRule>
where
    I: IntoIterator<Item = &'a EligibilityRule>,
{
    rules
        .into_iter()
        .filter(|rule| rule.loan_type_id == loan_type_id && rule.is_active)
        .max_by_key(|rule| rule.version_key())
}

/// Resolves the loan type and current rule for a request through the lookup collaborators.
pub struct RuleResolver<L, R> {
    loan_types: Arc<L>,
    rules: Arc<R>,
}

impl<L, R> Clone for RuleResolver<L, R> {
    fn clone(&self) -> Self {
        Self {
            loan_types: self.loan_types.clone(),
            rules: self.rules.clone(),
        }
    }
}

impl<L, R> RuleResolver<L, R>
where
    L: LoanTypeLookup + 'static,
    R: EligibilityRuleLookup + 'static,
{
    pub fn new(loan_types: Arc<L>, rules: Arc<R>) -> Self {
        Self { loan_types, rules }
    }

    pub async fn resolve(
        &self,
        loan_type_id: LoanTypeId,
        employment_type: &str,
        cancel: &CancellationToken,
    ) -> Result<Resolution, EligibilityError> {
        ensure_live(cancel)?;
        let Some(loan_type) = self
            .loan_types
            .get_active_by_id(loan_type_id, cancel)
            .await?
        else {
            debug!(loan_type_id = loan_type_id.0, "loan type missing or inactive");
            return Ok(Resolution::Rejected(RejectionReason::UnknownLoanType));
        };

        if !employment_type_matches(employment_type, &loan_type.name) {
            return Ok(Resolution::Rejected(RejectionReason::EmploymentMismatch));
        }

        ensure_live(cancel)?;
        let Some(rule) = self
            .rules
            .get_latest_active_for_loan_type(loan_type_id, cancel)
            .await?
        else {
            debug!(loan_type_id = loan_type_id.0, "no active eligibility rule");
            return Ok(Resolution::Rejected(RejectionReason::NoActiveRule));
        };
        ensure_live(cancel)?;

        debug!(
            loan_type_id = loan_type_id.0,
            rule_id = rule.rule_id.0,
            "resolved eligibility rule"
        );
        Ok(Resolution::Resolved(ResolvedProduct { loan_type, rule }))
    }
}

fn ensure_live(cancel: &CancellationToken) -> Result<(), EligibilityError> {
    if cancel.is_cancelled() {
        Err(EligibilityError::Cancelled)
    } else {
        Ok(())
    }
}

impl From<LookupError> for EligibilityError {
    fn from(value: LookupError) -> Self {
        match value {
            LookupError::Cancelled => EligibilityError::Cancelled,
            other => EligibilityError::Lookup(other),
        }
    }
}
