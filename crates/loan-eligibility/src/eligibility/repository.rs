use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::domain::{EligibilityRule, LoanType, LoanTypeId, LoanTypeSummary};

/// Read access to the loan product catalog.
#[async_trait]
pub trait LoanTypeLookup: Send + Sync {
    /// Active loan type with the given id, or `None` when missing or inactive.
    async fn get_active_by_id(
        &self,
        id: LoanTypeId,
        cancel: &CancellationToken,
    ) -> Result<Option<LoanType>, LookupError>;

    /// Active loan types ordered by name.
    async fn list_active(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<LoanTypeSummary>, LookupError>;
}

/// Read access to versioned eligibility rules.
#[async_trait]
pub trait EligibilityRuleLookup: Send + Sync {
    /// The current rule for a loan type: the active version with the latest `created_at`.
    async fn get_latest_active_for_loan_type(
        &self,
        loan_type_id: LoanTypeId,
        cancel: &CancellationToken,
    ) -> Result<Option<EligibilityRule>, LookupError>;
}

/// Failures raised by lookup collaborators. Not-found is `Ok(None)`, never an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("lookup cancelled")]
    Cancelled,
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}
