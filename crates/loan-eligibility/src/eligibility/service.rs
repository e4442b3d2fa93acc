use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::domain::{EligibilityDecision, EligibilityRequest, LoanTypeSummary};
use super::evaluation::{DecisionEvaluator, Evaluation};
use super::repository::{EligibilityRuleLookup, LoanTypeLookup, LookupError};
use super::resolver::RuleResolver;

/// Source of the evaluation date used for age calculations.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Calendar date in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a single date, for reproducible checks.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Service composing the lookup collaborators, the decision evaluator and a clock.
///
/// Nothing is cached between calls; every check re-reads the catalog.
pub struct EligibilityService<L, R, C = SystemClock> {
    loan_types: Arc<L>,
    evaluator: DecisionEvaluator<L, R>,
    clock: C,
}

impl<L, R> EligibilityService<L, R, SystemClock>
where
    L: LoanTypeLookup + 'static,
    R: EligibilityRuleLookup + 'static,
{
    pub fn new(loan_types: Arc<L>, rules: Arc<R>) -> Self {
        Self::with_clock(loan_types, rules, SystemClock)
    }
}

impl<L, R, C> EligibilityService<L, R, C>
where
    L: LoanTypeLookup + 'static,
    R: EligibilityRuleLookup + 'static,
    C: Clock + 'static,
{
    pub fn with_clock(loan_types: Arc<L>, rules: Arc<R>, clock: C) -> Self {
        let resolver = RuleResolver::new(loan_types.clone(), rules);
        Self {
            loan_types,
            evaluator: DecisionEvaluator::new(resolver),
            clock,
        }
    }

    /// Check a request and return the decision.
    pub async fn check(
        &self,
        request: &EligibilityRequest,
        cancel: &CancellationToken,
    ) -> Result<EligibilityDecision, EligibilityError> {
        self.evaluate(request, cancel)
            .await
            .map(|evaluation| evaluation.decision)
    }

    /// Check a request and keep the stage and rule that produced the decision.
    pub async fn evaluate(
        &self,
        request: &EligibilityRequest,
        cancel: &CancellationToken,
    ) -> Result<Evaluation, EligibilityError> {
        let today = self.clock.today();
        match self.evaluator.evaluate(request, today, cancel).await {
            Ok(evaluation) => {
                info!(
                    loan_type_id = request.loan_type_id.0,
                    stage = evaluation.stage.label(),
                    rule_id = evaluation.rule_id.map(|id| id.0),
                    eligible = evaluation.decision.is_eligible,
                    "eligibility evaluated"
                );
                Ok(evaluation)
            }
            Err(err) => {
                warn!(
                    loan_type_id = request.loan_type_id.0,
                    error = %err,
                    "eligibility check aborted"
                );
                Err(err)
            }
        }
    }

    /// Active loan types ordered by name.
    pub async fn loan_types(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<LoanTypeSummary>, EligibilityError> {
        Ok(self.loan_types.list_active(cancel).await?)
    }
}

/// Faults that prevent a decision from being produced.
#[derive(Debug, thiserror::Error)]
pub enum EligibilityError {
    #[error("eligibility check cancelled")]
    Cancelled,
    #[error(transparent)]
    Lookup(LookupError),
}
