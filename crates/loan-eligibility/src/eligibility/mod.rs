//! Eligibility decision pipeline: input validation, rule resolution, age and EMI arithmetic,
//! and the ordered threshold checks that produce an Eligible or Not Eligible verdict.
//!
//! Business rejections are ordinary [`EligibilityDecision`] values. Only cancellation and
//! collaborator faults surface as [`EligibilityError`].

pub mod age;
pub mod domain;
pub mod emi;
pub mod employment;
pub mod evaluation;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use age::age_on;
pub use domain::{
    EligibilityDecision, EligibilityRequest, EligibilityRule, EligibilityStatus, LoanType,
    LoanTypeId, LoanTypeSummary, RuleId,
};
pub use emi::{monthly_installment, round_money};
pub use employment::employment_type_matches;
pub use evaluation::{DecisionEvaluator, DecisionStage, Evaluation, RejectionReason};
pub use repository::{EligibilityRuleLookup, LoanTypeLookup, LookupError};
pub use resolver::{current_rule, Resolution, ResolvedProduct, RuleResolver};
pub use router::eligibility_router;
pub use service::{Clock, EligibilityError, EligibilityService, FixedClock, SystemClock};
pub use validation::validate_request;
