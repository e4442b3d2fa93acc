mod checks;
mod policy;

pub(crate) use checks::{first_rejection, Check};
pub use policy::{DecisionStage, RejectionReason};

use std::num::NonZeroU32;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::age::age_on;
use super::domain::{EligibilityDecision, EligibilityRequest, EligibilityRule, RuleId};
use super::emi::{monthly_installment, round_money};
use super::repository::{EligibilityRuleLookup, LoanTypeLookup};
use super::resolver::{Resolution, ResolvedProduct, RuleResolver};
use super::service::EligibilityError;
use super::validation::validate_request;
use policy::ELIGIBLE_REMARK;

/// Result of one pass through the pipeline, with the stage it finished in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub decision: EligibilityDecision,
    pub stage: DecisionStage,
    pub rule_id: Option<RuleId>,
}

impl Evaluation {
    fn rejected(reason: RejectionReason, rule_id: Option<RuleId>) -> Self {
        Self {
            decision: EligibilityDecision::not_eligible(reason.remark()),
            stage: reason.stage(),
            rule_id,
        }
    }
}

/// Runs validation, rule resolution and the threshold chain for a request.
pub struct DecisionEvaluator<L, R> {
    resolver: RuleResolver<L, R>,
}

impl<L, R> DecisionEvaluator<L, R>
where
    L: LoanTypeLookup + 'static,
    R: EligibilityRuleLookup + 'static,
{
    pub fn new(resolver: RuleResolver<L, R>) -> Self {
        Self { resolver }
    }

    /// Evaluates `request` as of `today`.
    ///
    /// Business rejections come back as `Ok` with a Not-Eligible decision. Errors are reserved
    /// for cancellation and collaborator faults.
    pub async fn evaluate(
        &self,
        request: &EligibilityRequest,
        today: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<Evaluation, EligibilityError> {
        let tenure = match validate_request(request) {
            Ok(tenure) => tenure,
            Err(reason) => return Ok(Evaluation::rejected(reason, None)),
        };

        let product = match self
            .resolver
            .resolve(request.loan_type_id, &request.employment_type, cancel)
            .await?
        {
            Resolution::Resolved(product) => product,
            Resolution::Rejected(reason) => return Ok(Evaluation::rejected(reason, None)),
        };

        Ok(assess(request, tenure, &product, today))
    }
}

struct ApplicantThresholds {
    age: i32,
    monthly_income: Decimal,
    credit_score: i32,
    rule: EligibilityRule,
}

const THRESHOLD_CHECKS: [Check<ApplicantThresholds>; 3] = [
    Check {
        rejects: |ctx| ctx.age < ctx.rule.min_age || ctx.age > ctx.rule.max_age,
        reason: |ctx| RejectionReason::AgeOutOfRange {
            min_age: ctx.rule.min_age,
            max_age: ctx.rule.max_age,
        },
    },
    Check {
        rejects: |ctx| ctx.monthly_income < ctx.rule.min_monthly_income,
        reason: |_| RejectionReason::IncomeBelowMinimum,
    },
    Check {
        rejects: |ctx| {
            ctx.rule
                .min_credit_score
                .is_some_and(|minimum| ctx.credit_score < minimum)
        },
        reason: |_| RejectionReason::CreditScoreBelowMinimum,
    },
];

struct Affordability {
    emi_to_income_pct: Decimal,
    max_emi_to_income_pct: Option<Decimal>,
}

const AFFORDABILITY_CHECKS: [Check<Affordability>; 1] = [Check {
    rejects: |ctx| {
        ctx.max_emi_to_income_pct
            .is_some_and(|maximum| ctx.emi_to_income_pct > maximum)
    },
    reason: |_| RejectionReason::EmiRatioExceeded,
}];

/// Applies the age, income, credit and EMI ratio thresholds of a resolved rule.
pub fn assess(
    request: &EligibilityRequest,
    tenure: NonZeroU32,
    product: &ResolvedProduct,
    today: NaiveDate,
) -> Evaluation {
    let rule = &product.rule;
    let rule_id = Some(rule.rule_id);

    let thresholds = ApplicantThresholds {
        age: age_on(request.date_of_birth, today),
        monthly_income: request.monthly_income,
        credit_score: request.credit_score,
        rule: rule.clone(),
    };
    if let Some(reason) = first_rejection(&THRESHOLD_CHECKS, &thresholds) {
        return Evaluation::rejected(reason, rule_id);
    }

    let calculated_emi = monthly_installment(
        request.requested_amount,
        product.loan_type.annual_rate_pct(),
        tenure,
    );
    let emi_to_income_pct = emi_to_income_pct(request, calculated_emi);

    let affordability = Affordability {
        emi_to_income_pct,
        max_emi_to_income_pct: rule.max_emi_to_income_pct,
    };
    if let Some(reason) = first_rejection(&AFFORDABILITY_CHECKS, &affordability) {
        return Evaluation::rejected(reason, rule_id);
    }

    Evaluation {
        decision: EligibilityDecision::eligible(
            ELIGIBLE_REMARK,
            round_money(calculated_emi),
            round_money(emi_to_income_pct),
        ),
        stage: DecisionStage::Eligible,
        rule_id,
    }
}

fn emi_to_income_pct(request: &EligibilityRequest, calculated_emi: Decimal) -> Decimal {
    let total_emi = request.existing_emi.saturating_add(calculated_emi);
    total_emi
        .checked_div(request.monthly_income)
        .map(|share| share.saturating_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::MAX)
}
