use serde::{Deserialize, Serialize};

pub(crate) const ELIGIBLE_REMARK: &str = "Meets age, income, credit score and EMI ratio criteria";

/// Stages of a single evaluation, in the order they run.
///
/// `ComputingEmi` cannot reject, so it never ends an evaluation; every other stage can be the
/// one reported in an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStage {
    Validating,
    ResolvingRule,
    CheckingAge,
    CheckingIncome,
    CheckingCredit,
    /// Pass-through: the installment is always computable once thresholds pass.
    ComputingEmi,
    CheckingRatio,
    Eligible,
}

impl DecisionStage {
    pub const fn label(self) -> &'static str {
        match self {
            DecisionStage::Validating => "validating",
            DecisionStage::ResolvingRule => "resolving_rule",
            DecisionStage::CheckingAge => "checking_age",
            DecisionStage::CheckingIncome => "checking_income",
            DecisionStage::CheckingCredit => "checking_credit",
            DecisionStage::ComputingEmi => "computing_emi",
            DecisionStage::CheckingRatio => "checking_ratio",
            DecisionStage::Eligible => "eligible",
        }
    }
}

/// Business reasons for a Not-Eligible verdict. Each maps to a fixed remark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    InvalidTenure,
    InvalidMonthlyIncome,
    InvalidRequestedAmount,
    MissingEmploymentType,
    UnknownLoanType,
    EmploymentMismatch,
    NoActiveRule,
    AgeOutOfRange { min_age: i32, max_age: i32 },
    IncomeBelowMinimum,
    CreditScoreBelowMinimum,
    EmiRatioExceeded,
}

impl RejectionReason {
    pub fn remark(&self) -> String {
        match self {
            RejectionReason::InvalidTenure => "Tenure must be greater than 0".to_string(),
            RejectionReason::InvalidMonthlyIncome => {
                "Monthly income must be greater than 0".to_string()
            }
            RejectionReason::InvalidRequestedAmount => {
                "Requested amount must be greater than 0".to_string()
            }
            RejectionReason::MissingEmploymentType => "Employment type is required".to_string(),
            RejectionReason::UnknownLoanType => "Invalid or inactive loan type".to_string(),
            RejectionReason::EmploymentMismatch => {
                "Employment type does not match selected loan type".to_string()
            }
            RejectionReason::NoActiveRule => {
                "No eligibility rules configured for selected loan type".to_string()
            }
            RejectionReason::AgeOutOfRange { min_age, max_age } => {
                format!("Age must be between {min_age} and {max_age}")
            }
            RejectionReason::IncomeBelowMinimum => {
                "Monthly income below minimum required threshold".to_string()
            }
            RejectionReason::CreditScoreBelowMinimum => {
                "Credit score below minimum required threshold".to_string()
            }
            RejectionReason::EmiRatioExceeded => {
                "EMI to income ratio exceeds allowed threshold".to_string()
            }
        }
    }

    /// Stage that produces this rejection.
    pub const fn stage(&self) -> DecisionStage {
        match self {
            RejectionReason::InvalidTenure
            | RejectionReason::InvalidMonthlyIncome
            | RejectionReason::InvalidRequestedAmount
            | RejectionReason::MissingEmploymentType => DecisionStage::Validating,
            RejectionReason::UnknownLoanType
            | RejectionReason::EmploymentMismatch
            | RejectionReason::NoActiveRule => DecisionStage::ResolvingRule,
            RejectionReason::AgeOutOfRange { .. } => DecisionStage::CheckingAge,
            RejectionReason::IncomeBelowMinimum => DecisionStage::CheckingIncome,
            RejectionReason::CreditScoreBelowMinimum => DecisionStage::CheckingCredit,
            RejectionReason::EmiRatioExceeded => DecisionStage::CheckingRatio,
        }
    }
}
