use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog loan products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanTypeId(pub i32);

/// Identifier wrapper for a single eligibility rule version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub i32);

/// Applicant supplied data for a single eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRequest {
    pub loan_type_id: LoanTypeId,
    pub requested_amount: Decimal,
    pub tenure_in_months: i32,
    pub date_of_birth: NaiveDate,
    pub employment_type: String,
    pub monthly_income: Decimal,
    #[serde(default)]
    pub existing_emi: Decimal,
    pub credit_score: i32,
}

/// Loan product as published by the catalog.
///
/// The display name may carry an employment marker such as `(Salaried)`; see
/// [`employment_type_matches`](super::employment_type_matches).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanType {
    pub loan_type_id: LoanTypeId,
    pub name: String,
    pub interest_rate_pct: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl LoanType {
    /// Annual rate used for amortization; products without a rate are interest free.
    pub fn annual_rate_pct(&self) -> Decimal {
        self.interest_rate_pct.unwrap_or(Decimal::ZERO)
    }

    pub fn summary(&self) -> LoanTypeSummary {
        LoanTypeSummary {
            loan_type_id: self.loan_type_id,
            name: self.name.clone(),
        }
    }
}

/// Listing entry for loan type pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTypeSummary {
    pub loan_type_id: LoanTypeId,
    pub name: String,
}

/// One version of the thresholds applied to a loan type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRule {
    pub rule_id: RuleId,
    pub loan_type_id: LoanTypeId,
    pub min_age: i32,
    pub max_age: i32,
    pub min_monthly_income: Decimal,
    pub min_credit_score: Option<i32>,
    pub max_emi_to_income_pct: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl EligibilityRule {
    /// Ordering key for picking the current version: latest `created_at`, then highest id.
    pub fn version_key(&self) -> (DateTime<Utc>, RuleId) {
        (self.created_at, self.rule_id)
    }
}

/// Verdict label exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityStatus {
    #[serde(rename = "Eligible")]
    Eligible,
    #[serde(rename = "Not Eligible")]
    NotEligible,
}

impl EligibilityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EligibilityStatus::Eligible => "Eligible",
            EligibilityStatus::NotEligible => "Not Eligible",
        }
    }
}

/// Outcome of an eligibility check. Produced fresh per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityDecision {
    pub is_eligible: bool,
    pub eligibility_status: EligibilityStatus,
    pub remarks: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub calculated_emi: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub emi_to_income_pct: Option<Decimal>,
}

impl EligibilityDecision {
    pub fn eligible(remarks: impl Into<String>, calculated_emi: Decimal, ratio: Decimal) -> Self {
        Self {
            is_eligible: true,
            eligibility_status: EligibilityStatus::Eligible,
            remarks: remarks.into(),
            calculated_emi: Some(calculated_emi),
            emi_to_income_pct: Some(ratio),
        }
    }

    pub fn not_eligible(remarks: impl Into<String>) -> Self {
        Self {
            is_eligible: false,
            eligibility_status: EligibilityStatus::NotEligible,
            remarks: remarks.into(),
            calculated_emi: None,
            emi_to_income_pct: None,
        }
    }
}
