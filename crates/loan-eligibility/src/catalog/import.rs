use std::io::Read;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::eligibility::{EligibilityRule, LoanType, LoanTypeId, RuleId};

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read catalog export: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid catalog CSV data: {}", err),
            CatalogImportError::InvalidField { line, field, value } => write!(
                f,
                "line {}: '{}' is not a valid value for {}",
                line, value, field
            ),
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::InvalidField { .. } => None,
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Parse loan types from a CSV export with the columns
/// `LoanTypeId,LoanTypeName,InterestRatePct,IsActive,CreatedAt`.
pub fn load_loan_types<R: Read>(reader: R) -> Result<Vec<LoanType>, CatalogImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut loan_types = Vec::new();

    for (index, record) in csv_reader.deserialize::<LoanTypeRow>().enumerate() {
        let row = record?;
        loan_types.push(row.into_loan_type(index + 2)?);
    }

    Ok(loan_types)
}

/// Parse rule versions from a CSV export with the columns
/// `RuleId,LoanTypeId,MinAge,MaxAge,MinMonthlyIncome,MinCreditScore,MaxEmiToIncomePct,IsActive,CreatedAt`.
pub fn load_rules<R: Read>(reader: R) -> Result<Vec<EligibilityRule>, CatalogImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rules = Vec::new();

    for (index, record) in csv_reader.deserialize::<RuleRow>().enumerate() {
        let row = record?;
        rules.push(row.into_rule(index + 2)?);
    }

    Ok(rules)
}

#[derive(Debug, Deserialize)]
struct LoanTypeRow {
    #[serde(rename = "LoanTypeId")]
    loan_type_id: i32,
    #[serde(rename = "LoanTypeName")]
    name: String,
    #[serde(
        rename = "InterestRatePct",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    interest_rate_pct: Option<String>,
    #[serde(rename = "IsActive")]
    is_active: bool,
    #[serde(rename = "CreatedAt")]
    created_at: String,
}

impl LoanTypeRow {
    fn into_loan_type(self, line: usize) -> Result<LoanType, CatalogImportError> {
        Ok(LoanType {
            loan_type_id: LoanTypeId(self.loan_type_id),
            interest_rate_pct: self
                .interest_rate_pct
                .as_deref()
                .map(|raw| parse_decimal(raw, line, "InterestRatePct"))
                .transpose()?,
            is_active: self.is_active,
            created_at: parse_timestamp(&self.created_at, line)?,
            name: self.name,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RuleRow {
    #[serde(rename = "RuleId")]
    rule_id: i32,
    #[serde(rename = "LoanTypeId")]
    loan_type_id: i32,
    #[serde(rename = "MinAge")]
    min_age: i32,
    #[serde(rename = "MaxAge")]
    max_age: i32,
    #[serde(rename = "MinMonthlyIncome")]
    min_monthly_income: String,
    #[serde(rename = "MinCreditScore", default)]
    min_credit_score: Option<i32>,
    #[serde(
        rename = "MaxEmiToIncomePct",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    max_emi_to_income_pct: Option<String>,
    #[serde(rename = "IsActive")]
    is_active: bool,
    #[serde(rename = "CreatedAt")]
    created_at: String,
}

impl RuleRow {
    fn into_rule(self, line: usize) -> Result<EligibilityRule, CatalogImportError> {
        Ok(EligibilityRule {
            rule_id: RuleId(self.rule_id),
            loan_type_id: LoanTypeId(self.loan_type_id),
            min_age: self.min_age,
            max_age: self.max_age,
            min_monthly_income: parse_decimal(&self.min_monthly_income, line, "MinMonthlyIncome")?,
            min_credit_score: self.min_credit_score,
            max_emi_to_income_pct: self
                .max_emi_to_income_pct
                .as_deref()
                .map(|raw| parse_decimal(raw, line, "MaxEmiToIncomePct"))
                .transpose()?,
            is_active: self.is_active,
            created_at: parse_timestamp(&self.created_at, line)?,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_decimal(
    raw: &str,
    line: usize,
    field: &'static str,
) -> Result<Decimal, CatalogImportError> {
    Decimal::from_str(raw.trim()).map_err(|_| CatalogImportError::InvalidField {
        line,
        field,
        value: raw.to_string(),
    })
}

fn parse_timestamp(raw: &str, line: usize) -> Result<DateTime<Utc>, CatalogImportError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CatalogImportError::InvalidField {
            line,
            field: "CreatedAt",
            value: raw.to_string(),
        })
}
