use chrono::NaiveDate;
use loan_eligibility::catalog::{load_loan_types, load_rules, InMemoryCatalog};
use loan_eligibility::config::CatalogSeed;
use loan_eligibility::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

const BUILT_IN_LOAN_TYPES: &str = include_str!("../catalog/loan_types.csv");
const BUILT_IN_RULES: &str = include_str!("../catalog/eligibility_rules.csv");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog bundled with the binary for local runs and demos.
pub(crate) fn default_catalog() -> Result<InMemoryCatalog, AppError> {
    let loan_types = load_loan_types(BUILT_IN_LOAN_TYPES.as_bytes())?;
    let rules = load_rules(BUILT_IN_RULES.as_bytes())?;
    Ok(InMemoryCatalog::new(loan_types, rules))
}

pub(crate) fn load_catalog(seed: &CatalogSeed) -> Result<InMemoryCatalog, AppError> {
    match seed {
        CatalogSeed::BuiltIn => {
            info!("seeding catalog from built-in products");
            default_catalog()
        }
        CatalogSeed::Csv { loan_types, rules } => {
            info!(
                loan_types = %loan_types.display(),
                rules = %rules.display(),
                "seeding catalog from csv exports"
            );
            Ok(InMemoryCatalog::from_csv_paths(loan_types, rules)?)
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim())
        .map_err(|err| format!("failed to parse '{raw}' as an amount ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_eligibility::eligibility::{LoanTypeId, RuleId};

    #[test]
    fn built_in_catalog_parses() {
        let catalog = default_catalog().expect("bundled csv parses");

        let versions = catalog
            .rule_versions(LoanTypeId(3))
            .expect("catalog readable");
        let ids: Vec<RuleId> = versions.iter().map(|rule| rule.rule_id).collect();
        assert_eq!(ids, vec![RuleId(3), RuleId(4)]);
    }

    #[test]
    fn parses_cli_values() {
        assert_eq!(
            parse_date(" 1994-01-10 "),
            Ok(NaiveDate::from_ymd_opt(1994, 1, 10).expect("valid date"))
        );
        assert!(parse_date("10/01/1994").is_err());
        assert_eq!(parse_amount("1500.50"), Ok(Decimal::new(150050, 2)));
        assert!(parse_amount("lots").is_err());
    }
}
