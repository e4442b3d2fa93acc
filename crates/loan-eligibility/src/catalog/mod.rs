//! In-memory loan catalog that serves the eligibility lookups.
//!
//! Rules are stored append-only: publishing a new version never edits or removes an older one,
//! and resolution always picks the latest active version at call time.

mod import;

pub use import::{load_loan_types, load_rules, CatalogImportError};

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::eligibility::{
    current_rule, EligibilityRule, EligibilityRuleLookup, LoanType, LoanTypeId, LoanTypeLookup,
    LoanTypeSummary, LookupError,
};

#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    loan_types: Arc<RwLock<BTreeMap<LoanTypeId, LoanType>>>,
    rules: Arc<RwLock<Vec<EligibilityRule>>>,
}

impl InMemoryCatalog {
    pub fn new(loan_types: Vec<LoanType>, rules: Vec<EligibilityRule>) -> Self {
        let loan_types = loan_types
            .into_iter()
            .map(|loan_type| (loan_type.loan_type_id, loan_type))
            .collect();
        Self {
            loan_types: Arc::new(RwLock::new(loan_types)),
            rules: Arc::new(RwLock::new(rules)),
        }
    }

    /// Build a catalog from a loan type CSV export and a rule CSV export.
    pub fn from_csv_paths(
        loan_types: impl AsRef<Path>,
        rules: impl AsRef<Path>,
    ) -> Result<Self, CatalogImportError> {
        let loan_types = load_loan_types(std::fs::File::open(loan_types)?)?;
        let rules = load_rules(std::fs::File::open(rules)?)?;
        Ok(Self::new(loan_types, rules))
    }

    /// Insert or replace a loan type.
    pub fn upsert_loan_type(&self, loan_type: LoanType) -> Result<(), LookupError> {
        let mut guard = self.loan_types.write().map_err(|_| poisoned())?;
        guard.insert(loan_type.loan_type_id, loan_type);
        Ok(())
    }

    /// Append a new rule version.
    pub fn publish_rule(&self, rule: EligibilityRule) -> Result<(), LookupError> {
        let mut guard = self.rules.write().map_err(|_| poisoned())?;
        guard.push(rule);
        Ok(())
    }

    /// Every stored version for a loan type, in publication order.
    pub fn rule_versions(
        &self,
        loan_type_id: LoanTypeId,
    ) -> Result<Vec<EligibilityRule>, LookupError> {
        let guard = self.rules.read().map_err(|_| poisoned())?;
        Ok(guard
            .iter()
            .filter(|rule| rule.loan_type_id == loan_type_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LoanTypeLookup for InMemoryCatalog {
    async fn get_active_by_id(
        &self,
        id: LoanTypeId,
        cancel: &CancellationToken,
    ) -> Result<Option<LoanType>, LookupError> {
        ensure_live(cancel)?;
        let guard = self.loan_types.read().map_err(|_| poisoned())?;
        Ok(guard.get(&id).filter(|loan_type| loan_type.is_active).cloned())
    }

    async fn list_active(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<LoanTypeSummary>, LookupError> {
        ensure_live(cancel)?;
        let guard = self.loan_types.read().map_err(|_| poisoned())?;
        let mut active: Vec<LoanTypeSummary> = guard
            .values()
            .filter(|loan_type| loan_type.is_active)
            .map(LoanType::summary)
            .collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(active)
    }
}

#[async_trait]
impl EligibilityRuleLookup for InMemoryCatalog {
    async fn get_latest_active_for_loan_type(
        &self,
        loan_type_id: LoanTypeId,
        cancel: &CancellationToken,
    ) -> Result<Option<EligibilityRule>, LookupError> {
        ensure_live(cancel)?;
        let guard = self.rules.read().map_err(|_| poisoned())?;
        Ok(current_rule(guard.iter(), loan_type_id).cloned())
    }
}

fn ensure_live(cancel: &CancellationToken) -> Result<(), LookupError> {
    if cancel.is_cancelled() {
        Err(LookupError::Cancelled)
    } else {
        Ok(())
    }
}

fn poisoned() -> LookupError {
    LookupError::Unavailable("catalog lock poisoned".to_string())
}
