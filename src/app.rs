//! Application facade tying the store, summary and advice adapter together.

use std::{path::Path, sync::Arc};

use flow_config::Config;
use flow_core::{
    AdviceGenerator, AdviceOutcome, AdviceService, CancelToken, LoadOutcome, SummaryService,
    TransactionStorage, TransactionStore,
};
use flow_domain::{Breakdown, FinancialSummary, Transaction, TransactionKind};
use flow_storage_json::JsonFileStorage;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    advice,
    errors::{AppError, Result},
};

pub struct FinanceApp {
    store: TransactionStore,
    summary: FinancialSummary,
    advice: AdviceService,
    currency: String,
}

impl FinanceApp {
    /// Loads the store from `storage` and derives the initial summary.
    pub fn open(
        config: &Config,
        storage: Box<dyn TransactionStorage>,
        generator: Arc<dyn AdviceGenerator>,
    ) -> Self {
        Self::with_store(config, TransactionStore::load(storage), generator)
    }

    /// Like [`FinanceApp::open`] for a store built by the caller.
    pub fn with_store(
        config: &Config,
        store: TransactionStore,
        generator: Arc<dyn AdviceGenerator>,
    ) -> Self {
        let summary = SummaryService::derive(store.all());
        let advice = AdviceService::new(generator, advice::options_for(&config.advice));
        Self {
            store,
            summary,
            advice,
            currency: config.currency.clone(),
        }
    }

    /// Opens the JSON slot under the configured data directory and picks the
    /// advice generator from the configured credential variable.
    pub fn from_config(config: &Config, app_home: &Path) -> Result<Self> {
        let data_dir = config.resolve_data_dir(app_home);
        let storage = JsonFileStorage::in_dir(&data_dir, &config.slot_name)?;
        info!(path = %storage.path().display(), "Opening transaction slot.");
        let generator = advice::generator_for(&config.advice);
        Ok(Self::open(config, Box::new(storage), generator))
    }

    pub fn add_transaction(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        description: &str,
    ) -> Result<Uuid> {
        let id = self.store.add(kind, amount, description)?;
        self.refresh_summary();
        Ok(id)
    }

    /// Returns whether a record was removed.
    pub fn delete_transaction(&mut self, id: Uuid) -> bool {
        let removed = self.store.remove(id);
        if removed {
            self.refresh_summary();
        }
        removed
    }

    /// Presentation order: newest first.
    pub fn transactions(&self) -> Vec<&Transaction> {
        self.store.by_date_desc()
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.store.get(id)
    }

    pub fn summary(&self) -> FinancialSummary {
        self.summary
    }

    pub fn breakdown(&self) -> Option<Breakdown> {
        SummaryService::breakdown(&self.summary)
    }

    pub async fn request_advice(&self, cancel: &CancelToken) -> AdviceOutcome {
        self.advice
            .advise(&self.summary, self.store.all(), cancel)
            .await
    }

    /// Resolves a full id or a unique, case-insensitive id prefix.
    pub fn resolve_id(&self, input: &str) -> Result<Uuid> {
        let needle = input.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(AppError::InvalidInput("transaction id is required".into()));
        }
        if let Ok(id) = Uuid::parse_str(&needle) {
            return Ok(id);
        }

        let mut matches = self
            .store
            .all()
            .iter()
            .map(|txn| txn.id)
            .filter(|id| id.hyphenated().to_string().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(id),
            (Some(_), Some(_)) => Err(AppError::InvalidInput(format!(
                "id prefix `{input}` matches more than one transaction"
            ))),
            (None, _) => Err(AppError::TransactionNotFound(input.to_string())),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        self.store.load_outcome()
    }

    pub fn last_persist_error(&self) -> Option<&str> {
        self.store.last_persist_error()
    }

    fn refresh_summary(&mut self) {
        self.summary = SummaryService::derive(self.store.all());
        debug!(
            income = %self.summary.total_income,
            expenses = %self.summary.total_expenses,
            "Summary refreshed."
        );
    }
}
