//! Turns the current financial state into one advice request and normalizes the reply.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, warn};

use flow_domain::{FinancialSummary, Transaction};

use crate::{
    format::{fixed_two, DateFormatter, IsoDateFormatter},
    AdviceError,
};

pub const NO_TRANSACTIONS_MESSAGE: &str =
    "Please add some transactions first so I can analyze your data!";
pub const NO_TEXT_MESSAGE: &str = "Unable to generate advice at this time.";
pub const FAILURE_MESSAGE: &str =
    "Sorry, I couldn't generate insights right now. Please try again later.";
pub const CANCELLED_MESSAGE: &str = "Advice request cancelled.";

pub const DEFAULT_ADVICE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// External text-generation service. `Ok(None)` means it answered without text.
#[async_trait]
pub trait AdviceGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, AdviceError>;
}

#[derive(Debug, Clone, Copy)]
pub struct AdviceOptions {
    pub timeout: Duration,
    /// Maximum number of transactions described in the prompt, in store order.
    pub recent_limit: usize,
}

impl Default for AdviceOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_ADVICE_TIMEOUT,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

/// Result of an advice request. Every variant carries user-facing text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdviceOutcome {
    NoTransactions,
    Generated(String),
    NoText,
    Failed,
    Cancelled,
}

impl AdviceOutcome {
    pub fn text(&self) -> &str {
        match self {
            AdviceOutcome::NoTransactions => NO_TRANSACTIONS_MESSAGE,
            AdviceOutcome::Generated(text) => text,
            AdviceOutcome::NoText => NO_TEXT_MESSAGE,
            AdviceOutcome::Failed => FAILURE_MESSAGE,
            AdviceOutcome::Cancelled => CANCELLED_MESSAGE,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            AdviceOutcome::Generated(text) => text,
            other => other.text().to_string(),
        }
    }
}

/// Caller-held handle that abandons an in-flight advice request.
#[derive(Debug, Clone)]
pub struct CancelToken {
    state: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Resolves once `cancel` has been called on any clone of this token.
    pub async fn cancelled(&self) {
        let mut updates = self.state.subscribe();
        // The sender lives as long as `self`, so `changed` cannot fail here.
        while !*updates.borrow_and_update() {
            if updates.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

pub struct AdviceService {
    generator: Arc<dyn AdviceGenerator>,
    options: AdviceOptions,
}

impl AdviceService {
    pub fn new(generator: Arc<dyn AdviceGenerator>, options: AdviceOptions) -> Self {
        Self { generator, options }
    }

    /// Issues at most one generator call. Never fails; every path maps to an outcome.
    pub async fn advise(
        &self,
        summary: &FinancialSummary,
        transactions: &[Transaction],
        cancel: &CancelToken,
    ) -> AdviceOutcome {
        if transactions.is_empty() {
            return AdviceOutcome::NoTransactions;
        }
        if cancel.is_cancelled() {
            return AdviceOutcome::Cancelled;
        }

        let prompt = build_prompt(summary, transactions, self.options.recent_limit);
        debug!(chars = prompt.len(), "Requesting financial advice.");

        let reply = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Advice request cancelled by caller.");
                return AdviceOutcome::Cancelled;
            }
            reply = tokio::time::timeout(self.options.timeout, self.generator.generate(&prompt)) => reply,
        };

        match reply {
            Err(_) => {
                warn!(timeout = ?self.options.timeout, "Advice request timed out.");
                AdviceOutcome::Failed
            }
            Ok(Err(err)) => {
                warn!(error = %err, "Error fetching financial advice.");
                AdviceOutcome::Failed
            }
            Ok(Ok(Some(text))) if !text.is_empty() => AdviceOutcome::Generated(text),
            Ok(Ok(_)) => AdviceOutcome::NoText,
        }
    }
}

/// Prompt embedding the totals and the first `limit` transactions in store order.
pub fn build_prompt(
    summary: &FinancialSummary,
    transactions: &[Transaction],
    limit: usize,
) -> String {
    let dates = IsoDateFormatter;
    let recent = transactions
        .iter()
        .take(limit)
        .map(|txn| {
            format!(
                "- {}: {} ${} ({})",
                dates.format_date(txn.date),
                txn.kind.label(),
                txn.amount.normalize(),
                txn.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a helpful financial advisor. Analyze the following monthly financial summary and recent transactions.\n\
         \n\
         Summary:\n\
         - Total Income: ${}\n\
         - Total Expenses: ${}\n\
         - Net Savings: ${}\n\
         \n\
         Recent Transactions:\n\
         {}\n\
         \n\
         Please provide 3 specific, actionable, and brief tips (bullet points) to help improve savings or manage expenses better based on this data.\n\
         Keep the tone encouraging but professional. If savings are negative, prioritize debt/expense reduction advice.\n",
        fixed_two(summary.total_income),
        fixed_two(summary.total_expenses),
        fixed_two(summary.savings),
        recent
    )
}
