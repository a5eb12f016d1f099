//! Authoritative in-memory transaction collection mirrored to a storage slot.

use rust_decimal::{prelude::FromPrimitive, Decimal, RoundingStrategy};
use tracing::{debug, info, warn};
use uuid::Uuid;

use flow_domain::{Displayable, Identifiable, Transaction, TransactionKind, MAX_AMOUNT};

use crate::{
    storage::{decode_collection, encode_collection, TransactionStorage},
    time::{Clock, SystemClock},
    CoreError,
};

/// Notification emitted after every store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Added(Uuid),
    Removed(Uuid),
    PersistFailed(String),
}

/// Callback invoked with the event and the collection as it stands afterwards.
pub type StoreListener = Box<dyn FnMut(&StoreEvent, &[Transaction]) + Send>;

/// How the initial collection was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing had been persisted yet.
    Fresh,
    /// The persisted collection was read back with this many records.
    Restored(usize),
    /// The slot was unreadable or corrupt; the store started empty.
    Recovered(String),
}

pub struct TransactionStore {
    transactions: Vec<Transaction>,
    storage: Box<dyn TransactionStorage>,
    clock: Box<dyn Clock>,
    listeners: Vec<StoreListener>,
    load_outcome: LoadOutcome,
    last_persist_error: Option<String>,
}

impl TransactionStore {
    /// Reads the persisted collection, falling back to an empty one on any failure.
    pub fn load(storage: Box<dyn TransactionStorage>) -> Self {
        Self::load_with_clock(storage, Box::new(SystemClock))
    }

    pub fn load_with_clock(storage: Box<dyn TransactionStorage>, clock: Box<dyn Clock>) -> Self {
        let (transactions, load_outcome) = match storage.read() {
            Ok(None) => {
                info!("No persisted transactions found; starting with an empty collection.");
                (Vec::new(), LoadOutcome::Fresh)
            }
            Ok(Some(payload)) => match decode_collection(&payload) {
                Ok(transactions) => {
                    info!(count = transactions.len(), "Loaded persisted transactions.");
                    let count = transactions.len();
                    (transactions, LoadOutcome::Restored(count))
                }
                Err(err) => {
                    warn!(error = %err, "Discarding unreadable transaction payload.");
                    (Vec::new(), LoadOutcome::Recovered(err.to_string()))
                }
            },
            Err(err) => {
                warn!(error = %err, "Transaction storage could not be read.");
                (Vec::new(), LoadOutcome::Recovered(err.to_string()))
            }
        };

        Self {
            transactions,
            storage,
            clock,
            listeners: Vec::new(),
            load_outcome,
            last_persist_error: None,
        }
    }

    /// Records a new transaction at the front of the collection and returns its id.
    pub fn add(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        description: &str,
    ) -> Result<Uuid, CoreError> {
        let (amount, description) = validate_input(amount, description)?;
        let id = self.fresh_id();
        let transaction = Transaction::new(id, kind, amount, description, self.clock.now());
        debug!(label = %transaction.display_label(), %amount, "Adding transaction.");

        self.transactions.insert(0, transaction);
        self.persist();
        self.notify(StoreEvent::Added(id));
        Ok(id)
    }

    /// Deletes the transaction with `id`. Returns `false` when no such record exists.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let Some(index) = self.transactions.iter().position(|txn| txn.id() == id) else {
            debug!(%id, "Remove ignored; transaction not present.");
            return false;
        };
        let removed = self.transactions.remove(index);
        debug!(label = %removed.display_label(), "Removed transaction.");

        self.persist();
        self.notify(StoreEvent::Removed(id));
        true
    }

    /// Collection in store order (newest insertion first).
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Presentation order: most recent `date` first, ties keep store order.
    pub fn by_date_desc(&self) -> Vec<&Transaction> {
        let mut ordered: Vec<&Transaction> = self.transactions.iter().collect();
        ordered.sort_by(|a, b| b.date.cmp(&a.date));
        ordered
    }

    pub fn get(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id() == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn subscribe(&mut self, listener: StoreListener) {
        self.listeners.push(listener);
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Most recent write failure, cleared by the next successful write.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    fn fresh_id(&self) -> Uuid {
        loop {
            let candidate = Uuid::new_v4();
            if self.get(candidate).is_none() {
                return candidate;
            }
        }
    }

    fn persist(&mut self) {
        let result = encode_collection(&self.transactions)
            .and_then(|payload| self.storage.write(&payload));
        match result {
            Ok(()) => self.last_persist_error = None,
            Err(err) => {
                warn!(error = %err, "Failed to persist transactions; keeping in-memory state.");
                let message = err.to_string();
                self.last_persist_error = Some(message.clone());
                self.notify(StoreEvent::PersistFailed(message));
            }
        }
    }

    fn notify(&mut self, event: StoreEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event, &self.transactions);
        }
    }
}

/// Checks raw input and normalizes it into a stored amount and trimmed description.
pub fn validate_input(amount: f64, description: &str) -> Result<(Decimal, String), CoreError> {
    if !amount.is_finite() {
        return Err(CoreError::Validation("amount must be a finite number".into()));
    }
    if amount <= 0.0 {
        return Err(CoreError::Validation("amount must be greater than zero".into()));
    }
    let amount = Decimal::from_f64(amount)
        .ok_or_else(|| CoreError::Validation("amount is out of range".into()))?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if amount <= Decimal::ZERO {
        return Err(CoreError::Validation("amount must be at least 0.01".into()));
    }
    if amount > MAX_AMOUNT {
        return Err(CoreError::Validation(format!(
            "amount must not exceed {MAX_AMOUNT}"
        )));
    }

    let description = description.trim();
    if description.is_empty() {
        return Err(CoreError::Validation("description must not be empty".into()));
    }
    Ok((amount, description.to_string()))
}
