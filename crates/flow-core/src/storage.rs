use std::{collections::HashSet, sync::Mutex};

use flow_domain::Transaction;

use crate::CoreError;

/// Durable slot holding the serialized transaction collection.
///
/// `read` returns `Ok(None)` when nothing has been persisted yet. `write` replaces the
/// whole slot; implementations must never leave a half-written payload behind.
pub trait TransactionStorage: Send + Sync {
    fn read(&self) -> Result<Option<Vec<u8>>, CoreError>;
    fn write(&self, payload: &[u8]) -> Result<(), CoreError>;
}

/// Process-local storage slot, used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            slot: Mutex::new(Some(payload.into())),
        }
    }

    /// Copy of the currently persisted bytes.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl TransactionStorage for MemoryStorage {
    fn read(&self) -> Result<Option<Vec<u8>>, CoreError> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| CoreError::Storage("memory slot poisoned".into()))?;
        Ok(slot.clone())
    }

    fn write(&self, payload: &[u8]) -> Result<(), CoreError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| CoreError::Storage("memory slot poisoned".into()))?;
        *slot = Some(payload.to_vec());
        Ok(())
    }
}

/// Serializes the full collection into the persisted record layout.
pub fn encode_collection(transactions: &[Transaction]) -> Result<Vec<u8>, CoreError> {
    Ok(serde_json::to_vec_pretty(transactions)?)
}

/// Parses a persisted payload, rejecting anything that is not a clean collection.
pub fn decode_collection(payload: &[u8]) -> Result<Vec<Transaction>, CoreError> {
    let transactions: Vec<Transaction> = serde_json::from_slice(payload)
        .map_err(|err| CoreError::CorruptPayload(err.to_string()))?;
    let problems = collection_problems(&transactions);
    if let Some(first) = problems.into_iter().next() {
        return Err(CoreError::CorruptPayload(first));
    }
    Ok(transactions)
}

/// Detects records that violate the stored-transaction invariants.
pub fn collection_problems(transactions: &[Transaction]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut problems = Vec::new();

    for txn in transactions {
        if !seen.insert(txn.id) {
            problems.push(format!("transaction {} appears more than once", txn.id));
        }
        if !txn.is_well_formed() {
            problems.push(format!(
                "transaction {} is malformed (amount {}, description {:?})",
                txn.id, txn.amount, txn.description
            ));
        }
    }
    problems
}
