//! Domain models for recorded income and expense events.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Largest amount a single transaction may carry. Every cent value up to this
/// bound survives the float encoding of the persisted slot unchanged.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 2); // 1_000_000_000_000_000 / 10^2

/// A single financial event. Instances are created by the store and never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        id: Uuid,
        kind: TransactionKind,
        amount: Decimal,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            amount,
            description: description.into(),
            date,
        }
    }

    /// True when the record satisfies the stored-transaction invariants.
    pub fn is_well_formed(&self) -> bool {
        self.amount > Decimal::ZERO
            && self.amount <= MAX_AMOUNT
            && !self.description.trim().is_empty()
    }

    /// Amount with the sign of its effect on savings.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("txn:{} [{}] {}", self.id, self.kind, self.description)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Closed set of transaction directions.
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Uppercase label used when describing transactions to the advice service.
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError(pub String);

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transaction type `{}` (expected income or expense)", self.0)
    }
}

impl std::error::Error for ParseKindError {}

impl FromStr for TransactionKind {
    type Err = ParseKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(TransactionKind::Income),
            "expense" | "out" => Ok(TransactionKind::Expense),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}
