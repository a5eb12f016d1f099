//! Derived aggregates. Never persisted.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Running totals over the whole transaction collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub savings: Decimal,
}

impl FinancialSummary {
    pub fn zero() -> Self {
        Self {
            total_income: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            savings: Decimal::ZERO,
        }
    }

    /// Both totals are zero, so there is nothing to chart.
    pub fn is_empty(&self) -> bool {
        self.total_income.is_zero() && self.total_expenses.is_zero()
    }

    pub fn in_deficit(&self) -> bool {
        self.savings.is_sign_negative() && !self.savings.is_zero()
    }
}

impl Default for FinancialSummary {
    fn default() -> Self {
        Self::zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Which proportional view the breakdown chart shows.
pub enum BreakdownKind {
    /// Expenses versus what was kept.
    Spending,
    /// Income versus the amount overspent.
    Deficit,
}

impl BreakdownKind {
    pub fn title(self) -> &'static str {
        match self {
            BreakdownKind::Spending => "Where your money went",
            BreakdownKind::Deficit => "Deficit Overview",
        }
    }
}

impl fmt::Display for BreakdownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One segment of the breakdown chart. `share` is a percentage of the chart total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownSlice {
    pub label: String,
    pub value: Decimal,
    pub share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub kind: BreakdownKind,
    pub slices: Vec<BreakdownSlice>,
}

impl Breakdown {
    pub fn total(&self) -> Decimal {
        self.slices.iter().map(|slice| slice.value).sum()
    }
}
