//! Aggregation helpers for the running summary and the breakdown chart.

use rust_decimal::{Decimal, RoundingStrategy};

use flow_domain::{Breakdown, BreakdownKind, BreakdownSlice, FinancialSummary, Transaction};

/// Stateless derivations over a transaction collection.
///
/// See also: [`flow_domain::FinancialSummary`] for the returned data model.
pub struct SummaryService;

impl SummaryService {
    /// Totals income and expenses. An empty collection yields all zeros.
    ///
    /// Sums saturate at the `Decimal` range instead of overflowing.
    pub fn derive(transactions: &[Transaction]) -> FinancialSummary {
        let (total_income, total_expenses) = transactions.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(income, expenses), txn| {
                if txn.is_income() {
                    (income.saturating_add(txn.amount), expenses)
                } else {
                    (income, expenses.saturating_add(txn.amount))
                }
            },
        );

        FinancialSummary {
            total_income,
            total_expenses,
            savings: total_income.saturating_sub(total_expenses),
        }
    }

    /// Proportional view of the summary, or `None` when there is nothing to show.
    pub fn breakdown(summary: &FinancialSummary) -> Option<Breakdown> {
        if summary.is_empty() {
            return None;
        }

        let (kind, candidates) = if summary.in_deficit() {
            (
                BreakdownKind::Deficit,
                [
                    ("Income Covered", summary.total_income),
                    ("Overspending", summary.savings.abs()),
                ],
            )
        } else {
            (
                BreakdownKind::Spending,
                [
                    ("Expenses", summary.total_expenses),
                    ("Savings", summary.savings),
                ],
            )
        };

        let total = candidates
            .iter()
            .fold(Decimal::ZERO, |sum, (_, value)| sum.saturating_add(*value));
        let slices = candidates
            .into_iter()
            .filter(|(_, value)| *value > Decimal::ZERO)
            .map(|(label, value)| BreakdownSlice {
                label: label.to_string(),
                value,
                share: share_of(value, total),
            })
            .collect();

        Some(Breakdown { kind, slices })
    }
}

fn share_of(value: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    value
        .checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use flow_domain::TransactionKind;
    use uuid::Uuid;

    use super::*;

    fn txn(kind: TransactionKind, cents: i64) -> Transaction {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        Transaction::new(Uuid::new_v4(), kind, Decimal::new(cents, 2), "entry", date)
    }

    fn summary(income: i64, expenses: i64) -> FinancialSummary {
        FinancialSummary {
            total_income: Decimal::from(income),
            total_expenses: Decimal::from(expenses),
            savings: Decimal::from(income - expenses),
        }
    }

    #[test]
    fn empty_collection_derives_zero_summary() {
        assert_eq!(SummaryService::derive(&[]), FinancialSummary::zero());
    }

    #[test]
    fn derive_is_order_independent() {
        let mut transactions = vec![
            txn(TransactionKind::Income, 10),
            txn(TransactionKind::Income, 20),
            txn(TransactionKind::Expense, 30),
            txn(TransactionKind::Income, 123_456_789),
            txn(TransactionKind::Expense, 1),
        ];
        let forward = SummaryService::derive(&transactions);
        transactions.reverse();
        let backward = SummaryService::derive(&transactions);
        transactions.rotate_left(2);
        let rotated = SummaryService::derive(&transactions);

        assert_eq!(forward, backward);
        assert_eq!(forward, rotated);
        assert_eq!(forward.total_income, Decimal::new(123_456_819, 2));
    }

    #[test]
    fn derive_saturates_instead_of_overflowing() {
        let huge = |kind| {
            let date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
            Transaction::new(Uuid::new_v4(), kind, Decimal::MAX, "entry", date)
        };
        let transactions = vec![
            huge(TransactionKind::Income),
            huge(TransactionKind::Income),
            huge(TransactionKind::Expense),
        ];

        let summary = SummaryService::derive(&transactions);
        assert_eq!(summary.total_income, Decimal::MAX);
        assert_eq!(summary.savings, Decimal::ZERO);
    }

    #[test]
    fn share_of_large_values_stays_in_range() {
        let summary = FinancialSummary {
            total_income: Decimal::MAX,
            total_expenses: Decimal::MAX / Decimal::from(4),
            savings: Decimal::MAX - Decimal::MAX / Decimal::from(4),
        };
        let breakdown = SummaryService::breakdown(&summary).unwrap();

        assert_eq!(breakdown.slices[0].share, Decimal::from(25));
        assert_eq!(breakdown.slices[1].share, Decimal::from(75));
    }

    #[test]
    fn breakdown_is_none_without_activity() {
        assert!(SummaryService::breakdown(&FinancialSummary::zero()).is_none());
    }

    #[test]
    fn breakdown_shows_spending_when_saving() {
        let breakdown = SummaryService::breakdown(&summary(5000, 1500)).unwrap();

        assert_eq!(breakdown.kind, BreakdownKind::Spending);
        assert_eq!(breakdown.slices.len(), 2);
        assert_eq!(breakdown.slices[0].label, "Expenses");
        assert_eq!(breakdown.slices[0].share, Decimal::new(300, 1));
        assert_eq!(breakdown.slices[1].label, "Savings");
        assert_eq!(breakdown.slices[1].value, Decimal::from(3500));
        assert_eq!(breakdown.slices[1].share, Decimal::new(700, 1));
    }

    #[test]
    fn breakdown_shows_deficit_when_overspending() {
        let breakdown = SummaryService::breakdown(&summary(100, 400)).unwrap();

        assert_eq!(breakdown.kind, BreakdownKind::Deficit);
        assert_eq!(breakdown.slices[0].label, "Income Covered");
        assert_eq!(breakdown.slices[1].label, "Overspending");
        assert_eq!(breakdown.slices[1].value, Decimal::from(300));
        assert_eq!(breakdown.total(), Decimal::from(400));
    }

    #[test]
    fn breakdown_drops_zero_slices() {
        let only_income = SummaryService::breakdown(&summary(800, 0)).unwrap();
        assert_eq!(only_income.slices.len(), 1);
        assert_eq!(only_income.slices[0].label, "Savings");
        assert_eq!(only_income.slices[0].share, Decimal::ONE_HUNDRED);

        let only_expenses = SummaryService::breakdown(&summary(0, 350)).unwrap();
        assert_eq!(only_expenses.kind, BreakdownKind::Deficit);
        assert_eq!(only_expenses.slices.len(), 1);
        assert_eq!(only_expenses.slices[0].label, "Overspending");
    }
}
