use flow_core::format::{
    currency_symbol, fixed_two, CurrencyFormatter, DateFormatter, IsoDateFormatter,
    StandardCurrencyFormatter,
};
use flow_domain::{BreakdownSlice, Transaction};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use uuid::Uuid;

const BAR_WIDTH: usize = 20;

/// Presentation helpers bound to the configured currency.
pub struct CliFormatters {
    currency: String,
    amounts: StandardCurrencyFormatter,
    dates: IsoDateFormatter,
}

impl CliFormatters {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            amounts: StandardCurrencyFormatter,
            dates: IsoDateFormatter,
        }
    }

    /// Grouped currency, `$1,234.56` or `-$350.00`.
    pub fn money(&self, amount: Decimal) -> String {
        self.amounts.format_amount(amount, &self.currency)
    }

    /// Ungrouped, explicitly signed amount: `+$5000.00` for income, `-$300.00` for expenses.
    pub fn signed_entry(&self, txn: &Transaction) -> String {
        let signed = txn.signed_amount();
        let sign = if signed.is_sign_negative() { '-' } else { '+' };
        format!(
            "{sign}{}{}",
            currency_symbol(&self.currency),
            fixed_two(signed.abs())
        )
    }

    pub fn transaction_line(&self, txn: &Transaction) -> String {
        format!(
            "{}  {}  {:<8} {:>12}  {}",
            self.dates.format_date(txn.date),
            short_id(txn.id),
            txn.kind.to_string(),
            self.signed_entry(txn),
            txn.description
        )
    }

    pub fn slice_line(&self, slice: &BreakdownSlice) -> String {
        format!(
            "{:<16} {} {:>5}%  {}",
            slice.label,
            share_bar(slice.share),
            slice.share,
            self.money(slice.value)
        )
    }
}

pub fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

/// Fixed-width bar for a percentage in `0..=100`.
pub fn share_bar(share: Decimal) -> String {
    let filled = (share * Decimal::from(BAR_WIDTH) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
