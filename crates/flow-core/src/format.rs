use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: Decimal, currency: &str) -> String;
}

/// Formats timestamps for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: DateTime<Utc>) -> String;
}

/// `en-US` style currency rendering: `$1,234.56`, `-$350.00`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCurrencyFormatter;

impl CurrencyFormatter for StandardCurrencyFormatter {
    fn format_amount(&self, amount: Decimal, currency: &str) -> String {
        let fixed = fixed_two(amount.abs());
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let grouped = group_thousands(whole);
        let sign = if amount.is_sign_negative() && !amount.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}{}{grouped}.{fraction}", currency_symbol(currency))
    }
}

/// Calendar date of the UTC timestamp, `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoDateFormatter;

impl DateFormatter for IsoDateFormatter {
    fn format_date(&self, date: DateTime<Utc>) -> String {
        date.format("%Y-%m-%d").to_string()
    }
}

/// Two fraction digits, no grouping, rounding half away from zero.
pub fn fixed_two(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Prefix used for a currency code: a symbol for common codes, otherwise `"CODE "`.
pub fn currency_symbol(code: &str) -> String {
    match code.trim().to_ascii_uppercase().as_str() {
        "USD" | "" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        other => format!("{other} "),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
