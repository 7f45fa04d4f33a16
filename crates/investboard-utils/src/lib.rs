//! Formatting helpers for amounts and dates

use chrono::NaiveDate;
use investboard_config::CurrencyConfig;
use rust_decimal::{Decimal, RoundingStrategy};

/// Insert `separator` between groups of three digits
pub fn group_digits(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    let len = digits.chars().count();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push_str(separator);
        }
        result.push(c);
    }
    result
}

/// Format a number with thousands and decimal separators
pub fn format_number(n: Decimal, decimal_places: u32, thousands: &str, decimal: &str) -> String {
    let rounded = n.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", decimal_places as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut result = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        result.push('-');
    }
    result.push_str(&group_digits(int_part, thousands));
    if let Some(frac) = frac_part {
        result.push_str(decimal);
        result.push_str(frac);
    }
    result
}

/// `R$ 1.234,56` style amount
pub fn format_currency(n: Decimal, currency: &CurrencyConfig) -> String {
    let rounded = n.round_dp_with_strategy(currency.decimal_places, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let number = format_number(
        rounded.abs(),
        currency.decimal_places,
        &currency.thousands_separator,
        &currency.decimal_separator,
    );
    format!("{}{} {}", sign, currency.symbol, number)
}

/// Percentage with the currency's decimal separator
pub fn format_percentage(p: Decimal, currency: &CurrencyConfig) -> String {
    format!("{}%", format_number(p, 2, &currency.thousands_separator, &currency.decimal_separator))
}

/// DD/MM/YYYY
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
