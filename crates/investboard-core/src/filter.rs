//! Filter predicates over transaction records

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::models::Transaction;
use crate::time::{parse_date, MonthKey};
use crate::types::TransactionType;

/// Filter criteria; unset criteria match everything.
///
/// Bounds are inclusive. Value bounds compare the raw signed value, date
/// bounds compare calendar dates. A record whose date did not parse never
/// matches, whatever the criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub month: Option<MonthKey>,
    pub min_value: Option<Decimal>,
    pub max_value: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn in_month(mut self, month: MonthKey) -> Self {
        self.month = Some(month);
        self
    }

    pub fn min_value(mut self, value: Decimal) -> Self {
        self.min_value = Some(value);
        self
    }

    pub fn max_value(mut self, value: Decimal) -> Self {
        self.max_value = Some(value);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Build criteria from the filter form fields
    pub fn from_form(form: &FilterForm) -> CoreResult<Self> {
        Ok(Self {
            kind: non_blank(&form.filter_type)
                .map(|s| {
                    TransactionType::from_str(s)
                        .map_err(|_| CoreError::InvalidType { input: s.to_string() })
                })
                .transpose()?,
            month: non_blank(&form.filter_month).map(MonthKey::from_str).transpose()?,
            min_value: non_blank(&form.min_value).map(parse_amount).transpose()?,
            max_value: non_blank(&form.max_value).map(parse_amount).transpose()?,
            start_date: non_blank(&form.start_date).map(parse_date).transpose()?,
            end_date: non_blank(&form.end_date).map(parse_date).transpose()?,
        })
    }

    /// Number of criteria in effect
    pub fn active_count(&self) -> usize {
        [
            self.kind.is_some(),
            self.month.is_some(),
            self.min_value.is_some(),
            self.max_value.is_some(),
            self.start_date.is_some(),
            self.end_date.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Check a single record
    pub fn matches(&self, tx: &Transaction) -> bool {
        let Some(date) = tx.date else {
            return false;
        };

        self.kind.map_or(true, |kind| tx.kind == kind)
            && self.month.map_or(true, |month| MonthKey::from_date(date) == month)
            && self.min_value.map_or(true, |min| tx.value >= min)
            && self.max_value.map_or(true, |max| tx.value <= max)
            && self.start_date.map_or(true, |start| date >= start)
            && self.end_date.map_or(true, |end| date <= end)
    }

    /// Borrowing predicate for use with iterator adapters
    pub fn predicate(&self) -> impl Fn(&&Transaction) -> bool + '_ {
        move |tx| self.matches(tx)
    }

    /// Records that match, in input order
    pub fn apply<'a, I>(&self, transactions: I) -> Vec<&'a Transaction>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions.into_iter().filter(self.predicate()).collect()
    }
}

/// Raw filter form fields; blank strings mean "unset"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterForm {
    pub filter_type: String,
    pub filter_month: String,
    pub min_value: String,
    pub max_value: String,
    pub start_date: String,
    pub end_date: String,
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Parse an amount typed by a user, accepting `1.234,56` as well as `1234.56`
pub fn parse_amount(input: &str) -> CoreResult<Decimal> {
    let trimmed = input.trim();
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    Decimal::from_str(&normalized).map_err(|_| CoreError::InvalidAmount { input: input.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction::new(1, TransactionType::Inflow, Decimal::from(100), "01/03/2024")
                .with_category("Tesouro Direto"),
            Transaction::new(2, TransactionType::Outflow, Decimal::from(-50), "15/03/2024")
                .with_category("Alimentação"),
            Transaction::new(3, TransactionType::Inflow, Decimal::from(300), "2024-04-02"),
            Transaction::new(4, TransactionType::Outflow, Decimal::from(-20), "não sei"),
            Transaction::new(5, TransactionType::Outflow, Decimal::from(80), "2024-02-29"),
        ]
    }

    fn ids(txs: &[&Transaction]) -> Vec<i64> {
        txs.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_empty_filter_matches_all_dated() {
        let txs = sample();
        let filter = TransactionFilter::new();
        assert!(filter.is_empty());
        assert_eq!(ids(&filter.apply(&txs)), vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_type_filter() {
        let txs = sample();
        let filter = TransactionFilter::new().with_type(TransactionType::Outflow);
        assert_eq!(ids(&filter.apply(&txs)), vec![2, 5]);
    }

    #[test]
    fn test_month_filter() {
        let txs = sample();
        let filter = TransactionFilter::new().in_month(MonthKey::new(3).unwrap());
        assert_eq!(ids(&filter.apply(&txs)), vec![1, 2]);
    }

    #[test]
    fn test_min_value_zero_excludes_negative_outflow() {
        let txs: Vec<_> = sample().into_iter().take(2).collect();
        let filter = TransactionFilter::new().min_value(Decimal::ZERO);
        assert_eq!(ids(&filter.apply(&txs)), vec![1]);
    }

    #[test]
    fn test_value_bounds_are_inclusive() {
        let txs = sample();
        let filter = TransactionFilter::new()
            .min_value(Decimal::from(-50))
            .max_value(Decimal::from(100));
        assert_eq!(ids(&filter.apply(&txs)), vec![1, 2, 5]);
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let txs = sample();
        let filter = TransactionFilter::new()
            .start_date(ymd(2024, 3, 1))
            .end_date(ymd(2024, 3, 15));
        assert_eq!(ids(&filter.apply(&txs)), vec![1, 2]);
    }

    #[test]
    fn test_undated_record_fails_closed() {
        let txs = sample();
        let undated = &txs[3];
        assert!(!TransactionFilter::new().matches(undated));
        assert!(!TransactionFilter::new().with_type(TransactionType::Outflow).matches(undated));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let txs = sample();
        let filter = TransactionFilter::new()
            .with_type(TransactionType::Inflow)
            .start_date(ymd(2024, 3, 1));
        let once = filter.apply(&txs);
        let twice = filter.apply(once.iter().copied());
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let txs = sample();
        let before = txs.clone();
        let _ = TransactionFilter::new().with_type(TransactionType::Inflow).apply(&txs);
        assert_eq!(txs, before);
    }

    #[test]
    fn test_from_form() {
        let form = FilterForm {
            filter_type: "Saída".to_string(),
            filter_month: "3".to_string(),
            min_value: "-1.000,50".to_string(),
            max_value: "".to_string(),
            start_date: "01/03/2024".to_string(),
            end_date: "2024-03-31".to_string(),
        };
        let filter = TransactionFilter::from_form(&form).unwrap();

        assert_eq!(filter.kind, Some(TransactionType::Outflow));
        assert_eq!(filter.month, MonthKey::new(3));
        assert_eq!(filter.min_value, Some(Decimal::new(-100050, 2)));
        assert_eq!(filter.max_value, None);
        assert_eq!(filter.start_date, Some(ymd(2024, 3, 1)));
        assert_eq!(filter.active_count(), 5);
    }

    #[test]
    fn test_from_form_blank_is_empty() {
        let filter = TransactionFilter::from_form(&FilterForm::default()).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_from_form_rejects_bad_input() {
        let form = FilterForm { filter_month: "13".to_string(), ..Default::default() };
        assert_eq!(
            TransactionFilter::from_form(&form).unwrap_err().code(),
            crate::error::ErrorCode::InvalidMonth
        );

        let form = FilterForm { min_value: "dez".to_string(), ..Default::default() };
        assert!(TransactionFilter::from_form(&form).is_err());

        let form = FilterForm { start_date: "2024/03/01".to_string(), ..Default::default() };
        assert!(TransactionFilter::from_form(&form).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("150.25").unwrap(), Decimal::new(15025, 2));
        assert_eq!(parse_amount("150,25").unwrap(), Decimal::new(15025, 2));
        assert_eq!(parse_amount(" -3 ").unwrap(), Decimal::from(-3));
    }
}
