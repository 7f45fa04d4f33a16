//! Monthly inflow/outflow series for trend charts
//!
//! Buckets are keyed by year and month and iterate oldest to newest, the
//! reverse of the statement list's [`newest_first`](crate::grouping::MonthGroups::newest_first).

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregate::RunningTotal;
use crate::models::Transaction;
use crate::time::Period;
use crate::types::TransactionType;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct FlowTotals {
    inflow: RunningTotal,
    outflow: RunningTotal,
}

impl FlowTotals {
    fn point(&self, period: Period) -> TrendPoint {
        TrendPoint {
            period,
            inflow_total: self.inflow.total(),
            outflow_total: self.outflow.total(),
        }
    }
}

/// One chart point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub period: Period,
    /// Sum of raw inflow values
    pub inflow_total: Decimal,
    /// Sum of absolute outflow values
    pub outflow_total: Decimal,
}

impl TrendPoint {
    pub fn label(&self) -> String {
        self.period.to_string()
    }
}

/// Per-period accumulation; iterate with [`TrendSeries::oldest_first`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendSeries {
    buckets: BTreeMap<Period, FlowTotals>,
}

impl TrendSeries {
    /// Accumulate records; undated ones are skipped
    pub fn build<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut buckets: BTreeMap<Period, FlowTotals> = BTreeMap::new();
        for tx in transactions {
            let Some(period) = tx.period() else {
                log::debug!(target: "investboard::trend", "Transaction {} has no date, not charted", tx.id);
                continue;
            };
            let totals = buckets.entry(period).or_default();
            match tx.kind {
                TransactionType::Inflow => totals.inflow.add(tx.value),
                TransactionType::Outflow => totals.outflow.add(tx.abs_value()),
            }
        }

        for (period, totals) in &buckets {
            if totals.inflow.overflowed() || totals.outflow.overflowed() {
                log::warn!(target: "investboard::trend", "Totals for {} are out of range and were saturated", period);
            }
        }
        Self { buckets }
    }

    /// Chart order: chronological ascending. Each call starts a fresh pass.
    pub fn oldest_first(&self) -> impl Iterator<Item = TrendPoint> + '_ {
        self.buckets.iter().map(|(period, totals)| totals.point(*period))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, period: Period) -> Option<TrendPoint> {
        self.buckets.get(&period).map(|totals| totals.point(period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: i64, kind: TransactionType, value: i64, date: &str) -> Transaction {
        Transaction::new(id, kind, Decimal::from(value), date)
    }

    #[test]
    fn test_series_accumulates_per_period() {
        let txs = vec![
            tx(1, TransactionType::Inflow, 100, "01/03/2024"),
            tx(2, TransactionType::Outflow, -50, "15/03/2024"),
            tx(3, TransactionType::Outflow, 30, "2024-03-20"),
            tx(4, TransactionType::Inflow, 10, "2023-03-01"),
        ];
        let series = TrendSeries::build(&txs);
        let march = series.get(Period { year: 2024, month: 3 }).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(march.inflow_total, Decimal::from(100));
        assert_eq!(march.outflow_total, Decimal::from(80));
        assert_eq!(march.label(), "03/2024");
    }

    #[test]
    fn test_oldest_first_is_chronological() {
        let txs = vec![
            tx(1, TransactionType::Inflow, 1, "2024-02-01"),
            tx(2, TransactionType::Inflow, 1, "2023-12-01"),
            tx(3, TransactionType::Inflow, 1, "2024-01-01"),
            tx(4, TransactionType::Inflow, 1, "2023-11-30"),
        ];
        let series = TrendSeries::build(&txs);
        let labels: Vec<String> = series.oldest_first().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["11/2023", "12/2023", "01/2024", "02/2024"]);
    }

    #[test]
    fn test_series_is_restartable() {
        let txs = vec![
            tx(1, TransactionType::Inflow, 5, "2024-02-01"),
            tx(2, TransactionType::Outflow, -7, "2024-01-01"),
        ];
        let series = TrendSeries::build(&txs);
        let first: Vec<TrendPoint> = series.oldest_first().collect();
        let second: Vec<TrendPoint> = series.oldest_first().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_near_max_values_saturate() {
        let huge = Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0);
        let txs = vec![
            Transaction::new(1, TransactionType::Inflow, huge, "2024-01-01"),
            Transaction::new(2, TransactionType::Inflow, huge, "2024-01-09"),
            Transaction::new(3, TransactionType::Outflow, -huge, "2024-01-10"),
            Transaction::new(4, TransactionType::Outflow, -huge, "2024-01-11"),
        ];
        let point = TrendSeries::build(&txs).get(Period { year: 2024, month: 1 }).unwrap();
        assert_eq!(point.inflow_total, Decimal::MAX);
        assert_eq!(point.outflow_total, Decimal::MAX);
    }

    #[test]
    fn test_undated_and_empty() {
        let txs = vec![tx(1, TransactionType::Inflow, 5, "amanhã")];
        assert!(TrendSeries::build(&txs).is_empty());
        assert_eq!(TrendSeries::build(std::iter::empty()).oldest_first().count(), 0);
    }
}
