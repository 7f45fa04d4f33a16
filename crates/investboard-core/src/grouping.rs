//! Month grouping for the statement list

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Transaction;
use crate::time::MonthKey;

/// Transactions bucketed by calendar month (year is ignored)
#[derive(Debug, Clone, Default)]
pub struct MonthGroups<'a> {
    groups: BTreeMap<MonthKey, Vec<&'a Transaction>>,
}

/// Partition records by month. Records without a valid date are skipped;
/// within a bucket the input order is kept.
pub fn group_by_month<'a, I>(transactions: I) -> MonthGroups<'a>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut groups: BTreeMap<MonthKey, Vec<&'a Transaction>> = BTreeMap::new();
    for tx in transactions {
        match tx.month() {
            Some(month) => groups.entry(month).or_default().push(tx),
            None => log::debug!(target: "investboard::grouping", "Transaction {} has no date, not grouped", tx.id),
        }
    }
    MonthGroups { groups }
}

impl<'a> MonthGroups<'a> {
    pub fn get(&self, month: MonthKey) -> Option<&[&'a Transaction]> {
        self.groups.get(&month).map(Vec::as_slice)
    }

    /// Number of non-empty buckets
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Records across all buckets
    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// List display order: most recent month first
    pub fn newest_first(&self) -> impl Iterator<Item = (MonthKey, &[&'a Transaction])> + '_ {
        self.groups.iter().rev().map(|(month, txs)| (*month, txs.as_slice()))
    }

    /// Owned groups in list display order
    pub fn to_display(&self) -> Vec<MonthGroup> {
        self.newest_first()
            .map(|(month, txs)| MonthGroup {
                month,
                name: month.name().to_string(),
                transactions: txs.iter().map(|tx| (*tx).clone()).collect(),
            })
            .collect()
    }
}

/// One month header and its records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGroup {
    pub month: MonthKey,
    pub name: String,
    pub transactions: Vec<Transaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;
    use rust_decimal::Decimal;

    fn tx(id: i64, date: &str) -> Transaction {
        Transaction::new(id, TransactionType::Inflow, Decimal::from(id), date)
    }

    #[test]
    fn test_group_by_month() {
        let txs = vec![
            tx(1, "01/03/2024"),
            tx(2, "2024-01-10"),
            tx(3, "20/03/2024"),
            tx(4, "invalid"),
            tx(5, "2023-03-05"),
        ];
        let groups = group_by_month(&txs);

        assert_eq!(groups.len(), 2);
        let march: Vec<i64> = groups.get(MonthKey::new(3).unwrap()).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(march, vec![1, 3, 5]);
        assert!(groups.get(MonthKey::new(2).unwrap()).is_none());
    }

    #[test]
    fn test_every_dated_record_in_exactly_one_group() {
        let txs = vec![
            tx(1, "01/12/2024"),
            tx(2, "2024-06-10"),
            tx(3, "bad"),
            tx(4, "2024-06-11"),
            tx(5, "31/01/2025"),
        ];
        let groups = group_by_month(&txs);
        let dated = txs.iter().filter(|t| t.date.is_some()).count();

        assert_eq!(groups.record_count(), dated);
        for t in txs.iter().filter(|t| t.date.is_some()) {
            let hits = groups
                .newest_first()
                .filter(|(_, bucket)| bucket.iter().any(|b| b.id == t.id))
                .count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn test_newest_first_order() {
        let txs = vec![tx(1, "2024-01-01"), tx(2, "2024-11-01"), tx(3, "2024-05-01")];
        let groups = group_by_month(&txs);
        let order: Vec<u32> = groups.newest_first().map(|(m, _)| m.number()).collect();
        assert_eq!(order, vec![11, 5, 1]);

        let display = groups.to_display();
        assert_eq!(display[0].name, "Novembro");
        assert_eq!(display[2].transactions[0].id, 1);
    }

    #[test]
    fn test_empty_input() {
        let groups = group_by_month(std::iter::empty());
        assert!(groups.is_empty());
        assert_eq!(groups.record_count(), 0);
        assert!(groups.to_display().is_empty());
    }
}
