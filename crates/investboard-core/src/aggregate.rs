//! Category and type aggregation
//!
//! Category and type totals sum absolute values. The balance sums raw signed
//! values. Ranked results are sorted by total, descending; equal totals keep
//! the order in which their key was first encountered.
//!
//! Sums never panic: a total that leaves the `Decimal` range saturates at
//! `Decimal::MAX` or `Decimal::MIN` and stays there, and the overflow is
//! logged and reported as a [`DataQualityWarning::Overflow`].

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

use crate::models::Transaction;
use crate::types::{Category, CategoryGroup, TransactionType};

/// Vocabulary a category aggregate is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryScope {
    /// Fixed and variable income
    Investments,
    FixedIncome,
    VariableIncome,
    Income,
    Expenses,
    /// Every known category
    All,
}

impl CategoryScope {
    pub fn contains(&self, category: Category) -> bool {
        let group = category.group();
        match self {
            CategoryScope::Investments => group.is_investment(),
            CategoryScope::FixedIncome => group == CategoryGroup::FixedIncome,
            CategoryScope::VariableIncome => group == CategoryGroup::VariableIncome,
            CategoryScope::Income => group == CategoryGroup::Income,
            CategoryScope::Expenses => group == CategoryGroup::Expense,
            CategoryScope::All => true,
        }
    }
}

/// Saturating sum. Once it overflows it stays pinned at the bound it hit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct RunningTotal {
    total: Decimal,
    overflowed: bool,
}

impl RunningTotal {
    pub(crate) fn add(&mut self, amount: Decimal) {
        if self.overflowed {
            return;
        }
        match self.total.checked_add(amount) {
            Some(sum) => self.total = sum,
            None => {
                self.total = if amount.is_sign_negative() { Decimal::MIN } else { Decimal::MAX };
                self.overflowed = true;
            }
        }
    }

    pub(crate) fn total(&self) -> Decimal {
        self.total
    }

    pub(crate) fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Warn about an overflowed total, naming it `field`
    pub(crate) fn warning(&self, field: &'static str) -> Option<DataQualityWarning> {
        if !self.overflowed {
            return None;
        }
        log::warn!(target: "investboard::aggregate", "{} is out of range, saturated at {}", field, self.total);
        Some(DataQualityWarning::Overflow { field })
    }
}

impl FromIterator<Decimal> for RunningTotal {
    fn from_iter<I: IntoIterator<Item = Decimal>>(iter: I) -> Self {
        let mut running = RunningTotal::default();
        for amount in iter {
            running.add(amount);
        }
        running
    }
}

/// Fold `(key, amount)` pairs into totals ranked descending.
fn rank<K, I>(pairs: I) -> Vec<(K, Decimal, usize)>
where
    K: Eq + Hash + Copy,
    I: IntoIterator<Item = (K, Decimal)>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut totals: Vec<(K, RunningTotal, usize)> = Vec::new();

    for (key, amount) in pairs {
        let i = *index.entry(key).or_insert_with(|| {
            totals.push((key, RunningTotal::default(), 0));
            totals.len() - 1
        });
        totals[i].1.add(amount);
        totals[i].2 += 1;
    }

    if totals.iter().any(|(_, running, _)| running.overflowed()) {
        log::warn!(target: "investboard::aggregate", "A ranked total is out of range and was saturated");
    }

    let mut ranked: Vec<(K, Decimal, usize)> =
        totals.into_iter().map(|(key, running, count)| (key, running.total(), count)).collect();
    // stable: ties stay in first-encountered order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

fn percentage(amount: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    amount
        .checked_div(total)
        .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
        .map(|p| p.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

/// Total for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Decimal,
    pub count: usize,
}

/// Category breakdown for charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub count: usize,
    pub color: &'static str,
}

/// Ranked category totals
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    entries: Vec<CategoryTotal>,
}

impl CategoryTotals {
    pub fn entries(&self) -> &[CategoryTotal] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, category: Category) -> Option<Decimal> {
        self.entries.iter().find(|e| e.category == category).map(|e| e.total)
    }

    /// Highest total, if any
    pub fn top(&self) -> Option<&CategoryTotal> {
        self.entries.first()
    }

    pub fn top_category(&self) -> Option<Category> {
        self.top().map(|e| e.category)
    }

    /// Sum of every entry, saturating
    pub fn grand_total(&self) -> Decimal {
        self.entries.iter().map(|e| e.total).collect::<RunningTotal>().total()
    }

    /// Keep the `n` largest entries
    pub fn top_n(&self, n: usize) -> CategoryTotals {
        CategoryTotals {
            entries: self.entries.iter().take(n).copied().collect(),
        }
    }

    /// Entries with their share of the grand total
    pub fn breakdown(&self) -> Vec<CategoryBreakdown> {
        self.top_breakdown(self.entries.len())
    }

    /// The `n` largest entries, with shares still taken against every entry
    pub fn top_breakdown(&self, n: usize) -> Vec<CategoryBreakdown> {
        let total = self.grand_total();
        self.entries
            .iter()
            .take(n)
            .map(|e| CategoryBreakdown {
                category: e.category,
                amount: e.total,
                percentage: percentage(e.total, total),
                count: e.count,
                color: e.category.color(),
            })
            .collect()
    }
}

/// Sum `|value|` per category, keeping only known categories inside `scope`
pub fn totals_by_category<'a, I>(transactions: I, scope: CategoryScope) -> CategoryTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let pairs = transactions.into_iter().filter_map(|tx| {
        let category = tx.known_category().filter(|c| scope.contains(*c))?;
        Some((category, tx.abs_value()))
    });

    CategoryTotals {
        entries: rank(pairs)
            .into_iter()
            .map(|(category, total, count)| CategoryTotal { category, total, count })
            .collect(),
    }
}

/// Investment categories across both types (category bar chart)
pub fn investment_categories<'a, I>(transactions: I) -> CategoryTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    totals_by_category(transactions, CategoryScope::Investments)
}

/// Expense categories of outflows (expense pie)
pub fn expense_categories<'a, I>(transactions: I) -> CategoryTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    totals_by_category(
        transactions.into_iter().filter(|tx| tx.is_outflow()),
        CategoryScope::Expenses,
    )
}

/// Total for one transaction type
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TypeTotal {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub total: Decimal,
    pub count: usize,
    pub percentage: Decimal,
}

/// Sum `|value|` per type, whatever the category
pub fn totals_by_type<'a, I>(transactions: I) -> Vec<TypeTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let ranked = rank(transactions.into_iter().map(|tx| (tx.kind, tx.abs_value())));
    let total = ranked.iter().map(|(_, amount, _)| *amount).collect::<RunningTotal>().total();

    ranked
        .into_iter()
        .map(|(kind, amount, count)| TypeTotal {
            kind,
            total: amount,
            count,
            percentage: percentage(amount, total),
        })
        .collect()
}

/// Sum of raw signed values, saturating
pub fn balance<'a, I>(transactions: I) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
{
    checked_balance(transactions).0
}

/// [`balance`] plus a warning when the sum left the `Decimal` range
pub fn checked_balance<'a, I>(transactions: I) -> (Decimal, Option<DataQualityWarning>)
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let running: RunningTotal = transactions.into_iter().map(|tx| tx.value).collect();
    (running.total(), running.warning("balance"))
}

/// Problems in the caller's data that the summary surfaces instead of hiding
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// Categorized totals exceed the overall total
    NegativeRemainder { amount: Decimal },
    /// A total left the `Decimal` range and was saturated
    Overflow { field: &'static str },
}

/// Summary cards over inflow transactions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentSummary {
    /// Σ|value| of every inflow
    pub total_invested: Decimal,
    pub fixed_income: Decimal,
    pub variable_income: Decimal,
    /// `total_invested - fixed_income - variable_income`, not clamped at zero
    pub uncategorized_remainder: Decimal,
    /// Investment category with the highest inflow total
    pub top_category: Option<Category>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DataQualityWarning>,
}

impl InvestmentSummary {
    /// Fixed and variable income are sums over a subset of the inflows, so
    /// the remainder only goes negative when saturated sums stop adding up.
    pub fn compute<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let inflows: Vec<&Transaction> = transactions.into_iter().filter(|tx| tx.is_inflow()).collect();

        let total: RunningTotal = inflows.iter().map(|tx| tx.abs_value()).collect();
        let by_category = totals_by_category(inflows.iter().copied(), CategoryScope::Investments);
        let fixed = Self::group_total(&by_category, CategoryGroup::FixedIncome);
        let variable = Self::group_total(&by_category, CategoryGroup::VariableIncome);

        let mut warnings: Vec<DataQualityWarning> = [
            total.warning("total_invested"),
            fixed.warning("fixed_income"),
            variable.warning("variable_income"),
        ]
        .into_iter()
        .flatten()
        .collect();

        let uncategorized_remainder = total
            .total()
            .saturating_sub(fixed.total())
            .saturating_sub(variable.total());

        if uncategorized_remainder < Decimal::ZERO {
            log::warn!(
                target: "investboard::aggregate",
                "Categorized investments exceed total invested by {}",
                uncategorized_remainder.abs()
            );
            warnings.push(DataQualityWarning::NegativeRemainder { amount: uncategorized_remainder });
        }

        Self {
            total_invested: total.total(),
            fixed_income: fixed.total(),
            variable_income: variable.total(),
            uncategorized_remainder,
            top_category: by_category.top_category(),
            warnings,
        }
    }

    fn group_total(totals: &CategoryTotals, group: CategoryGroup) -> RunningTotal {
        totals
            .entries()
            .iter()
            .filter(|e| e.category.group() == group)
            .map(|e| e.total)
            .collect()
    }

    /// Set when the remainder came out negative
    pub fn remainder_warning(&self) -> Option<DataQualityWarning> {
        self.warnings
            .iter()
            .copied()
            .find(|w| matches!(w, DataQualityWarning::NegativeRemainder { .. }))
    }

    /// Whether the "not categorized" card has anything to show
    pub fn has_uncategorized(&self) -> bool {
        self.uncategorized_remainder > Decimal::ZERO
    }
}
