//! Report structures handed to the rendering layer

use investboard_config::Config;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{
    checked_balance, expense_categories, investment_categories, totals_by_type, CategoryBreakdown,
    DataQualityWarning, InvestmentSummary, TypeTotal,
};
use crate::filter::TransactionFilter;
use crate::grouping::{group_by_month, MonthGroup};
use crate::models::Transaction;
use crate::pagination::Paginator;
use crate::time::MonthKey;
use crate::trend::{TrendPoint, TrendSeries};

/// Knobs for building a [`DashboardReport`]
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub paginator: Paginator,
    /// Entries kept in ranked category charts
    pub top_items: usize,
    /// Restrict the expense pie to one month
    pub expense_month: Option<MonthKey>,
    pub list_filter: TransactionFilter,
    pub list_page: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            paginator: Paginator::default(),
            top_items: 10,
            expense_month: None,
            list_filter: TransactionFilter::default(),
            list_page: 1,
        }
    }
}

impl DashboardOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            paginator: Paginator::new(config.pagination.page_size),
            top_items: config.charts.top_items_count,
            ..Self::default()
        }
    }
}

/// Statement list: one filtered page, grouped by month, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionListView {
    pub groups: Vec<MonthGroup>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// Records matching the filter
    pub total_items: usize,
    pub active_filters: usize,
}

impl TransactionListView {
    pub fn build(
        transactions: &[Transaction],
        filter: &TransactionFilter,
        paginator: Paginator,
        page: usize,
    ) -> Self {
        let filtered = filter.apply(transactions);
        let page = paginator.page(&filtered, page);
        let groups = group_by_month(page.items.iter().copied()).to_display();

        Self {
            groups,
            page: page.number,
            page_size: page.page_size,
            total_pages: page.total_pages,
            total_items: page.total_items,
            active_filters: filter.active_count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Everything the investments dashboard shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub transaction_count: usize,
    /// Raw signed sum of every record
    pub balance: Decimal,
    pub summary: InvestmentSummary,
    pub investment_categories: Vec<CategoryBreakdown>,
    pub type_totals: Vec<TypeTotal>,
    pub expense_categories: Vec<CategoryBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_month: Option<MonthKey>,
    pub trend: Vec<TrendPoint>,
    pub list: TransactionListView,
    /// Balance and summary warnings, in that order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DataQualityWarning>,
}

impl DashboardReport {
    pub fn build(transactions: &[Transaction], options: &DashboardOptions) -> Self {
        let expenses = match options.expense_month {
            Some(month) => expense_categories(TransactionFilter::new().in_month(month).apply(transactions)),
            None => expense_categories(transactions),
        };

        log::debug!(
            target: "investboard::reports",
            "Building dashboard over {} transaction(s)",
            transactions.len()
        );

        let (balance, balance_warning) = checked_balance(transactions);
        let summary = InvestmentSummary::compute(transactions);
        let warnings = balance_warning.into_iter().chain(summary.warnings.iter().copied()).collect();

        Self {
            transaction_count: transactions.len(),
            balance,
            summary,
            investment_categories: investment_categories(transactions).top_breakdown(options.top_items),
            type_totals: totals_by_type(transactions),
            expense_categories: expenses.top_breakdown(options.top_items),
            expense_month: options.expense_month,
            trend: TrendSeries::build(transactions).oldest_first().collect(),
            list: TransactionListView::build(
                transactions,
                &options.list_filter,
                options.paginator,
                options.list_page,
            ),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, TransactionType};

    fn tx(id: i64, kind: TransactionType, value: i64, date: &str, category: &str) -> Transaction {
        Transaction::new(id, kind, Decimal::from(value), date).with_category(category)
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(1, TransactionType::Inflow, 100, "01/03/2024", "Tesouro Direto"),
            tx(2, TransactionType::Outflow, -50, "15/03/2024", "Alimentação"),
            tx(3, TransactionType::Outflow, -30, "2024-02-10", "Transporte"),
            tx(4, TransactionType::Inflow, 200, "2024-02-01", "ETFs"),
            tx(5, TransactionType::Inflow, 10, "???", "Salário"),
        ]
    }

    #[test]
    fn test_dashboard_report() {
        let txs = sample();
        let report = DashboardReport::build(&txs, &DashboardOptions::default());

        assert_eq!(report.transaction_count, 5);
        assert_eq!(report.balance, Decimal::from(230));
        assert_eq!(report.summary.total_invested, Decimal::from(310));
        assert_eq!(report.summary.fixed_income, Decimal::from(100));
        assert_eq!(report.summary.variable_income, Decimal::from(200));
        assert_eq!(report.summary.top_category, Some(Category::Etfs));
        assert_eq!(report.investment_categories[0].category, Category::Etfs);
        assert_eq!(report.expense_categories.len(), 2);

        let labels: Vec<String> = report.trend.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["02/2024", "03/2024"]);

        let months: Vec<u32> = report.list.groups.iter().map(|g| g.month.number()).collect();
        assert_eq!(months, vec![3, 2]);
        assert_eq!(report.list.total_items, 4);
    }

    #[test]
    fn test_expense_pie_for_month() {
        let txs = sample();
        let options = DashboardOptions {
            expense_month: MonthKey::new(3),
            ..DashboardOptions::default()
        };
        let report = DashboardReport::build(&txs, &options);

        assert_eq!(report.expense_categories.len(), 1);
        assert_eq!(report.expense_categories[0].category, Category::Alimentacao);
        assert_eq!(report.expense_categories[0].amount, Decimal::from(50));
    }

    #[test]
    fn test_list_view_pagination_and_filter() {
        let txs: Vec<Transaction> = (1..=23)
            .map(|i| tx(i, TransactionType::Inflow, i, &format!("2024-01-{:02}", i), "LCI"))
            .collect();
        let view = TransactionListView::build(&txs, &TransactionFilter::new(), Paginator::new(10), 3);
        assert_eq!(view.page, 3);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.groups[0].transactions.len(), 3);

        let filter = TransactionFilter::new().min_value(Decimal::from(20));
        let view = TransactionListView::build(&txs, &filter, Paginator::new(10), 3);
        assert_eq!(view.page, 1);
        assert_eq!(view.total_items, 4);
        assert_eq!(view.active_filters, 1);
    }

    #[test]
    fn test_empty_dashboard() {
        let report = DashboardReport::build(&[], &DashboardOptions::default());
        assert_eq!(report.balance, Decimal::ZERO);
        assert!(report.trend.is_empty());
        assert!(report.list.is_empty());
        assert_eq!(report.list.total_pages, 1);
        assert_eq!(report.summary.top_category, None);
    }

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.pagination.page_size = 5;
        config.charts.top_items_count = 1;
        let options = DashboardOptions::from_config(&config);
        assert_eq!(options.paginator.page_size(), 5);

        let report = DashboardReport::build(&sample(), &options);
        assert_eq!(report.investment_categories.len(), 1);
        assert_eq!(report.investment_categories[0].category, Category::Etfs);
        assert_eq!(report.investment_categories[0].percentage, Decimal::new(6667, 2));
    }

    #[test]
    fn test_near_max_values_build_a_report() {
        let huge = Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0);
        let txs = vec![
            Transaction::new(1, TransactionType::Inflow, huge, "2024-01-01").with_category("ETFs"),
            Transaction::new(2, TransactionType::Inflow, huge, "2024-01-02").with_category("LCI"),
        ];
        let report = DashboardReport::build(&txs, &DashboardOptions::default());

        assert_eq!(report.balance, Decimal::MAX);
        assert_eq!(report.summary.total_invested, Decimal::MAX);
        assert_eq!(report.trend[0].inflow_total, Decimal::MAX);
        assert_eq!(report.warnings[0], DataQualityWarning::Overflow { field: "balance" });
        assert!(report.warnings.contains(&DataQualityWarning::Overflow { field: "total_invested" }));
        assert!(DashboardReport::build(&sample(), &DashboardOptions::default()).warnings.is_empty());
    }

    #[test]
    fn test_report_serializes() {
        let report = DashboardReport::build(&sample(), &DashboardOptions::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["top_category"], "ETFs");
        assert_eq!(json["list"]["groups"][0]["name"], "Março");
        assert_eq!(json["type_totals"][0]["type"], "Entrada");
    }
}
