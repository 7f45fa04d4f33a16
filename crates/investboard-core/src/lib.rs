//! Transaction analytics engine
//!
//! Pure functions over an in-memory collection of [`Transaction`]s. Nothing
//! here performs I/O; records come from `investboard-store` and the results
//! are rendered by the binary.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod models;
pub mod pagination;
pub mod reports;
pub mod time;
pub mod trend;
pub mod types;

pub use aggregate::{
    balance, checked_balance, expense_categories, investment_categories, totals_by_category, totals_by_type,
    CategoryBreakdown, CategoryScope, CategoryTotal, CategoryTotals, DataQualityWarning,
    InvestmentSummary, TypeTotal,
};
pub use error::{CoreError, CoreResult, ErrorCode};
pub use filter::{parse_amount, FilterForm, TransactionFilter};
pub use grouping::{group_by_month, MonthGroup, MonthGroups};
pub use models::{ingest, CategoryLabel, IngestReport, RawTransaction, Transaction};
pub use pagination::{paginate, Page, Paginator, DEFAULT_PAGE_SIZE};
pub use reports::{DashboardOptions, DashboardReport, TransactionListView};
pub use time::{parse_date, MonthKey, Period};
pub use trend::{TrendPoint, TrendSeries};
pub use types::{Category, CategoryGroup, TransactionType};
