//! Transaction records and the ingestion boundary
//!
//! [`RawTransaction`] is the wire shape kept by the transaction store.
//! [`Transaction`] is the normalized record every analytics function reads:
//! the date is parsed once and the category is resolved against the closed
//! vocabulary.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};
use crate::time::{parse_date, MonthKey, Period};
use crate::types::{Category, TransactionType};

/// Transaction as stored by the external store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Numeric id; the store sometimes returns it as a string
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: i64,
    /// "Entrada" or "Saída"
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    /// ISO or DD/MM/YYYY
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Attachment reference, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i64),
        Text(String),
    }

    match Id::deserialize(deserializer)? {
        Id::Number(n) => Ok(n),
        Id::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Category as resolved against the vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CategoryLabel {
    Known(Category),
    /// Label outside every vocabulary, kept for display
    Unrecognized(String),
}

impl CategoryLabel {
    /// Resolve a label; blank labels mean "no category"
    pub fn parse(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match trimmed.parse::<Category>() {
            Ok(category) => CategoryLabel::Known(category),
            Err(_) => CategoryLabel::Unrecognized(trimmed.to_string()),
        })
    }

    pub fn known(&self) -> Option<Category> {
        match self {
            CategoryLabel::Known(category) => Some(*category),
            CategoryLabel::Unrecognized(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryLabel::Known(category) => category.label(),
            CategoryLabel::Unrecognized(label) => label,
        }
    }
}

/// Normalized transaction record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Signed amount as supplied
    pub value: Decimal,
    /// Calendar date, `None` when the raw text did not parse
    pub date: Option<NaiveDate>,
    /// Date text as supplied
    pub raw_date: String,
    pub category: Option<CategoryLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Transaction {
    /// Build a record, normalizing the date text
    pub fn new(id: i64, kind: TransactionType, value: Decimal, date: &str) -> Self {
        Self {
            id,
            kind,
            value,
            date: parse_date(date).ok(),
            raw_date: date.to_string(),
            category: None,
            file: None,
        }
    }

    pub fn with_category(mut self, label: &str) -> Self {
        self.category = CategoryLabel::parse(label);
        self
    }

    pub fn with_file(mut self, file: &str) -> Self {
        self.file = Some(file.to_string());
        self
    }

    /// Normalize a stored record. Fails only when the type is unknown.
    pub fn from_raw(raw: &RawTransaction) -> CoreResult<Self> {
        let kind = raw
            .kind
            .parse::<TransactionType>()
            .map_err(|_| CoreError::InvalidType { input: raw.kind.clone() })?;

        let date = match parse_date(&raw.date) {
            Ok(date) => Some(date),
            Err(e) => {
                log::debug!(target: "investboard::ingest", "Transaction {}: {}", raw.id, e);
                None
            }
        };

        Ok(Self {
            id: raw.id,
            kind,
            value: raw.value,
            date,
            raw_date: raw.date.clone(),
            category: raw.category.as_deref().and_then(CategoryLabel::parse),
            file: raw.file.clone(),
        })
    }

    /// Convert back to the stored shape
    pub fn to_raw(&self) -> RawTransaction {
        RawTransaction {
            id: self.id,
            kind: self.kind.label().to_string(),
            value: self.value,
            date: self.raw_date.clone(),
            category: self.category.as_ref().map(|c| c.label().to_string()),
            file: self.file.clone(),
        }
    }

    pub fn abs_value(&self) -> Decimal {
        self.value.abs()
    }

    pub fn known_category(&self) -> Option<Category> {
        self.category.as_ref().and_then(CategoryLabel::known)
    }

    pub fn month(&self) -> Option<MonthKey> {
        self.date.map(MonthKey::from_date)
    }

    pub fn period(&self) -> Option<Period> {
        self.date.map(Period::from_date)
    }

    pub fn is_inflow(&self) -> bool {
        self.kind == TransactionType::Inflow
    }

    pub fn is_outflow(&self) -> bool {
        self.kind == TransactionType::Outflow
    }
}

/// Counters describing what ingestion skipped or degraded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Records kept
    pub accepted: usize,
    /// Dropped: type was neither inflow nor outflow
    pub invalid_type: Vec<i64>,
    /// Dropped: id already seen earlier in the batch
    pub duplicate_ids: Vec<i64>,
    /// Kept, but excluded from date-dependent views
    pub undated: Vec<i64>,
    /// Kept, but excluded from category aggregates
    pub unrecognized_category: Vec<i64>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.invalid_type.is_empty()
            && self.duplicate_ids.is_empty()
            && self.undated.is_empty()
            && self.unrecognized_category.is_empty()
    }
}

/// Normalize a snapshot from the store, skipping records that cannot be kept
pub fn ingest(raws: &[RawTransaction]) -> (Vec<Transaction>, IngestReport) {
    let mut report = IngestReport::default();
    let mut seen = HashSet::new();
    let mut transactions = Vec::with_capacity(raws.len());

    for raw in raws {
        let tx = match Transaction::from_raw(raw) {
            Ok(tx) => tx,
            Err(e) => {
                log::warn!(target: "investboard::ingest", "Skipping transaction {}: {}", raw.id, e);
                report.invalid_type.push(raw.id);
                continue;
            }
        };

        if !seen.insert(tx.id) {
            log::warn!(target: "investboard::ingest", "Skipping duplicate transaction id {}", tx.id);
            report.duplicate_ids.push(tx.id);
            continue;
        }

        if tx.date.is_none() {
            report.undated.push(tx.id);
        }
        if matches!(tx.category, Some(CategoryLabel::Unrecognized(_))) {
            report.unrecognized_category.push(tx.id);
        }

        transactions.push(tx);
    }

    report.accepted = transactions.len();
    if !report.undated.is_empty() {
        log::warn!(
            target: "investboard::ingest",
            "{} transaction(s) have unparseable dates and are left out of date views",
            report.undated.len()
        );
    }

    (transactions, report)
}
