//! Transaction store adapter
//!
//! The dashboard reads an ordered snapshot of [`RawTransaction`]s from a
//! [`TransactionSource`] and writes create/update/delete results back. The
//! in-memory [`TransactionStore`] mirrors the collection semantics of the
//! hosted store: new records are appended, updates replace in place and
//! deletes keep the remaining order.

use async_trait::async_trait;
use chrono::NaiveDate;
use investboard_core::{ingest, Category, IngestReport, RawTransaction, Transaction, TransactionType};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod error;

pub use error::{StoreError, StoreErrorCode, StoreResult};

/// Dates written by the store use the hosted store's timestamp layout
pub fn format_stored_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%dT00:00:00.000Z").to_string()
}

// ==================== Source Trait ====================

/// Source reference type
pub type SourceRef = Arc<dyn TransactionSource>;

/// Backing storage for the transaction collection
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Read the full collection in stored order
    async fn load(&self) -> StoreResult<Vec<RawTransaction>>;

    /// Replace the full collection
    async fn save(&self, records: &[RawTransaction]) -> StoreResult<()>;
}

/// JSON array on the local filesystem
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TransactionSource for JsonFileSource {
    async fn load(&self) -> StoreResult<Vec<RawTransaction>> {
        if !tokio::fs::try_exists(&self.path).await? {
            log::info!(
                target: "investboard::store",
                "No transaction file at {}, starting empty",
                self.path.display()
            );
            return Ok(Vec::new());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<RawTransaction> =
            serde_json::from_str(&content).map_err(|source| StoreError::MalformedFile {
                path: self.path.clone(),
                source,
            })?;

        log::debug!(
            target: "investboard::store",
            "Loaded {} transaction(s) from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    async fn save(&self, records: &[RawTransaction]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(records).map_err(|source| StoreError::MalformedFile {
            path: self.path.clone(),
            source,
        })?;

        // write then rename so a failed save leaves the old file intact
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        log::debug!(
            target: "investboard::store",
            "Saved {} transaction(s) to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

// ==================== In-memory Store ====================

/// Fields for a new record; the id is assigned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionType,
    pub value: Decimal,
    pub date: NaiveDate,
    pub category: Option<Category>,
    pub file: Option<String>,
}

/// Partial update. `category: Some(None)` clears the category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub kind: Option<TransactionType>,
    pub value: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub category: Option<Option<Category>>,
    pub file: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply_to(&self, raw: &mut RawTransaction) {
        if let Some(kind) = self.kind {
            raw.kind = kind.label().to_string();
        }
        if let Some(value) = self.value {
            raw.value = value;
        }
        if let Some(date) = self.date {
            raw.date = format_stored_date(date);
        }
        if let Some(category) = self.category {
            raw.category = Some(category.map(|c| c.label().to_string()).unwrap_or_default());
        }
        if let Some(file) = &self.file {
            raw.file = Some(file.clone());
        }
    }
}

/// Ordered in-memory collection
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    records: Vec<RawTransaction>,
}

impl TransactionStore {
    pub fn new(records: Vec<RawTransaction>) -> Self {
        Self { records }
    }

    pub async fn load_from(source: &dyn TransactionSource) -> StoreResult<Self> {
        Ok(Self::new(source.load().await?))
    }

    pub async fn save_to(&self, source: &dyn TransactionSource) -> StoreResult<()> {
        source.save(&self.records).await
    }

    /// Current records in stored order
    pub fn snapshot(&self) -> &[RawTransaction] {
        &self.records
    }

    /// Normalized records for the analytics engine
    pub fn transactions(&self) -> (Vec<Transaction>, IngestReport) {
        ingest(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&RawTransaction> {
        self.records.iter().find(|r| r.id == id)
    }

    /// One more than the largest id in use
    pub fn next_id(&self) -> i64 {
        self.records.iter().map(|r| r.id).max().map_or(1, |max| max + 1)
    }

    /// Append a record with a caller-chosen id
    pub fn insert(&mut self, record: RawTransaction) -> StoreResult<()> {
        if self.get(record.id).is_some() {
            return Err(StoreError::DuplicateId { id: record.id });
        }
        Transaction::from_raw(&record)?;
        self.records.push(record);
        Ok(())
    }

    /// Append a new record and return it
    pub fn create(&mut self, new: NewTransaction) -> StoreResult<&RawTransaction> {
        let record = RawTransaction {
            id: self.next_id(),
            kind: new.kind.label().to_string(),
            value: new.value,
            date: format_stored_date(new.date),
            category: new.category.map(|c| c.label().to_string()),
            file: new.file,
        };
        log::info!(target: "investboard::store", "Adding transaction {}", record.id);
        self.insert(record)?;
        let last = self.records.len() - 1;
        Ok(&self.records[last])
    }

    pub fn update(&mut self, id: i64, patch: &TransactionPatch) -> StoreResult<&RawTransaction> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound { id })?;
        patch.apply_to(record);
        log::info!(target: "investboard::store", "Updated transaction {}", id);
        Ok(record)
    }

    pub fn remove(&mut self, id: i64) -> StoreResult<RawTransaction> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound { id })?;
        log::info!(target: "investboard::store", "Deleted transaction {}", id);
        Ok(self.records.remove(index))
    }
}
