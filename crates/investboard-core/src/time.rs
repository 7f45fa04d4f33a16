//! Calendar normalization for transaction dates
//!
//! Dates arrive either as ISO (`2024-03-15`, optionally with a time part) or
//! in the localized `15/03/2024` form. Both are normalized once, at ingestion,
//! into a [`NaiveDate`].

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

static ISO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ].*)?$").expect("valid ISO date pattern")
});

static LOCAL_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid localized date pattern")
});

/// Parse a date in either accepted textual form
pub fn parse_date(input: &str) -> CoreResult<NaiveDate> {
    let trimmed = input.trim();
    let invalid = || CoreError::InvalidDate { input: input.to_string() };

    let parts = if let Some(caps) = ISO_DATE.captures(trimmed) {
        (caps[1].parse::<i32>(), caps[2].parse::<u32>(), caps[3].parse::<u32>())
    } else if let Some(caps) = LOCAL_DATE.captures(trimmed) {
        (caps[3].parse::<i32>(), caps[2].parse::<u32>(), caps[1].parse::<u32>())
    } else {
        return Err(invalid());
    };

    match parts {
        (Ok(year), Ok(month), Ok(day)) => NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// Portuguese month names, January first
const MONTH_NAMES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho",
    "Julho", "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro",
];

/// Calendar month, 1 = January
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MonthKey(u32);

impl MonthKey {
    pub fn new(month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(MonthKey(month))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        MonthKey(date.month())
    }

    pub fn number(&self) -> u32 {
        self.0
    }

    /// Month name shown as the list group header
    pub fn name(&self) -> &'static str {
        MONTH_NAMES[(self.0 - 1) as usize]
    }
}

impl TryFrom<u32> for MonthKey {
    type Error = CoreError;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        MonthKey::new(value).ok_or(CoreError::InvalidMonth { input: value.to_string() })
    }
}

impl From<MonthKey> for u32 {
    fn from(key: MonthKey) -> Self {
        key.0
    }
}

impl std::str::FromStr for MonthKey {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidMonth { input: s.to_string() };
        let month: u32 = s.trim().parse().map_err(|_| invalid())?;
        MonthKey::new(month).ok_or_else(invalid)
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Month of a specific year, ordered year-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}
