//! Invoice record produced by scraping a single PDF.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fields scraped from one invoice file.
///
/// Created once per processed file and never mutated afterwards. Every
/// scraped field is optional: a record whose fields are all `None` is still a
/// valid record, the caller decides whether it is usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Full path of the source PDF.
    pub path: PathBuf,

    /// File name of the source PDF.
    pub filename: String,

    /// 10-12 digit invoice code, the natural deduplication key.
    pub invoice_code: Option<String>,

    /// Issue date.
    pub date: Option<NaiveDate>,

    /// Person or entity who paid.
    pub payer: Option<String>,

    /// Amount in figures, scale as printed.
    pub amount: Option<Decimal>,

    /// Last modification time of the source file.
    pub modified: DateTime<Utc>,
}

impl InvoiceRecord {
    /// ISO-8601 date string (`YYYY-MM-DD`), the merge grouping key.
    pub fn date_key(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// First four characters of the date key.
    pub fn year(&self) -> Option<String> {
        self.date_key().map(|d| d.chars().take(4).collect())
    }

    /// Names of the fields that could not be scraped.
    pub fn missing_fields(&self) -> Vec<Field> {
        let mut missing = Vec::new();
        if self.invoice_code.is_none() {
            missing.push(Field::InvoiceCode);
        }
        if self.date.is_none() {
            missing.push(Field::Date);
        }
        if self.payer.is_none() {
            missing.push(Field::Payer);
        }
        if self.amount.is_none() {
            missing.push(Field::Amount);
        }
        missing
    }
}

/// Scraped invoice field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    InvoiceCode,
    Date,
    Payer,
    Amount,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::InvoiceCode => write!(f, "invoice code"),
            Field::Date => write!(f, "date"),
            Field::Payer => write!(f, "payer"),
            Field::Amount => write!(f, "amount"),
        }
    }
}
