//! Invoice layouts: the set of field rules tuned to one document format.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::rules::{AmountExtractor, CodeExtractor, DateExtractor, FieldExtractor, PayerExtractor};
use crate::models::config::ExtractionConfig;
use crate::models::invoice::Field;

/// Fields scraped from one invoice text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedFields {
    pub invoice_code: Option<String>,
    pub date: Option<NaiveDate>,
    pub payer: Option<String>,
    pub amount: Option<Decimal>,
    /// One entry per field that could not be scraped.
    pub misses: Vec<FieldMiss>,
}

/// A field that could not be scraped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMiss {
    pub field: Field,
    /// Start of the context that was searched, when worth reporting.
    pub context: Option<String>,
}

/// Pattern set for one invoice layout.
///
/// The processor and pipeline only see this trait, so supporting a new
/// document format means adding a layout, not touching the orchestration.
pub trait InvoiceLayout {
    /// Short layout name for logs.
    fn name(&self) -> &str;

    /// Scrape every field from `text`; a missing field never aborts the rest.
    fn scrape(&self, text: &str) -> ScrapedFields;
}

/// Chinese receipt layout (medical and government fee receipts).
pub struct ReceiptLayout {
    code: CodeExtractor,
    date: DateExtractor,
    payer: PayerExtractor,
    amount: AmountExtractor,
    snippet_len: usize,
}

impl ReceiptLayout {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            code: CodeExtractor::from_config(config),
            date: DateExtractor::from_config(config),
            payer: PayerExtractor::from_config(config),
            amount: AmountExtractor::from_config(config),
            snippet_len: config.snippet_len,
        }
    }

    fn snippet(&self, context: &str) -> String {
        context.chars().take(self.snippet_len).collect()
    }
}

impl Default for ReceiptLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceLayout for ReceiptLayout {
    fn name(&self) -> &str {
        "receipt"
    }

    fn scrape(&self, text: &str) -> ScrapedFields {
        let mut misses = Vec::new();

        let invoice_code = self.code.extract(text);
        if invoice_code.is_none() {
            misses.push(FieldMiss { field: Field::InvoiceCode, context: None });
        }

        let date_context = self.date.context(text).unwrap_or_default();
        let date = self.date.extract_from_context(&date_context, text);
        if date.is_none() {
            misses.push(FieldMiss {
                field: Field::Date,
                context: Some(self.snippet(&date_context)),
            });
        }

        let payer_context = self.payer.context(text);
        let payer = payer_context
            .as_deref()
            .and_then(|ctx| self.payer.extract_from_context(ctx, text));
        if payer.is_none() {
            misses.push(FieldMiss {
                field: Field::Payer,
                context: payer_context.map(|ctx| self.snippet(&ctx)),
            });
        }

        let amount = self.amount.extract(text);
        if amount.is_none() {
            misses.push(FieldMiss { field: Field::Amount, context: None });
        }

        ScrapedFields {
            invoice_code,
            date,
            payer,
            amount,
            misses,
        }
    }
}
