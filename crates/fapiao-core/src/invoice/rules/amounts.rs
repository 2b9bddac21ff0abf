//! Amount-in-figures extraction.

use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;

use super::FieldExtractor;
use super::patterns::labeled_amount;
use crate::invoice::context::find_context;
use crate::models::config::ExtractionConfig;

/// Amount extractor.
///
/// The amount must directly follow the "in figures" label; the printed
/// scale is preserved (`128.50` stays `128.50`).
pub struct AmountExtractor {
    label: String,
    window: usize,
    pattern: Regex,
}

impl AmountExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            label: config.amount_label.clone(),
            window: config.amount_window,
            pattern: labeled_amount(&config.amount_label),
        }
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = Decimal;

    fn context(&self, text: &str) -> Option<String> {
        Some(find_context(text, &self.label, self.window))
    }

    fn extract_from_context(&self, context: &str, _text: &str) -> Option<Decimal> {
        let caps = self.pattern.captures(context)?;
        Decimal::from_str(&caps[1]).ok()
    }
}
