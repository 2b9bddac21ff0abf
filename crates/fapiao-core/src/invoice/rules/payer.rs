//! Payer name extraction.

use regex::Regex;

use super::patterns::{CJK_NAME, LABEL_PADDING, labeled_value};
use super::FieldExtractor;
use crate::invoice::context::{contains_keyword, find_context};
use crate::models::config::ExtractionConfig;

/// Payer extractor.
///
/// Only looks near the payer keywords; without a keyword in the text there
/// is no payer.
pub struct PayerExtractor {
    keywords: Vec<String>,
    window: usize,
    labeled: Vec<Regex>,
}

impl PayerExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            keywords: config.payer_keywords.clone(),
            window: config.payer_window,
            labeled: config.payer_keywords.iter().map(|k| labeled_value(k)).collect(),
        }
    }

    fn candidates<'t>(&'t self, context: &'t str) -> impl Iterator<Item = &'t str> + 't {
        self.labeled
            .iter()
            .chain(std::iter::once(&*CJK_NAME))
            .flat_map(move |pattern| {
                pattern
                    .captures_iter(context)
                    .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            })
    }
}

impl Default for PayerExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PayerExtractor {
    type Output = String;

    fn context(&self, text: &str) -> Option<String> {
        let present: Vec<&String> = self
            .keywords
            .iter()
            .filter(|keyword| contains_keyword(text, keyword))
            .collect();
        if present.is_empty() {
            return None;
        }

        let mut context = String::new();
        for keyword in present {
            context.push_str(&find_context(text, keyword, self.window));
            context.push_str("\n\n");
        }
        Some(context)
    }

    fn extract_from_context(&self, context: &str, _text: &str) -> Option<String> {
        self.candidates(context)
            .filter(|candidate| candidate.trim().chars().count() >= 2)
            .map(|candidate| LABEL_PADDING.replace_all(candidate, "").into_owned())
            .find(|cleaned| !cleaned.is_empty())
    }
}
