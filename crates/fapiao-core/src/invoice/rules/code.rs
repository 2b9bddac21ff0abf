//! Invoice code extraction.

use super::patterns::{CODE_AFTER_SEPARATOR, CODE_DIGITS};
use super::{FieldExtractor, keyword_context};
use crate::invoice::context::find_context;
use crate::models::config::ExtractionConfig;

/// Invoice code extractor.
///
/// Looks near the code label first and widens the context with the
/// invoice-number labels only when no 10-12 digit run is found there.
pub struct CodeExtractor {
    keywords: Vec<String>,
    fallback_keywords: Vec<String>,
    window: usize,
}

impl CodeExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            keywords: config.code_keywords.clone(),
            fallback_keywords: config.code_fallback_keywords.clone(),
            window: config.window_size,
        }
    }
}

impl Default for CodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CodeExtractor {
    type Output = String;

    fn context(&self, text: &str) -> Option<String> {
        let mut context = keyword_context(text, &self.keywords, self.window);

        if !CODE_DIGITS.is_match(&context) {
            for keyword in &self.fallback_keywords {
                context.push('\n');
                context.push_str(&find_context(text, keyword, self.window));
            }
        }

        Some(context)
    }

    fn extract_from_context(&self, context: &str, _text: &str) -> Option<String> {
        [&*CODE_DIGITS, &*CODE_AFTER_SEPARATOR]
            .iter()
            .find_map(|pattern| pattern.captures(context))
            .map(|caps| caps[1].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_after_label() {
        let extractor = CodeExtractor::new();
        assert_eq!(
            extractor.extract("发票代码：1234567890").as_deref(),
            Some("1234567890")
        );
    }

    #[test]
    fn test_code_prefers_label_context() {
        let extractor = CodeExtractor::new();
        let filler = "说明".repeat(40);
        let text = format!("流水号 99999999999 {} 发票代码 210012345678 校验码", filler);
        assert_eq!(extractor.extract(&text).as_deref(), Some("210012345678"));
    }

    #[test]
    fn test_code_falls_back_to_number_labels() {
        let extractor = CodeExtractor::new();
        let text = format!("发票代码 暂无 {} 单据编号：0012345678", "说明".repeat(40));

        let primary = find_context(&text, "发票代码", 50);
        assert!(!CODE_DIGITS.is_match(&primary));

        let context = extractor.context(&text).unwrap();
        assert!(context.contains("单据编号：0012345678"));
        assert_eq!(
            extractor.extract_from_context(&context, &text).as_deref(),
            Some("0012345678")
        );
    }

    #[test]
    fn test_no_code() {
        let extractor = CodeExtractor::new();
        assert_eq!(extractor.extract("发票代码：12345"), None);
        assert_eq!(extractor.extract(""), None);
    }
}
