//! Rule-based field extractors for receipt-style invoices.
//!
//! Every rule first narrows the text to keyword-anchored windows and only
//! then applies its ordered patterns, so numbers, dates and names that are
//! not next to the right label are never picked up.

pub mod amounts;
pub mod code;
pub mod dates;
pub mod patterns;
pub mod payer;

pub use amounts::AmountExtractor;
pub use code::CodeExtractor;
pub use dates::DateExtractor;
pub use payer::PayerExtractor;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Excerpt of `text` the field is scraped from.
    ///
    /// `None` means the field cannot be present in this text at all.
    fn context(&self, text: &str) -> Option<String>;

    /// Apply the field's patterns to a context built by [`Self::context`].
    ///
    /// `text` is the full text, for rules that fall back to scanning it.
    fn extract_from_context(&self, context: &str, text: &str) -> Option<Self::Output>;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        let context = self.context(text)?;
        self.extract_from_context(&context, text)
    }
}

/// Join the windows around each keyword with `'\n'`.
pub(crate) fn keyword_context(text: &str, keywords: &[String], window: usize) -> String {
    keywords
        .iter()
        .map(|keyword| super::context::find_context(text, keyword, window))
        .collect::<Vec<_>>()
        .join("\n")
}
