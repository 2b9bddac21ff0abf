//! Common regex patterns for receipt field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice code: a bare 10-12 digit run, or one following a colon or space
    pub static ref CODE_DIGITS: Regex = Regex::new(r"(\d{10,12})").unwrap();

    pub static ref CODE_AFTER_SEPARATOR: Regex = Regex::new(r"[:：\s]*(\d{10,12})").unwrap();

    // Dates: 2023年12月31日, 2023-12-31, 2023/12/31
    pub static ref DATE_YMD: Regex = Regex::new(
        r"(\d{4})[年/\-](\d{1,2})[月/\-](\d{1,2})日?"
    ).unwrap();

    // 12月31日2023, 12/31/2023, 12-31-2023
    pub static ref DATE_MDY: Regex = Regex::new(
        r"(\d{1,2})[月/\-](\d{1,2})[日/\-](\d{4})"
    ).unwrap();

    // 20231231
    pub static ref DATE_COMPACT: Regex = Regex::new(r"(\d{4})(\d{2})(\d{2})").unwrap();

    // 2023.12.31, only used when scanning the whole text
    pub static ref DATE_DOTTED: Regex = Regex::new(
        r"(\d{4})\.(\d{1,2})\.(\d{1,2})"
    ).unwrap();

    // Personal names are usually 2-4 CJK characters
    pub static ref CJK_NAME: Regex = Regex::new(r"([\x{4e00}-\x{9fa5}]{2,4})").unwrap();

    // Colons and whitespace around a captured label value
    pub static ref LABEL_PADDING: Regex = Regex::new(r"^[:：\s]+|[:：\s]+$").unwrap();
}

/// Value following `label` and a full-width colon, up to whitespace or punctuation.
pub fn labeled_value(label: &str) -> Regex {
    Regex::new(&format!(
        r"{}：\s*([^\n:：,，；;\s]+)",
        regex::escape(label)
    ))
    .expect("escaped label pattern is valid")
}

/// Decimal number with up to two fraction digits following `label`.
pub fn labeled_amount(label: &str) -> Regex {
    Regex::new(&format!(r"{}\s*(\d+(?:\.\d{{1,2}})?)", regex::escape(label)))
        .expect("escaped label pattern is valid")
}
