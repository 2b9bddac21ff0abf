//! Issue date extraction.

use chrono::NaiveDate;
use regex::{Captures, Regex};

use super::patterns::{DATE_COMPACT, DATE_DOTTED, DATE_MDY, DATE_YMD};
use super::{FieldExtractor, keyword_context};
use crate::models::config::ExtractionConfig;

/// Shape of a printed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateShape {
    /// 2023年12月31日, 2023-12-31, 2023/12/31
    YearFirst,
    /// 12月31日2023, 12/31/2023
    MonthFirst,
    /// 20231231
    Compact,
    /// 2023.12.31
    Dotted,
}

impl DateShape {
    /// Shapes tried, in order, against the keyword context.
    pub const CONTEXT_ORDER: [DateShape; 3] =
        [DateShape::YearFirst, DateShape::MonthFirst, DateShape::Compact];

    /// Shapes accepted when scanning the whole text.
    pub const LENIENT_ORDER: [DateShape; 4] = [
        DateShape::YearFirst,
        DateShape::Dotted,
        DateShape::MonthFirst,
        DateShape::Compact,
    ];

    fn regex(&self) -> &'static Regex {
        match self {
            DateShape::YearFirst => &DATE_YMD,
            DateShape::MonthFirst => &DATE_MDY,
            DateShape::Compact => &DATE_COMPACT,
            DateShape::Dotted => &DATE_DOTTED,
        }
    }

    fn to_date(self, caps: &Captures<'_>) -> Option<NaiveDate> {
        let num = |i: usize| caps.get(i)?.as_str().parse::<u32>().ok();

        match self {
            DateShape::YearFirst | DateShape::Compact | DateShape::Dotted => {
                NaiveDate::from_ymd_opt(num(1)? as i32, num(2)?, num(3)?)
            }
            DateShape::MonthFirst => {
                let (first, second, year) = (num(1)?, num(2)?, num(3)? as i32);
                // 31/12/2023 is unambiguous even though months come first
                NaiveDate::from_ymd_opt(year, first, second)
                    .or_else(|| NaiveDate::from_ymd_opt(year, second, first))
            }
        }
    }

    /// Date from the first match of this shape in `text`, if it is valid.
    pub fn first_match(&self, text: &str) -> Option<NaiveDate> {
        self.regex().captures(text).and_then(|caps| self.to_date(&caps))
    }

    /// Date from the first valid match of this shape in `text`.
    pub fn first_valid(&self, text: &str) -> Option<NaiveDate> {
        self.regex()
            .captures_iter(text)
            .find_map(|caps| self.to_date(&caps))
    }
}

/// Issue date extractor.
pub struct DateExtractor {
    keywords: Vec<String>,
    window: usize,
}

impl DateExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            keywords: config.date_keywords.clone(),
            window: config.window_size,
        }
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = NaiveDate;

    fn context(&self, text: &str) -> Option<String> {
        Some(keyword_context(text, &self.keywords, self.window))
    }

    fn extract_from_context(&self, context: &str, text: &str) -> Option<NaiveDate> {
        DateShape::CONTEXT_ORDER
            .iter()
            .find_map(|shape| shape.first_match(context))
            .or_else(|| lenient_date(text))
    }
}

/// First valid date of any known shape anywhere in `text`.
pub fn lenient_date(text: &str) -> Option<NaiveDate> {
    DateShape::LENIENT_ORDER
        .iter()
        .find_map(|shape| shape.first_valid(text))
}
