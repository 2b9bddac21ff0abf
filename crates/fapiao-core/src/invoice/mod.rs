//! Invoice field extraction module.

pub mod context;
pub mod layout;
mod processor;
pub mod rules;

pub use context::find_context;
pub use layout::{FieldMiss, InvoiceLayout, ReceiptLayout, ScrapedFields};
pub use processor::InvoiceProcessor;

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
