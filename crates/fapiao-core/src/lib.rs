//! Core library for Chinese medical receipt (fapiao) processing.
//!
//! This crate provides:
//! - PDF text extraction with a layout-aware primary path and a plain fallback
//! - Receipt field extraction (invoice code, issue date, payer, amount)
//! - Deduplication by invoice code and grouping by issue date
//! - Page-level merging of each date group into one PDF

pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;
pub mod pipeline;

pub use error::{ExtractionError, FapiaoError, PdfError, Result};
pub use invoice::{InvoiceLayout, InvoiceProcessor, ReceiptLayout, ScrapedFields, find_context};
pub use models::config::FapiaoConfig;
pub use models::invoice::{Field, InvoiceRecord};
pub use pdf::{PdfExtractor, PdfMerger, PdfTextSource, TextSource};
pub use pipeline::{
    BatchPipeline, BatchReport, GroupReport, NullObserver, PipelineEvent, PipelineObserver,
    TracingObserver,
};
