//! Pipeline events and the observers that receive them.
//!
//! Components never log through a global logger; they report what happened
//! to the observer they were handed. [`TracingObserver`] turns events into
//! `tracing` records, [`NullObserver`] drops them.

use std::path::Path;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::models::invoice::{Field, InvoiceRecord};

/// Text extraction method that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMethod {
    /// Layout-preserving extraction.
    Layout,
    /// Per-page text accumulation.
    Plain,
}

/// Something that happened while processing a batch.
#[derive(Debug)]
pub enum PipelineEvent<'a> {
    /// Input directory listed.
    Scanned { dir: &'a Path, files: usize },
    /// Processing of one file begins.
    FileStarted { path: &'a Path },
    /// One extraction method failed for a file.
    TextExtractionFailed {
        path: &'a Path,
        method: TextMethod,
        error: &'a str,
    },
    /// A field could not be scraped.
    FieldMissing {
        path: &'a Path,
        field: Field,
        context: Option<&'a str>,
    },
    /// A record was built for a file.
    RecordExtracted { record: &'a InvoiceRecord },
    /// A file was dropped from the batch.
    FileSkipped { path: &'a Path, reason: &'a str },
    /// Duplicate invoice codes removed.
    Deduplicated { kept: usize, total: usize },
    /// Merging of one date group begins.
    GroupStarted {
        date: Option<NaiveDate>,
        files: usize,
    },
    /// A source PDF's pages were appended to the merge.
    FileAppended { path: &'a Path, pages: usize },
    /// A source PDF could not be appended and was left out.
    PageAppendFailed { path: &'a Path, error: &'a str },
    /// A merged document was written.
    GroupWritten { output: &'a Path, pages: usize },
    /// A merged document could not be written.
    WriteFailed { output: &'a Path, error: &'a str },
}

/// Receiver of pipeline events.
pub trait PipelineObserver {
    fn on_event(&self, event: &PipelineEvent<'_>);
}

/// Observer that logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent<'_>) {
        match event {
            PipelineEvent::Scanned { dir, files } => {
                info!("Found {} PDF files in {}", files, dir.display());
            }
            PipelineEvent::FileStarted { path } => {
                info!("Processing file: {}", file_name(path));
            }
            PipelineEvent::TextExtractionFailed { path, method, error } => {
                error!("{:?} text extraction failed for {}: {}", method, path.display(), error);
            }
            PipelineEvent::FieldMissing { path, field, context } => match context {
                Some(ctx) => warn!("Cannot extract {} from {}, context: {}...", field, path.display(), ctx),
                None => warn!("Cannot extract {} from {}", field, path.display()),
            },
            PipelineEvent::RecordExtracted { record } => {
                info!(
                    "Extracted - code: {}, date: {}",
                    record.invoice_code.as_deref().unwrap_or("-"),
                    record.date_key().as_deref().unwrap_or("-")
                );
            }
            PipelineEvent::FileSkipped { path, reason } => {
                warn!("Skipping {}: {}", file_name(path), reason);
            }
            PipelineEvent::Deduplicated { kept, total } => {
                info!("Kept {} invoice files after deduplication ({} scanned)", kept, total);
            }
            PipelineEvent::GroupStarted { date, files } => {
                let label = date.map(|d| d.to_string()).unwrap_or_else(|| "unknown date".to_string());
                info!("Merging {} invoice files for {}", files, label);
            }
            PipelineEvent::FileAppended { path, pages } => {
                info!("Added {} ({} pages)", file_name(path), pages);
            }
            PipelineEvent::PageAppendFailed { path, error } => {
                error!("Failed to add {}: {}", file_name(path), error);
            }
            PipelineEvent::GroupWritten { output, pages } => {
                info!("Saved merged file {} ({} pages)", output.display(), pages);
            }
            PipelineEvent::WriteFailed { output, error } => {
                error!("Failed to save merged file {}: {}", output.display(), error);
            }
        }
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {
    fn on_event(&self, _event: &PipelineEvent<'_>) {}
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
