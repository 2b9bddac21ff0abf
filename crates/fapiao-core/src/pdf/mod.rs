//! PDF processing module.

mod extractor;
mod merger;

pub use extractor::{PdfExtractor, PdfTextSource};
pub use merger::PdfMerger;

use std::path::Path;

use crate::error::PdfError;
use crate::pipeline::observer::PipelineObserver;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Source of raw invoice text.
pub trait TextSource {
    /// Best-effort text of the file at `path`.
    ///
    /// Never fails: every problem is reported to `observer` and an
    /// unreadable file yields an empty string.
    fn extract_text(&self, path: &Path, observer: &dyn PipelineObserver) -> String;
}
