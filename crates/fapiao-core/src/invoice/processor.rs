//! Single-file invoice processing: text extraction plus field scraping.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::Result;
use super::layout::{InvoiceLayout, ReceiptLayout};
use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::invoice::InvoiceRecord;
use crate::pdf::{PdfTextSource, TextSource};
use crate::pipeline::observer::{PipelineEvent, PipelineObserver};

/// Turns one invoice file into an [`InvoiceRecord`].
pub struct InvoiceProcessor {
    source: Box<dyn TextSource>,
    layout: Box<dyn InvoiceLayout>,
}

impl InvoiceProcessor {
    /// PDF text source with the receipt layout.
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            source: Box::new(PdfTextSource::new()),
            layout: Box::new(ReceiptLayout::from_config(config)),
        }
    }

    /// Replace the text source.
    pub fn with_text_source(mut self, source: impl TextSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Replace the layout.
    pub fn with_layout(mut self, layout: impl InvoiceLayout + 'static) -> Self {
        self.layout = Box::new(layout);
        self
    }

    /// Extract text and scrape every field of the file at `path`.
    ///
    /// Fails only when no text could be extracted or the file's metadata is
    /// unreadable. Missing fields are reported to `observer` and left `None`.
    pub fn process(&self, path: &Path, observer: &dyn PipelineObserver) -> Result<InvoiceRecord> {
        let text = self.source.extract_text(path, observer);
        if text.trim().is_empty() {
            return Err(ExtractionError::NoText {
                path: path.to_path_buf(),
            });
        }

        let modified = fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|source| ExtractionError::Metadata {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Scraping {} with the {} layout", path.display(), self.layout.name());
        let fields = self.layout.scrape(&text);
        for miss in &fields.misses {
            observer.on_event(&PipelineEvent::FieldMissing {
                path,
                field: miss.field,
                context: miss.context.as_deref(),
            });
        }

        let record = InvoiceRecord {
            path: path.to_path_buf(),
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            invoice_code: fields.invoice_code,
            date: fields.date,
            payer: fields.payer,
            amount: fields.amount,
            modified: DateTime::<Utc>::from(modified),
        };
        observer.on_event(&PipelineEvent::RecordExtracted { record: &record });
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::layout::ScrapedFields;
    use crate::models::invoice::Field;
    use crate::pipeline::observer::NullObserver;
    use std::cell::RefCell;

    struct FixedText(&'static str);

    impl TextSource for FixedText {
        fn extract_text(&self, _path: &Path, _observer: &dyn PipelineObserver) -> String {
            self.0.to_string()
        }
    }

    #[derive(Default)]
    struct MissLog(RefCell<Vec<Field>>);

    impl PipelineObserver for MissLog {
        fn on_event(&self, event: &PipelineEvent<'_>) {
            if let PipelineEvent::FieldMissing { field, .. } = event {
                self.0.borrow_mut().push(*field);
            }
        }
    }

    struct CodeOnlyLayout;

    impl InvoiceLayout for CodeOnlyLayout {
        fn name(&self) -> &str {
            "code-only"
        }

        fn scrape(&self, text: &str) -> ScrapedFields {
            ScrapedFields {
                invoice_code: Some(text.trim().to_string()),
                ..Default::default()
            }
        }
    }

    fn temp_file(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"%PDF-1.4").unwrap();
        path
    }

    #[test]
    fn test_process_builds_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "receipt.pdf");
        let processor = InvoiceProcessor::new(&ExtractionConfig::default())
            .with_text_source(FixedText("发票代码：1234567890 开票日期2023年05月01日 交款人：张三 (小写）128.50"));

        let record = processor.process(&path, &NullObserver).unwrap();
        assert_eq!(record.filename, "receipt.pdf");
        assert_eq!(record.invoice_code.as_deref(), Some("1234567890"));
        assert_eq!(record.date_key().as_deref(), Some("2023-05-01"));
        assert_eq!(record.payer.as_deref(), Some("张三"));
        assert_eq!(record.amount.map(|a| a.to_string()).as_deref(), Some("128.50"));
    }

    #[test]
    fn test_all_fields_missing_still_yields_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "blank.pdf");
        let processor = InvoiceProcessor::new(&ExtractionConfig::default())
            .with_text_source(FixedText("nothing useful here"));

        let log = MissLog::default();
        let record = processor.process(&path, &log).unwrap();

        assert_eq!(record.missing_fields().len(), 4);
        assert_eq!(
            *log.0.borrow(),
            vec![Field::InvoiceCode, Field::Date, Field::Payer, Field::Amount]
        );
    }

    #[test]
    fn test_empty_text_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "scan.pdf");
        let processor = InvoiceProcessor::new(&ExtractionConfig::default())
            .with_text_source(FixedText("  \n\n "));

        let err = processor.process(&path, &NullObserver).unwrap_err();
        assert!(matches!(err, ExtractionError::NoText { .. }));
    }

    #[test]
    fn test_missing_file_is_a_metadata_error() {
        let processor = InvoiceProcessor::new(&ExtractionConfig::default())
            .with_text_source(FixedText("发票代码：1234567890"));

        let err = processor.process(Path::new("/nonexistent/x.pdf"), &NullObserver).unwrap_err();
        assert!(matches!(err, ExtractionError::Metadata { .. }));
    }

    #[test]
    fn test_layout_is_swappable() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "custom.pdf");
        let processor = InvoiceProcessor::new(&ExtractionConfig::default())
            .with_text_source(FixedText("INV-42"))
            .with_layout(CodeOnlyLayout);

        let record = processor.process(&path, &NullObserver).unwrap();
        assert_eq!(record.invoice_code.as_deref(), Some("INV-42"));
        assert_eq!(record.date, None);
    }
}
