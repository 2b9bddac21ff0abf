//! Batch pipeline: scan, extract, deduplicate, group, merge and write.
//!
//! Every stage runs to completion before the next starts. Failures of a
//! single file or a single group are reported to the observer and skipped;
//! only an unusable input or output directory stops a run.

pub mod dedup;
pub mod group;
pub mod observer;

pub use dedup::deduplicate;
pub use group::{DateGroup, group_by_date};
pub use observer::{NullObserver, PipelineEvent, PipelineObserver, TracingObserver};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::Result;
use crate::invoice::InvoiceProcessor;
use crate::models::config::{FapiaoConfig, MergeConfig};
use crate::models::invoice::InvoiceRecord;
use crate::pdf::PdfMerger;

/// Outcome of one merged date group.
#[derive(Debug, Clone)]
pub struct GroupReport {
    pub date: Option<NaiveDate>,
    /// Target file, whether or not it was written.
    pub output: PathBuf,
    /// Source files in the group.
    pub files: usize,
    /// Pages in the merged document.
    pub pages: usize,
    /// Sources whose pages could not be appended.
    pub failed: Vec<PathBuf>,
    pub written: bool,
}

/// Outcome of a whole batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// PDF files found in the input directory.
    pub scanned: usize,
    /// Every record extracted, before deduplication.
    pub records: Vec<InvoiceRecord>,
    /// Files dropped because no record could be built.
    pub skipped: Vec<PathBuf>,
    /// Records surviving deduplication.
    pub kept: Vec<InvoiceRecord>,
    pub groups: Vec<GroupReport>,
}

impl BatchReport {
    /// Whether `record` survived deduplication.
    pub fn is_kept(&self, record: &InvoiceRecord) -> bool {
        self.kept.iter().any(|kept| kept.path == record.path)
    }
}

/// The invoice scrape-and-merge pipeline.
pub struct BatchPipeline {
    processor: InvoiceProcessor,
    merge: MergeConfig,
}

impl BatchPipeline {
    /// Pipeline reading PDFs with the receipt layout.
    pub fn new(config: &FapiaoConfig) -> Self {
        Self {
            processor: InvoiceProcessor::new(&config.extraction),
            merge: config.merge.clone(),
        }
    }

    /// Replace the invoice processor.
    pub fn with_processor(mut self, processor: InvoiceProcessor) -> Self {
        self.processor = processor;
        self
    }

    /// Run every stage over `input_dir`, writing merged PDFs to `output_dir`.
    pub fn run(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        observer: &dyn PipelineObserver,
    ) -> Result<BatchReport> {
        let files = scan_pdfs(input_dir)?;
        observer.on_event(&PipelineEvent::Scanned {
            dir: input_dir,
            files: files.len(),
        });

        let mut report = BatchReport {
            scanned: files.len(),
            ..Default::default()
        };

        for path in &files {
            observer.on_event(&PipelineEvent::FileStarted { path });
            match self.processor.process(path, observer) {
                Ok(record) => report.records.push(record),
                Err(e) => {
                    observer.on_event(&PipelineEvent::FileSkipped {
                        path,
                        reason: &e.to_string(),
                    });
                    report.skipped.push(path.clone());
                }
            }
        }

        if report.records.is_empty() {
            return Ok(report);
        }

        report.kept = deduplicate(report.records.clone());
        observer.on_event(&PipelineEvent::Deduplicated {
            kept: report.kept.len(),
            total: report.records.len(),
        });

        fs::create_dir_all(output_dir)?;
        for group in group_by_date(report.kept.clone()) {
            let group_report = self.merge_group(&group, output_dir, observer);
            report.groups.push(group_report);
        }

        Ok(report)
    }

    /// Merge one date group into `<output_dir>/<date>.pdf`.
    pub fn merge_group(
        &self,
        group: &DateGroup,
        output_dir: &Path,
        observer: &dyn PipelineObserver,
    ) -> GroupReport {
        let output = self.output_path(output_dir, group.date);
        observer.on_event(&PipelineEvent::GroupStarted {
            date: group.date,
            files: group.records.len(),
        });

        let mut merger = PdfMerger::new();
        let mut failed = Vec::new();
        for record in &group.records {
            match merger.append_file(&record.path) {
                Ok(pages) => observer.on_event(&PipelineEvent::FileAppended {
                    path: &record.path,
                    pages,
                }),
                Err(e) => {
                    observer.on_event(&PipelineEvent::PageAppendFailed {
                        path: &record.path,
                        error: &e.to_string(),
                    });
                    failed.push(record.path.clone());
                }
            }
        }

        let pages = merger.page_count();
        let mut report = GroupReport {
            date: group.date,
            output,
            files: group.records.len(),
            pages,
            failed,
            written: false,
        };
        if pages == 0 {
            observer.on_event(&PipelineEvent::WriteFailed {
                output: &report.output,
                error: "no pages to write",
            });
            return report;
        }

        match write_merged(merger, &report.output) {
            Ok(()) => {
                report.written = true;
                observer.on_event(&PipelineEvent::GroupWritten {
                    output: &report.output,
                    pages,
                });
            }
            Err(e) => {
                // Never leave a half-written file behind
                let _ = fs::remove_file(&report.output);
                observer.on_event(&PipelineEvent::WriteFailed {
                    output: &report.output,
                    error: &e.to_string(),
                });
            }
        }
        report
    }

    /// Target file for a group with the given date.
    pub fn output_path(&self, output_dir: &Path, date: Option<NaiveDate>) -> PathBuf {
        let stem = match date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => self.merge.unknown_date_name.clone(),
        };
        output_dir.join(format!("{}.pdf", stem))
    }
}

fn write_merged(merger: PdfMerger, output: &Path) -> Result<()> {
    let data = merger.finish()?;
    fs::write(output, data)?;
    Ok(())
}

/// PDF files (case-insensitive extension) directly inside `dir`, by name.
pub fn scan_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
