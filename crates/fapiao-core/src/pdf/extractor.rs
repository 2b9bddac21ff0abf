//! PDF text extraction using pdf-extract with a lopdf fallback.

use std::fs;
use std::panic;
use std::path::Path;

use lopdf::Document;
use tracing::{debug, trace};

use super::{Result, TextSource};
use crate::error::PdfError;
use crate::pipeline::observer::{PipelineEvent, PipelineObserver, TextMethod};

/// Loaded PDF ready for text extraction.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Read and load the PDF at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(|e| PdfError::Parse(e.to_string()))?;
        let mut extractor = Self::new();
        extractor.load(&data)?;
        Ok(extractor)
    }

    /// Load a PDF from bytes.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    /// Get the number of pages in the PDF.
    pub fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    /// Layout-preserving text of the whole document.
    pub fn layout_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        // pdf-extract panics on some malformed content streams
        let data = self.raw_data.as_slice();
        let text = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data))
            .map_err(|_| PdfError::TextExtraction("pdf-extract panicked".to_string()))?
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(PdfError::TextExtraction("no text on any page".to_string()));
        }
        Ok(text)
    }

    /// Page-by-page text accumulation, pages separated by a blank line.
    pub fn plain_text(&self) -> Result<String> {
        let doc = self
            .document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))?;

        let mut text = String::new();
        for page_num in doc.get_pages().keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) if !page_text.is_empty() => {
                    text.push_str(&page_text);
                    text.push_str("\n\n");
                }
                Ok(_) => {}
                Err(e) => trace!("No text on page {}: {}", page_num, e),
            }
        }
        Ok(text)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// [`TextSource`] reading PDFs from disk.
///
/// Tries layout-preserving extraction first and falls back to plain page
/// text once; both failing yields an empty string.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextSource;

impl PdfTextSource {
    pub fn new() -> Self {
        Self
    }
}

impl TextSource for PdfTextSource {
    fn extract_text(&self, path: &Path, observer: &dyn PipelineObserver) -> String {
        let report = |method: TextMethod, error: &str| {
            observer.on_event(&PipelineEvent::TextExtractionFailed {
                path,
                method,
                error,
            })
        };

        // Both methods read through the same lopdf document, so a load
        // failure rules out either of them
        let pdf = match PdfExtractor::open(path) {
            Ok(pdf) => pdf,
            Err(e) => {
                let error = e.to_string();
                report(TextMethod::Layout, &error);
                report(TextMethod::Plain, &error);
                return String::new();
            }
        };

        match pdf.layout_text() {
            Ok(text) => return text,
            Err(e) => report(TextMethod::Layout, &e.to_string()),
        }

        match pdf.plain_text() {
            Ok(text) => text,
            Err(e) => {
                report(TextMethod::Plain, &e.to_string());
                String::new()
            }
        }
    }
}
