//! Error types for the fapiao-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the fapiao library.
#[derive(Error, Debug)]
pub enum FapiaoError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Failed to serialize a merged document.
    #[error("failed to save PDF: {0}")]
    Save(String),
}

/// Errors that make a single invoice file unusable.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Neither extraction method produced any text.
    #[error("no text could be extracted from {}", path.display())]
    NoText { path: PathBuf },

    /// File metadata (modification time) could not be read.
    #[error("cannot read metadata of {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for the fapiao library.
pub type Result<T> = std::result::Result<T, FapiaoError>;
