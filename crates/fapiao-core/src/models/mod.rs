//! Data models shared across the pipeline.

pub mod config;
pub mod invoice;

pub use config::{ExtractionConfig, FapiaoConfig, MergeConfig, PathsConfig};
pub use invoice::{Field, InvoiceRecord};
