//! Minimal client for a Jira-style issue tracker.
//!
//! Three calls are supported: create an issue, fetch an issue and update an
//! issue. Credentials come from the environment.

pub mod client;
pub mod config;
pub mod error;
pub mod issue;

pub use client::TrackerClient;
pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use issue::{CreatedIssue, IssueFields};
