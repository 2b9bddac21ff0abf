//! Async HTTP client for the issue endpoint.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::issue::{CreatedIssue, IssueFields};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for creating, reading and updating issues.
#[derive(Debug)]
pub struct TrackerClient {
    client: reqwest::Client,
    issue_url: String,
    user: String,
    api_token: String,
}

impl TrackerClient {
    pub fn new(config: &TrackerConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(concat!("fapiao/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            issue_url: config.issue_url(),
            user: config.user.clone(),
            api_token: config.api_token.clone(),
        })
    }

    /// Issue collection endpoint.
    pub fn issue_url(&self) -> &str {
        &self.issue_url
    }

    /// URL of a single issue with every field expanded.
    pub fn issue_detail_url(&self, key: &str) -> String {
        format!("{}/{}?*all", self.issue_url, key)
    }

    /// Create an issue. Only `201 Created` counts as success.
    pub async fn create_issue(&self, fields: &IssueFields) -> Result<CreatedIssue> {
        let payload = fields.to_payload();
        debug!("Creating issue in project {}", fields.project);

        let response = self
            .client
            .post(&self.issue_url)
            .basic_auth(&self.user, Some(&self.api_token))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::CREATED {
            return Err(TrackerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let created: CreatedIssue = serde_json::from_str(&body)?;
        info!("Created issue {}", created.key);
        Ok(created)
    }

    /// Fetch an issue as raw JSON.
    pub async fn get_issue(&self, key: &str) -> Result<Value> {
        let response = self
            .client
            .get(self.issue_detail_url(key))
            .basic_auth(&self.user, Some(&self.api_token))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TrackerError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Update an issue with a raw JSON body.
    pub async fn update_issue(&self, key: &str, data: &Value) -> Result<()> {
        info!("Updating issue {}", key);
        let response = self
            .client
            .put(format!("{}/{}", self.issue_url, key))
            .basic_auth(&self.user, Some(&self.api_token))
            .json(data)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        debug!("Issue {} updated with status {}", key, status);
        Ok(())
    }
}
