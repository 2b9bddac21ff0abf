//! Connection settings for the tracker.

use crate::error::{Result, TrackerError};

pub const BASE_URL_VAR: &str = "JIRA_BASE_URL";
pub const USER_VAR: &str = "JIRA_USER";
pub const API_TOKEN_VAR: &str = "JIRA_API_TOKEN";

/// Where the tracker lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub base_url: String,
    pub user: String,
    pub api_token: String,
}

impl TrackerConfig {
    pub fn new(
        base_url: impl Into<String>,
        user: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            user: user.into(),
            api_token: api_token.into(),
        }
    }

    /// Read `JIRA_BASE_URL`, `JIRA_USER` and `JIRA_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(TrackerError::MissingEnv(name))
        };
        Ok(Self {
            base_url: get(BASE_URL_VAR)?,
            user: get(USER_VAR)?,
            api_token: get(API_TOKEN_VAR)?,
        })
    }

    /// Issue collection endpoint, `<base>/rest/api/2/issue`.
    pub fn issue_url(&self) -> String {
        format!("{}/rest/api/2/issue", self.base_url.trim_end_matches('/'))
    }
}
