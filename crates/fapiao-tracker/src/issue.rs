//! Issue field set and request payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Fields of a new issue.
///
/// Category, epic, team, cost impact and story points are carried for
/// callers that track them, but only the standard fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueFields {
    /// Component ids.
    pub components: Vec<String>,
    /// Project id.
    pub project: String,
    /// Issue type id.
    pub issuetype: String,
    pub issue_category: Option<String>,
    pub epic_key: Option<String>,
    pub delivery_team: Option<String>,
    pub cost_impact: Option<String>,
    /// Assignee user name.
    pub assignee: Option<String>,
    /// Issue title.
    pub summary: String,
    pub description: String,
    pub point: Option<f64>,
}

impl IssueFields {
    /// Body of the create request.
    pub fn to_payload(&self) -> Value {
        let components: Vec<Value> = self
            .components
            .iter()
            .map(|id| json!({ "id": id }))
            .collect();

        json!({
            "fields": {
                "components": components,
                "project": { "id": self.project },
                "summary": self.summary,
                "issuetype": { "id": self.issuetype },
                "description": self.description,
                "assignee": { "name": self.assignee.as_deref().unwrap_or_default() },
            }
        })
    }
}

/// Reference to an issue returned by the create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    pub url: String,
}
