//! Raw GitHub `issues` webhook payload types.
//!
//! These are deliberately loose: GitHub payloads carry far more fields than
//! the pipeline needs, so unknown fields are tolerated here and the closed
//! schema is enforced only on the normalized output. Only the fields the
//! normalizer projects are declared.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// The raw payload did not carry the fields an `issues`/`opened` event is
/// contractually required to have.
///
/// This fires after the event/action filter has passed, so it indicates an
/// upstream contract violation rather than a recoverable condition.
#[derive(Debug, Error)]
#[error("invalid issues payload: {0}")]
pub struct PayloadError(#[from] serde_json::Error);

/// GitHub App installation reference.
#[derive(Debug, Clone, Deserialize)]
pub struct InstallationRef {
    pub id: i64,
}

/// Repository fields used for routing and audit.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryFields {
    pub id: i64,
    pub full_name: String,
    pub private: bool,
}

/// A label object; only the name survives normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelRef {
    pub name: String,
}

/// A user/account object; only the login survives normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRef {
    pub login: String,
}

/// Issue fields projected into the normalized event.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueFields {
    pub number: i64,
    pub id: i64,
    pub node_id: String,
    pub url: String,
    pub html_url: String,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<LabelRef>,
    pub user: AccountRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An `issues` event payload after the event/action filter has passed.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuesPayload {
    pub action: String,
    pub installation: InstallationRef,
    pub repository: RepositoryFields,
    pub issue: IssueFields,
    #[serde(default)]
    pub sender: Option<AccountRef>,
}

impl IssuesPayload {
    /// Parse a raw JSON payload into the typed projection.
    pub fn from_value(value: serde_json::Value) -> Result<Self, PayloadError> {
        Ok(serde_json::from_value(value)?)
    }
}
