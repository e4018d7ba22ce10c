//! Queue message types for the gateway → triage worker handoff.
//!
//! This module defines the normalized event contract: the stable, versioned,
//! minimal event shape that crosses the queue boundary. The worker consumes
//! these messages to classify, assign, and patch issues without ever seeing
//! the full raw GitHub payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Queue name for normalized triage events.
pub const TRIAGE_QUEUE: &str = "triage_events";

/// Contract version for queue messages.
///
/// Bumped only on breaking changes to the message shape; consumers gate
/// their decoding on this value.
pub const SCHEMA_VERSION: &str = "1.0";

/// Minimal repository identity + privacy flag needed by the triage pipeline.
///
/// `deny_unknown_fields` keeps the contract closed: if either side starts
/// sending fields the other does not declare, decoding fails fast instead of
/// silently drifting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoRef {
    /// GitHub repository numeric ID (stable identifier)
    pub id: i64,
    /// Repository full name in the form "owner/repo"
    pub full_name: String,
    /// Whether the repository is private (affects access/logging policies)
    pub private: bool,
}

/// Minimal issue snapshot fields needed to triage, classify, and assign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueRef {
    /// Issue number within the repository (used for API patch/update)
    pub number: i64,
    /// GitHub issue numeric ID (stable identifier)
    pub id: i64,
    /// GraphQL node ID for the issue
    pub node_id: String,
    /// REST API URL for the issue resource
    pub url: String,
    /// Human-facing GitHub URL for the issue
    pub html_url: String,
    /// Issue title
    pub title: String,
    /// Issue body text (may be null/empty)
    pub body: Option<String>,
    /// Label *names* (strings only) on the issue at ingestion time
    #[serde(default)]
    pub labels: Vec<String>,
    /// GitHub login of the issue author
    pub author_login: String,
    /// Issue creation timestamp from GitHub
    pub created_at: DateTime<Utc>,
    /// Issue last-updated timestamp from GitHub
    pub updated_at: DateTime<Utc>,
}

/// Normalized event published to the triage queue.
///
/// This is the contract between the webhook gateway (producer) and the
/// triage worker (consumer): a stable, versioned, minimal projection of the
/// raw webhook payload. The `event_id` and `delivery_id` fields correlate
/// every record the worker derives back to exactly one ingested delivery.
///
/// `event_id` and `delivery_id` are kept as separate fields even though this
/// producer currently populates them identically: downstream tables already
/// model them as distinct keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizedEvent {
    /// Contract version for this message
    pub schema_version: String,
    /// Internal idempotency key for downstream deduplication
    pub event_id: String,
    /// GitHub delivery ID from the X-GitHub-Delivery header
    pub delivery_id: String,
    /// GitHub event type from X-GitHub-Event (e.g. "issues")
    pub event_name: String,
    /// Event action from the payload (e.g. "opened")
    pub action: String,
    /// Timestamp when the gateway accepted the webhook (gateway clock)
    pub received_at: DateTime<Utc>,
    /// GitHub App installation ID associated with the event
    pub installation_id: i64,
    /// Repository reference for routing/config lookup and audit
    pub repo: RepoRef,
    /// Issue snapshot used for triage, classification, and assignment
    pub issue: IssueRef,
    /// GitHub login of the actor that triggered the event, if present
    pub sender_login: Option<String>,
    /// Correlation ID for distributed tracing/log correlation
    #[serde(default)]
    pub trace_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> NormalizedEvent {
        NormalizedEvent {
            schema_version: SCHEMA_VERSION.to_string(),
            event_id: "d-123".to_string(),
            delivery_id: "d-123".to_string(),
            event_name: "issues".to_string(),
            action: "opened".to_string(),
            received_at: "2024-06-01T12:00:00Z".parse().unwrap(),
            installation_id: 12345678,
            repo: RepoRef {
                id: 123456789,
                full_name: "octo/widgets".to_string(),
                private: false,
            },
            issue: IssueRef {
                number: 42,
                id: 987654321,
                node_id: "I_kwDOExample123".to_string(),
                url: "https://api.github.com/repos/octo/widgets/issues/42".to_string(),
                html_url: "https://github.com/octo/widgets/issues/42".to_string(),
                title: "Checkout fails on Safari".to_string(),
                body: Some("Steps to reproduce: ...".to_string()),
                labels: vec!["bug".to_string(), "p1".to_string()],
                author_login: "octocat".to_string(),
                created_at: "2024-06-01T11:59:00Z".parse().unwrap(),
                updated_at: "2024-06-01T11:59:30Z".parse().unwrap(),
            },
            sender_login: Some("octocat".to_string()),
            trace_id: None,
        }
    }

    #[test]
    fn test_wire_round_trip() {
        let event = sample_event();

        let json = serde_json::to_string(&event).unwrap();
        let decoded: NormalizedEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, event);
    }

    #[test]
    fn test_unknown_top_level_field_rejected() {
        let mut value = serde_json::to_value(sample_event()).unwrap();
        value["raw_payload"] = serde_json::json!({"everything": true});

        let result: Result<NormalizedEvent, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_nested_field_rejected() {
        let mut value = serde_json::to_value(sample_event()).unwrap();
        value["issue"]["reactions"] = serde_json::json!({"+1": 3});

        let result: Result<NormalizedEvent, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let mut value = serde_json::to_value(sample_event()).unwrap();
        value.as_object_mut().unwrap().remove("installation_id");

        let result: Result<NormalizedEvent, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_null_optionals_accepted() {
        let mut value = serde_json::to_value(sample_event()).unwrap();
        value["sender_login"] = serde_json::Value::Null;
        value["issue"]["body"] = serde_json::Value::Null;

        let decoded: NormalizedEvent = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.sender_login, None);
        assert_eq!(decoded.issue.body, None);
    }
}
