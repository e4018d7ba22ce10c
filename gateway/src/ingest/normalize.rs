//! Event normalization: raw GitHub payload → queue contract.
//!
//! The normalizer is a pure projection. Everything the triage worker needs
//! is copied into the [`NormalizedEvent`]; nothing else from the raw payload
//! survives, which keeps the unbounded upstream payload shape out of the
//! pipeline.

use chrono::{DateTime, Utc};

use crate::ingest::payload::IssuesPayload;
use crate::queue::types::{IssueRef, NormalizedEvent, RepoRef, SCHEMA_VERSION};

/// Build the normalized event for an accepted, non-duplicate delivery.
///
/// `event_id` currently mirrors `delivery_id` for this event family; the
/// two stay separate fields in the contract because downstream tables key
/// on them independently.
pub fn normalize(
    payload: &IssuesPayload,
    delivery_id: &str,
    event_name: &str,
    received_at: DateTime<Utc>,
) -> NormalizedEvent {
    NormalizedEvent {
        schema_version: SCHEMA_VERSION.to_string(),
        event_id: delivery_id.to_string(),
        delivery_id: delivery_id.to_string(),
        event_name: event_name.to_string(),
        action: payload.action.clone(),
        received_at,
        installation_id: payload.installation.id,
        repo: RepoRef {
            id: payload.repository.id,
            full_name: payload.repository.full_name.clone(),
            private: payload.repository.private,
        },
        issue: IssueRef {
            number: payload.issue.number,
            id: payload.issue.id,
            node_id: payload.issue.node_id.clone(),
            url: payload.issue.url.clone(),
            html_url: payload.issue.html_url.clone(),
            title: payload.issue.title.clone(),
            body: payload.issue.body.clone(),
            labels: payload.issue.labels.iter().map(|l| l.name.clone()).collect(),
            author_login: payload.issue.user.login.clone(),
            created_at: payload.issue.created_at,
            updated_at: payload.issue.updated_at,
        },
        sender_login: payload.sender.as_ref().map(|s| s.login.clone()),
        trace_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed_fixture() -> IssuesPayload {
        IssuesPayload::from_value(crate::ingest::test_fixtures::issues_opened()).unwrap()
    }

    #[test]
    fn test_normalize_projects_all_fields() {
        let received_at: DateTime<Utc> = "2024-06-01T12:00:00Z".parse().unwrap();
        let event = normalize(&parsed_fixture(), "d-123", "issues", received_at);

        assert_eq!(event.schema_version, SCHEMA_VERSION);
        assert_eq!(event.event_id, "d-123");
        assert_eq!(event.delivery_id, "d-123");
        assert_eq!(event.event_name, "issues");
        assert_eq!(event.action, "opened");
        assert_eq!(event.received_at, received_at);
        assert_eq!(event.installation_id, 12345678);
        assert_eq!(event.repo.full_name, "octo/widgets");
        assert!(!event.repo.private);
        assert_eq!(event.issue.number, 42);
        assert_eq!(event.issue.author_login, "octocat");
        assert_eq!(event.trace_id, None);
    }

    #[test]
    fn test_labels_become_bare_names() {
        let event = normalize(&parsed_fixture(), "d-123", "issues", Utc::now());

        assert_eq!(event.issue.labels, vec!["bug".to_string(), "p1".to_string()]);
    }

    #[test]
    fn test_absent_sender_is_none() {
        let mut value = crate::ingest::test_fixtures::issues_opened();
        value.as_object_mut().unwrap().remove("sender");
        let payload = IssuesPayload::from_value(value).unwrap();

        let event = normalize(&payload, "d-123", "issues", Utc::now());
        assert_eq!(event.sender_login, None);
    }

    #[test]
    fn test_normalized_event_passes_closed_schema() {
        // The producer's own output must decode under the consumer's strict
        // schema
        let event = normalize(&parsed_fixture(), "d-123", "issues", Utc::now());

        let json = serde_json::to_string(&event).unwrap();
        let decoded: NormalizedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
    }
}
