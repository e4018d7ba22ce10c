//! Database schema for the triage pipeline.
//!
//! The gateway owns schema initialization for the whole pipeline so a fresh
//! database is fully provisioned at startup. Only `webhook_delivery` is
//! written by the gateway itself; the remaining tables are contracts the
//! triage worker populates, keyed by the `event_id`/`delivery_id` pair every
//! published event carries.

/// Ingestion-level idempotency ledger. One row per accepted delivery,
/// insert-once, never mutated or deleted. The UNIQUE constraint on
/// `delivery_id` is the dedup gate.
pub const WEBHOOK_DELIVERY: &str = r#"
CREATE TABLE IF NOT EXISTS webhook_delivery (
    id              BIGSERIAL PRIMARY KEY,
    delivery_id     TEXT NOT NULL UNIQUE,
    event_name      TEXT NOT NULL,
    action          TEXT,
    installation_id BIGINT NOT NULL,
    repo_id         BIGINT NOT NULL,
    repo_full_name  TEXT NOT NULL,
    received_at     TIMESTAMPTZ NOT NULL,
    status          TEXT NOT NULL DEFAULT 'RECEIVED',
    created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

/// Per-repo configuration used by triage/assignment logic.
pub const REPO_CONFIG: &str = r#"
CREATE TABLE IF NOT EXISTS repo_config (
    repo_id         BIGINT PRIMARY KEY,
    installation_id BIGINT NOT NULL,
    repo_full_name  TEXT NOT NULL,
    config          JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

/// Developer attributes and capacity for assignment.
pub const DEVELOPER_PROFILE: &str = r#"
CREATE TABLE IF NOT EXISTS developer_profile (
    id               BIGSERIAL PRIMARY KEY,
    repo_id          BIGINT NOT NULL REFERENCES repo_config(repo_id) ON DELETE CASCADE,
    github_login     TEXT NOT NULL,
    skills           JSONB NOT NULL DEFAULT '[]'::jsonb,
    max_capacity     INTEGER NOT NULL DEFAULT 5,
    open_assignments INTEGER NOT NULL DEFAULT 0,
    version          INTEGER NOT NULL DEFAULT 0,
    created_at       TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at       TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_dev_profile_repo_login UNIQUE (repo_id, github_login)
)
"#;

pub const DEVELOPER_PROFILE_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS ix_dev_profile_repo_open_assignments
    ON developer_profile (repo_id, open_assignments)
"#;

/// Normalized issue snapshot derived from a published event. One snapshot
/// per event (UNIQUE on event_id).
pub const ISSUE_SNAPSHOT: &str = r#"
CREATE TABLE IF NOT EXISTS issue_snapshot (
    id               BIGSERIAL PRIMARY KEY,
    event_id         TEXT NOT NULL UNIQUE,
    delivery_id      TEXT NOT NULL,
    repo_id          BIGINT NOT NULL REFERENCES repo_config(repo_id) ON DELETE CASCADE,
    issue_number     INTEGER NOT NULL,
    issue_id         BIGINT NOT NULL,
    issue_node_id    TEXT NOT NULL,
    title            TEXT NOT NULL,
    body             TEXT,
    labels           TEXT[] NOT NULL DEFAULT ARRAY[]::TEXT[],
    author_login     TEXT NOT NULL,
    issue_created_at TIMESTAMPTZ NOT NULL,
    issue_updated_at TIMESTAMPTZ NOT NULL,
    snapshot_at      TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

pub const ISSUE_SNAPSHOT_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS ix_issue_snapshot_repo_issue_time
    ON issue_snapshot (repo_id, issue_number, snapshot_at DESC)
"#;

/// Triage/assignment decision for an event (UNIQUE on event_id), including
/// the GitHub patch-application lifecycle.
pub const TRIAGE_DECISION: &str = r#"
CREATE TABLE IF NOT EXISTS triage_decision (
    id                      BIGSERIAL PRIMARY KEY,
    event_id                TEXT NOT NULL UNIQUE,
    delivery_id             TEXT NOT NULL,
    repo_id                 BIGINT NOT NULL REFERENCES repo_config(repo_id) ON DELETE CASCADE,
    issue_number            INTEGER NOT NULL,
    decided_at              TIMESTAMPTZ NOT NULL DEFAULT now(),
    predicted_priority      TEXT,
    predicted_category      TEXT,
    confidence              DOUBLE PRECISION,
    selected_assignee_login TEXT,
    explanation             TEXT,
    patch_state             TEXT NOT NULL DEFAULT 'DECIDED'
        CONSTRAINT patch_state CHECK (patch_state IN ('DECIDED','APPLIED','FAILED_RETRY','SKIPPED_DUPLICATE')),
    patch_attempts          INTEGER NOT NULL DEFAULT 0,
    last_error              TEXT,
    created_at              TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at              TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

pub const TRIAGE_DECISION_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS ix_triage_decision_repo_issue_time
    ON triage_decision (repo_id, issue_number)
"#;

/// Dead-letter record for downstream processing failures, with its own
/// replay state machine.
pub const DLQ_RECORDS: &str = r#"
CREATE TABLE IF NOT EXISTS dlq_records (
    id            BIGSERIAL PRIMARY KEY,
    event_id      TEXT NOT NULL UNIQUE,
    delivery_id   TEXT NOT NULL,
    event_payload JSONB NOT NULL,
    error_message TEXT NOT NULL,
    error_type    TEXT NOT NULL,
    status        TEXT NOT NULL DEFAULT 'FAILED'
        CHECK (status IN ('FAILED','REPLAY_REQUESTED','REPLAY_SUCCEEDED','REPLAY_FAILED')),
    attempt_count INTEGER NOT NULL DEFAULT 1,
    last_error_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

pub const DLQ_RECORDS_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS ix_dlq_records_status ON dlq_records (status)",
    "CREATE INDEX IF NOT EXISTS ix_dlq_records_delivery_id ON dlq_records (delivery_id)",
];

/// All DDL statements in dependency order.
pub fn statements() -> Vec<&'static str> {
    let mut ddl = vec![
        WEBHOOK_DELIVERY,
        REPO_CONFIG,
        DEVELOPER_PROFILE,
        DEVELOPER_PROFILE_INDEX,
        ISSUE_SNAPSHOT,
        ISSUE_SNAPSHOT_INDEX,
        TRIAGE_DECISION,
        TRIAGE_DECISION_INDEX,
        DLQ_RECORDS,
    ];
    ddl.extend_from_slice(DLQ_RECORDS_INDEXES);
    ddl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_ordered_for_foreign_keys() {
        let ddl = statements();

        let repo_config = ddl.iter().position(|s| s.contains("repo_config")).unwrap();
        let snapshot = ddl
            .iter()
            .position(|s| s.contains("issue_snapshot"))
            .unwrap();
        let decision = ddl
            .iter()
            .position(|s| s.contains("triage_decision"))
            .unwrap();

        // Referencing tables come after repo_config
        assert!(repo_config < snapshot);
        assert!(repo_config < decision);
    }

    #[test]
    fn test_ledger_has_unique_delivery_id() {
        let column = WEBHOOK_DELIVERY
            .lines()
            .find(|line| line.trim_start().starts_with("delivery_id"))
            .unwrap();
        assert!(column.contains("UNIQUE"));
    }
}
