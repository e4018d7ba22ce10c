//! Triage Gateway - webhook ingestion boundary of the issue triage pipeline.
//!
//! The gateway receives GitHub webhook deliveries, authenticates them with
//! HMAC-SHA256, collapses sender retries against a relational delivery
//! ledger, normalizes accepted payloads into a versioned event contract,
//! and publishes each event to the triage queue exactly once per delivery
//! ID accepted.
//!
//! ## Architecture
//!
//! ```text
//! GitHub → /webhook/github → signature check → dedup ledger (Postgres)
//!        → normalize → triage_events queue (RabbitMQ) → Triage Worker
//! ```

pub mod config;
pub mod db;
pub mod ingest;
pub mod queue;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use db::{DeliveryLedger, InsertOutcome, NewDelivery};
pub use ingest::{IngestOutcome, IngestService};
pub use queue::{IssueRef, NormalizedEvent, Publisher, RepoRef, SCHEMA_VERSION, TRIAGE_QUEUE};
pub use web::AppState;
