//! Queue module for RabbitMQ operations.
//!
//! This module provides:
//! - The normalized event contract published to the triage queue
//! - An async publisher for enqueueing events
//!
//! ## Architecture
//!
//! ```text
//! GitHub Webhook → Gateway → triage_events queue → Triage Worker
//! ```

pub mod publisher;
pub mod types;

pub use publisher::Publisher;
pub use types::{IssueRef, NormalizedEvent, RepoRef, SCHEMA_VERSION, TRIAGE_QUEUE};
