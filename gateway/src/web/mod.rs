//! Web server module for the webhook ingestion endpoint.
//!
//! This module provides:
//! - Signature verification for inbound GitHub webhooks
//! - The `/health` and `/webhook/github` handlers
//!
//! Parsing and all side effects beyond the signature check live in the
//! ingest module; handlers only translate HTTP to orchestrator calls.

pub mod handlers;
pub mod signature;

pub use handlers::{github_webhook, health, router, AppState, HealthResponse, WebhookResponse};
pub use signature::verify_github_signature;
