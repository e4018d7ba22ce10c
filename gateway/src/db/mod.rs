//! Database module for PostgreSQL operations.
//!
//! This module provides:
//! - Connection pool setup and schema initialization
//! - The delivery ledger (ingestion idempotency)
//! - State-machine contracts shared with the triage worker

pub mod contracts;
pub mod ledger;
pub mod pool;
pub mod schema;

pub use contracts::{DlqStatus, PatchState};
pub use ledger::{DeliveryLedger, InsertOutcome, NewDelivery};
pub use pool::{connect_pool, init_schema};
