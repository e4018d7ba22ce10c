//! Ingestion module: payload parsing, normalization, and orchestration.
//!
//! ## Pipeline
//!
//! ```text
//! verified payload → filter → ledger dedup → normalize → publish → commit
//! ```

pub mod normalize;
pub mod payload;
pub mod service;

pub use normalize::normalize;
pub use payload::{IssuesPayload, PayloadError};
pub use service::{IngestOutcome, IngestService, SUPPORTED_ACTION, SUPPORTED_EVENT};
