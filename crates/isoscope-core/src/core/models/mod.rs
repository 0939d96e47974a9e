//! Data models for confidence statistics and the external service payloads.
//!
//! The service schemas keep every field the services may omit as an `Option` (or an empty
//! `Vec`), so absence is handled once at deserialization instead of deep in the callers.

pub mod alphafold;
pub mod confidence;
pub mod gene;
pub mod uniprot;

use thiserror::Error;

/// Failure to decode a service response into its schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),
}
