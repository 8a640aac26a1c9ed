//! Typed engine errors.
//!
//! Store failures travel as [`anyhow::Error`]; the variants here are the
//! conditions the transport layer needs to tell apart (client error vs
//! missing document). An empty corpus is never an error.

use thiserror::Error;

use crate::models::DocumentId;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller supplied unusable input (empty content, zero page size).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An `href` value that could not be parsed. Link extraction skips these.
    #[error("malformed url: {0}")]
    MalformedUrl(String),

    #[error("document not found: {0}")]
    NotFound(DocumentId),
}
