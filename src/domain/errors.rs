//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. Per-document and per-task
//! errors stay local (logged, counted); only `Config` aborts a run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Document failed signature/shape validation (e.g. forward nesting past
    /// the depth limit). The document is excluded; the run continues.
    #[error("Invalid document structure: {0}")]
    Structure(String),

    /// Document content is not valid for the expected schema. Skipped.
    #[error("Document parse failed: {0}")]
    Parse(String),

    /// Outbound fetch failed or timed out. Retried by the engine.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Destination write failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid configuration. Fatal at startup, before any I/O.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Name resolution lookup failed. Caller falls back to the numeric id.
    #[error("Name resolution failed: {0}")]
    Resolve(String),
}
