//! # Error Types
//!
//! Errors raised by the foundational types: timestamp parsing and
//! arithmetic, identifier construction, digest parsing, canonical
//! serialization, and policy loading. Document lifecycle errors live in
//! `docgov-state` next to the operations that raise them.

use thiserror::Error;

/// Top-level error type for `docgov-core`.
#[derive(Error, Debug)]
pub enum DocgovError {
    /// A timestamp could not be parsed or the requested arithmetic overflowed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// An identifier was empty or otherwise malformed.
    #[error("invalid identifier for {kind}: {reason}")]
    InvalidIdentifier {
        /// Identifier namespace (e.g. "document_id").
        kind: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A content digest string was malformed.
    #[error("invalid content digest: {0}")]
    InvalidDigest(String),

    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// The document policy failed validation.
    #[error("invalid document policy: {0}")]
    InvalidPolicy(String),

    /// The policy file or an environment override could not be parsed.
    #[error("policy configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values have no deterministic canonical form.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
