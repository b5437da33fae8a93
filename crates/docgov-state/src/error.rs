//! # Document Errors
//!
//! Every operation on a document record returns `DocumentError` on failure
//! and leaves the record untouched. Each variant carries the offending value
//! so the owning service can report it without re-deriving context, and
//! [`DocumentError::kind`] gives a stable code for transport mapping.

use thiserror::Error;

use docgov_core::Timestamp;

use crate::status::DocumentStatus;

/// Errors raised by document creation, lifecycle, and attestation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A required identity, classification, or encryption field was empty.
    #[error("required field is missing: {field}")]
    MissingField {
        /// Name of the empty field.
        field: &'static str,
    },

    /// Content type is outside the configured allow-list.
    #[error("unsupported content type: {content_type:?}")]
    InvalidContentType {
        /// The rejected MIME type.
        content_type: String,
    },

    /// Document exceeds the configured maximum size.
    #[error("document size {size_bytes} exceeds maximum allowed {max_bytes}")]
    InvalidSize {
        /// Submitted size.
        size_bytes: u64,
        /// Configured maximum.
        max_bytes: u64,
    },

    /// Requested status is outside the closed status set.
    #[error("invalid document status: {status:?}")]
    InvalidStatus {
        /// The rejected status string.
        status: String,
    },

    /// Encryption metadata names a cipher other than the approved one.
    #[error("unsupported encryption algorithm {algorithm:?}, only {approved} is accepted")]
    UnsupportedAlgorithm {
        /// The rejected algorithm identifier.
        algorithm: String,
        /// The approved identifier.
        approved: String,
    },

    /// Key rotation deadline is not strictly in the future.
    #[error("key rotation due {due} is not after {now}")]
    StaleRotationSchedule {
        /// The rotation deadline on the metadata.
        due: Timestamp,
        /// Validation time.
        now: Timestamp,
    },

    /// The configured transition policy forbids this status change.
    #[error("status transition {from} -> {to} is not permitted")]
    InvalidTransition {
        /// Current status.
        from: DocumentStatus,
        /// Requested status.
        to: DocumentStatus,
    },

    /// The document cannot be handed out yet.
    #[error("document is not retrievable: {reason}")]
    NotRetrievable {
        /// Why retrieval was refused.
        reason: String,
    },

    /// Supplied bytes do not match the recorded content hash.
    #[error("content hash mismatch: recorded {expected}, computed {actual}")]
    IntegrityMismatch {
        /// Recorded digest.
        expected: String,
        /// Digest of the supplied bytes.
        actual: String,
    },

    /// A persisted record violates a record invariant.
    #[error("record invariant violated: {0}")]
    CorruptRecord(String),

    /// Deadline arithmetic overflowed the supported calendar range.
    #[error("deadline computation failed: {0}")]
    DeadlineOverflow(String),
}

impl DocumentError {
    /// Stable machine-readable code for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::InvalidContentType { .. } => "INVALID_CONTENT_TYPE",
            Self::InvalidSize { .. } => "INVALID_SIZE",
            Self::InvalidStatus { .. } => "INVALID_STATUS",
            Self::UnsupportedAlgorithm { .. } => "UNSUPPORTED_ALGORITHM",
            Self::StaleRotationSchedule { .. } => "STALE_ROTATION_SCHEDULE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotRetrievable { .. } => "NOT_RETRIEVABLE",
            Self::IntegrityMismatch { .. } => "INTEGRITY_MISMATCH",
            Self::CorruptRecord(_) => "CORRUPT_RECORD",
            Self::DeadlineOverflow(_) => "DEADLINE_OVERFLOW",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = DocumentError::InvalidSize {
            size_bytes: 200,
            max_bytes: 100,
        };
        assert_eq!(err.to_string(), "document size 200 exceeds maximum allowed 100");
        assert_eq!(err.kind(), "INVALID_SIZE");

        let err = DocumentError::InvalidTransition {
            from: DocumentStatus::Completed,
            to: DocumentStatus::Pending,
        };
        assert_eq!(err.to_string(), "status transition COMPLETED -> PENDING is not permitted");
    }

    #[test]
    fn test_kinds_are_distinct() {
        let now = Timestamp::now();
        let all = [
            DocumentError::MissingField { field: "filename" },
            DocumentError::InvalidContentType { content_type: "x".into() },
            DocumentError::InvalidSize { size_bytes: 1, max_bytes: 0 },
            DocumentError::InvalidStatus { status: "bogus".into() },
            DocumentError::UnsupportedAlgorithm {
                algorithm: "DES".into(),
                approved: "AES-256-GCM".into(),
            },
            DocumentError::StaleRotationSchedule { due: now, now },
            DocumentError::InvalidTransition {
                from: DocumentStatus::Failed,
                to: DocumentStatus::Completed,
            },
            DocumentError::NotRetrievable { reason: "pending".into() },
            DocumentError::IntegrityMismatch { expected: "a".into(), actual: "b".into() },
            DocumentError::CorruptRecord("x".into()),
            DocumentError::DeadlineOverflow("x".into()),
        ];
        let kinds: std::collections::HashSet<_> = all.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.len(), all.len());
    }
}
