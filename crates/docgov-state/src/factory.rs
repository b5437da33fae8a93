//! # Record Factory
//!
//! Validates a submission against the document policy and builds a new
//! `Pending` record with its retention deadline and `CREATE` audit entry.
//!
//! Validation order, first failure wins:
//!
//! 1. `enrollment_id`, `document_type`, `filename` non-blank
//! 2. `content_type` on the allow-list (exact match)
//! 3. `size_bytes` within the configured maximum

use std::sync::Arc;

use tracing::{debug, warn};

use docgov_core::{DocumentPolicy, EnrollmentId, Timestamp};

use crate::audit::{AuditAction, SYSTEM_ACTOR};
use crate::error::DocumentError;
use crate::record::DocumentRecord;
use crate::retention::RetentionCalculator;

/// Builds validated document records.
#[derive(Debug, Clone)]
pub struct RecordFactory {
    policy: Arc<DocumentPolicy>,
    retention: RetentionCalculator,
}

impl RecordFactory {
    pub fn new(policy: Arc<DocumentPolicy>) -> Self {
        let retention = RetentionCalculator::from_policy(&policy);
        Self { policy, retention }
    }

    /// Create a record stamped with the current time.
    pub fn create_document(
        &self,
        enrollment_id: &str,
        document_type: &str,
        filename: &str,
        content_type: &str,
        size_bytes: u64,
    ) -> Result<DocumentRecord, DocumentError> {
        self.create_document_at(
            enrollment_id,
            document_type,
            filename,
            content_type,
            size_bytes,
            Timestamp::now(),
        )
    }

    /// Create a record stamped at `now`.
    pub fn create_document_at(
        &self,
        enrollment_id: &str,
        document_type: &str,
        filename: &str,
        content_type: &str,
        size_bytes: u64,
        now: Timestamp,
    ) -> Result<DocumentRecord, DocumentError> {
        if let Err(err) =
            self.validate(enrollment_id, document_type, filename, content_type, size_bytes)
        {
            warn!(
                enrollment = enrollment_id,
                document_type,
                content_type,
                size_bytes,
                error = %err,
                "document submission rejected"
            );
            return Err(err);
        }

        let enrollment = EnrollmentId::new(enrollment_id)
            .map_err(|_| DocumentError::MissingField { field: "enrollment_id" })?;
        let retention_date = self.retention.compute_retention_date(now)?;

        let mut record = DocumentRecord::new(
            enrollment,
            document_type.to_string(),
            filename.to_string(),
            content_type.to_string(),
            size_bytes,
            now,
            retention_date,
        );
        record.append_audit(now, AuditAction::Create, "Document created", SYSTEM_ACTOR);

        debug!(
            enrollment = enrollment_id,
            document_type,
            retention_date = %retention_date,
            "document record created"
        );
        Ok(record)
    }

    fn validate(
        &self,
        enrollment_id: &str,
        document_type: &str,
        filename: &str,
        content_type: &str,
        size_bytes: u64,
    ) -> Result<(), DocumentError> {
        for (field, value) in [
            ("enrollment_id", enrollment_id),
            ("document_type", document_type),
            ("filename", filename),
        ] {
            if value.trim().is_empty() {
                return Err(DocumentError::MissingField { field });
            }
        }
        if !self.policy.allows_content_type(content_type) {
            return Err(DocumentError::InvalidContentType {
                content_type: content_type.to_string(),
            });
        }
        if size_bytes > self.policy.max_document_size_bytes {
            return Err(DocumentError::InvalidSize {
                size_bytes,
                max_bytes: self.policy.max_document_size_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::DocumentStatus;

    fn factory() -> RecordFactory {
        RecordFactory::new(Arc::new(DocumentPolicy::default()))
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn test_create_valid_document() {
        let now = ts("2026-03-15T10:30:00Z");
        let record = factory()
            .create_document_at("E1", "CPF", "cpf.pdf", "application/pdf", 1024, now)
            .unwrap();
        assert_eq!(record.id, None);
        assert_eq!(record.enrollment_id().as_str(), "E1");
        assert_eq!(record.document_type(), "CPF");
        assert_eq!(record.filename(), "cpf.pdf");
        assert_eq!(record.content_type(), "application/pdf");
        assert_eq!(record.size_bytes(), 1024);
        assert_eq!(record.status(), DocumentStatus::Pending);
        assert_eq!(record.created_at(), now);
        assert_eq!(record.updated_at(), now);
        assert_eq!(record.processed_at(), None);
        assert_eq!(record.retention_date(), ts("2031-03-15T10:30:00Z"));
        assert!(record.encryption_metadata().is_none());
        assert!(record.storage_path.is_none());
        assert!(record.content_hash.is_none());

        let trail = record.audit_trail();
        assert_eq!(trail.len(), 1);
        let entry = &trail.entries()[0];
        assert_eq!(entry.action, AuditAction::Create);
        assert_eq!(entry.status, DocumentStatus::Pending);
        assert_eq!(entry.reason, "Document created");
        assert_eq!(entry.performed_by, "SYSTEM");
        assert_eq!(entry.timestamp, now);
    }

    #[test]
    fn test_size_boundary() {
        let max = DocumentPolicy::default().max_document_size_bytes;
        assert!(factory()
            .create_document("E1", "CPF", "cpf.pdf", "application/pdf", max)
            .is_ok());
        assert!(factory()
            .create_document("E1", "CPF", "cpf.pdf", "application/pdf", 0)
            .is_ok());
        let err = factory()
            .create_document("E1", "CPF", "cpf.pdf", "application/pdf", max + 1)
            .unwrap_err();
        assert_eq!(
            err,
            DocumentError::InvalidSize {
                size_bytes: max + 1,
                max_bytes: max,
            }
        );
    }

    #[test]
    fn test_content_type_exact_match() {
        for ct in ["application/x-msdownload", "APPLICATION/PDF", "application/pdf ", ""] {
            let err = factory()
                .create_document("E1", "CPF", "cpf.pdf", ct, 10)
                .unwrap_err();
            assert_eq!(err, DocumentError::InvalidContentType { content_type: ct.into() });
        }
    }

    #[test]
    fn test_missing_fields_in_order() {
        let f = factory();
        assert_eq!(
            f.create_document("", "", "", "application/pdf", 1).unwrap_err(),
            DocumentError::MissingField { field: "enrollment_id" }
        );
        assert_eq!(
            f.create_document("E1", "  ", "", "application/pdf", 1).unwrap_err(),
            DocumentError::MissingField { field: "document_type" }
        );
        assert_eq!(
            f.create_document("E1", "CPF", "\t", "application/pdf", 1).unwrap_err(),
            DocumentError::MissingField { field: "filename" }
        );
    }

    #[test]
    fn test_missing_field_wins_over_content_type_and_size() {
        let err = factory()
            .create_document("E1", "CPF", "", "text/plain", u64::MAX)
            .unwrap_err();
        assert_eq!(err.kind(), "MISSING_FIELD");
    }

    #[test]
    fn test_content_type_wins_over_size() {
        let err = factory()
            .create_document("E1", "CPF", "x.exe", "application/x-msdownload", u64::MAX)
            .unwrap_err();
        assert_eq!(err.kind(), "INVALID_CONTENT_TYPE");
    }

    #[test]
    fn test_policy_drives_limits() {
        let policy = DocumentPolicy {
            max_document_size_bytes: 10,
            allowed_content_types: vec!["image/tiff".into()],
            retention_years: 7,
            ..DocumentPolicy::default()
        };
        let f = RecordFactory::new(Arc::new(policy));
        assert!(f.create_document("E1", "RG", "rg.tiff", "application/pdf", 1).is_err());
        assert!(f.create_document("E1", "RG", "rg.tiff", "image/tiff", 11).is_err());
        let record = f
            .create_document_at("E1", "RG", "rg.tiff", "image/tiff", 10, ts("2026-01-01T00:00:00Z"))
            .unwrap();
        assert_eq!(record.retention_date(), ts("2033-01-01T00:00:00Z"));
    }
}
