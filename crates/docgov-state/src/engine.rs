//! # Governance Engine
//!
//! One handle over the three mutating operations, all configured from a
//! single [`DocumentPolicy`]. Callers that only need one collaborator can
//! construct it directly; the engine is a convenience for owning services.

use std::sync::Arc;

use docgov_core::DocumentPolicy;

use crate::encryption::{EncryptionMetadata, EncryptionMetadataValidator};
use crate::error::DocumentError;
use crate::factory::RecordFactory;
use crate::lifecycle::LifecycleController;
use crate::record::DocumentRecord;
use crate::retention::RetentionCalculator;
use crate::status::{PermissiveTransitions, TransitionPolicy};

/// Record factory, lifecycle controller, and encryption validator sharing
/// one policy.
#[derive(Debug, Clone)]
pub struct GovernanceEngine<P: TransitionPolicy = PermissiveTransitions> {
    policy: Arc<DocumentPolicy>,
    factory: RecordFactory,
    lifecycle: LifecycleController<P>,
    encryption: EncryptionMetadataValidator,
}

impl GovernanceEngine {
    /// Engine with permissive transitions.
    pub fn new(policy: Arc<DocumentPolicy>) -> Self {
        Self::with_transitions(policy, PermissiveTransitions)
    }
}

impl<P: TransitionPolicy> GovernanceEngine<P> {
    pub fn with_transitions(policy: Arc<DocumentPolicy>, transitions: P) -> Self {
        Self {
            factory: RecordFactory::new(Arc::clone(&policy)),
            lifecycle: LifecycleController::with_policy(transitions),
            encryption: EncryptionMetadataValidator::from_policy(&policy),
            policy,
        }
    }

    pub fn policy(&self) -> &DocumentPolicy {
        &self.policy
    }

    pub fn retention(&self) -> RetentionCalculator {
        RetentionCalculator::from_policy(&self.policy)
    }

    pub fn create_document(
        &self,
        enrollment_id: &str,
        document_type: &str,
        filename: &str,
        content_type: &str,
        size_bytes: u64,
    ) -> Result<DocumentRecord, DocumentError> {
        self.factory
            .create_document(enrollment_id, document_type, filename, content_type, size_bytes)
    }

    pub fn update_status(
        &self,
        record: &mut DocumentRecord,
        new_status: &str,
        reason: &str,
    ) -> Result<(), DocumentError> {
        self.lifecycle.update_status(record, new_status, reason)
    }

    pub fn set_encryption_metadata(
        &self,
        record: &mut DocumentRecord,
        metadata: EncryptionMetadata,
    ) -> Result<(), DocumentError> {
        self.encryption.set_encryption_metadata(record, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditAction;
    use crate::status::{DocumentStatus, StrictTransitions};

    #[test]
    fn test_full_pipeline() {
        let policy = Arc::new(DocumentPolicy::default());
        let engine = GovernanceEngine::new(Arc::clone(&policy));
        let mut record = engine
            .create_document("E1", "CPF", "cpf.pdf", "application/pdf", 1024)
            .unwrap();
        engine.update_status(&mut record, "processing", "upload").unwrap();
        let md = EncryptionMetadata::attest("k1", "aXY=", "1", &policy).unwrap();
        engine.set_encryption_metadata(&mut record, md).unwrap();
        engine.update_status(&mut record, "completed", "stored").unwrap();

        let actions: Vec<_> = record.audit_trail().iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                AuditAction::Create,
                AuditAction::StatusUpdate,
                AuditAction::Encryption,
                AuditAction::StatusUpdate,
            ]
        );
        assert_eq!(record.audit_trail().entries()[2].status, DocumentStatus::Processing);
        assert!(record.verify_invariants(engine.policy()).is_ok());
        assert_eq!(
            engine.retention().compute_retention_date(record.created_at()).unwrap(),
            record.retention_date()
        );
    }

    #[test]
    fn test_strict_engine_rejects_out_of_order() {
        let engine = GovernanceEngine::with_transitions(
            Arc::new(DocumentPolicy::default()),
            StrictTransitions,
        );
        let mut record = engine
            .create_document("E1", "CPF", "cpf.pdf", "application/pdf", 1024)
            .unwrap();
        assert!(engine.update_status(&mut record, "completed", "skip").is_err());
        assert_eq!(record.audit_trail().len(), 1);
    }
}
