//! # Document Record
//!
//! The governed unit: identity, classification, processing status,
//! encryption attestation, retention deadline, and audit trail of one
//! enrollment document.
//!
//! Identity and governance fields are private and change only through the
//! engine's operations, each of which advances `updated_at` and appends one
//! audit entry. `id`, `storage_path`, and `content_hash` belong to the
//! owning service and storage collaborator and are public.
//!
//! ## Serialized form
//!
//! Field names are snake_case. Every field is always present (absent
//! optionals as `null`) except `content_hash`, which is omitted when unset.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use docgov_core::{ContentDigest, DocumentId, DocumentPolicy, EnrollmentId, Timestamp};

use crate::audit::{AuditAction, AuditTrail};
use crate::encryption::{EncryptionMetadata, EncryptionMetadataValidator};
use crate::error::DocumentError;
use crate::retention::RetentionCalculator;
use crate::status::DocumentStatus;

/// One enrollment document under governance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Assigned by the owning service after creation.
    pub id: Option<DocumentId>,
    enrollment_id: EnrollmentId,
    document_type: String,
    filename: String,
    content_type: String,
    size_bytes: u64,
    status: DocumentStatus,
    /// Location of the encrypted blob, set by the storage collaborator.
    pub storage_path: Option<String>,
    /// Digest of the stored bytes, set by the storage collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<ContentDigest>,
    encryption_metadata: Option<EncryptionMetadata>,
    created_at: Timestamp,
    updated_at: Timestamp,
    processed_at: Option<Timestamp>,
    retention_date: Timestamp,
    audit_trail: AuditTrail,
}

impl DocumentRecord {
    /// Fresh `Pending` record with no audit entries. The factory appends
    /// the `CREATE` entry.
    pub(crate) fn new(
        enrollment_id: EnrollmentId,
        document_type: String,
        filename: String,
        content_type: String,
        size_bytes: u64,
        created_at: Timestamp,
        retention_date: Timestamp,
    ) -> Self {
        Self {
            id: None,
            enrollment_id,
            document_type,
            filename,
            content_type,
            size_bytes,
            status: DocumentStatus::Pending,
            storage_path: None,
            content_hash: None,
            encryption_metadata: None,
            created_at,
            updated_at: created_at,
            processed_at: None,
            retention_date,
            audit_trail: AuditTrail::new(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn enrollment_id(&self) -> &EnrollmentId {
        &self.enrollment_id
    }

    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn encryption_metadata(&self) -> Option<&EncryptionMetadata> {
        self.encryption_metadata.as_ref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// First time the record reached `Completed`, if ever.
    pub fn processed_at(&self) -> Option<Timestamp> {
        self.processed_at
    }

    pub fn retention_date(&self) -> Timestamp {
        self.retention_date
    }

    pub fn audit_trail(&self) -> &AuditTrail {
        &self.audit_trail
    }

    // ── Engine mutations ─────────────────────────────────────────────

    pub(crate) fn append_audit(
        &mut self,
        at: Timestamp,
        action: AuditAction,
        reason: &str,
        actor: &str,
    ) {
        self.audit_trail.append(at, action, self.status, reason, actor);
    }

    pub(crate) fn apply_status(&mut self, status: DocumentStatus, now: Timestamp) {
        self.status = status;
        self.updated_at = now;
        if status == DocumentStatus::Completed && self.processed_at.is_none() {
            self.processed_at = Some(now);
        }
    }

    pub(crate) fn apply_encryption(&mut self, metadata: EncryptionMetadata, now: Timestamp) {
        self.encryption_metadata = Some(metadata);
        self.updated_at = now;
    }

    // ── Collaborator operations ──────────────────────────────────────

    /// Record where the storage collaborator put the encrypted blob and the
    /// digest of the stored bytes.
    ///
    /// Storage is not a governance mutation: no audit entry is appended and
    /// `updated_at` is left alone.
    pub fn attach_storage(
        &mut self,
        storage_path: impl Into<String>,
        content_hash: ContentDigest,
    ) -> Result<(), DocumentError> {
        let storage_path = storage_path.into();
        if storage_path.trim().is_empty() {
            return Err(DocumentError::MissingField { field: "storage_path" });
        }
        self.storage_path = Some(storage_path);
        self.content_hash = Some(content_hash);
        Ok(())
    }

    /// Check `content` against the recorded digest.
    pub fn verify_content(&self, content: &[u8]) -> Result<(), DocumentError> {
        let expected = self
            .content_hash
            .as_ref()
            .ok_or(DocumentError::MissingField { field: "content_hash" })?;
        let actual = ContentDigest::of_bytes(content);
        if &actual != expected {
            warn!(document = ?self.id, %expected, %actual, "content hash mismatch");
            return Err(DocumentError::IntegrityMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }

    /// Log a hand-out of the document to `actor`.
    ///
    /// Only completed, encrypted documents are retrievable. A successful
    /// retrieval appends one `RETRIEVE` entry; the record is otherwise
    /// unchanged.
    pub fn record_retrieval(&mut self, actor: &str) -> Result<(), DocumentError> {
        if actor.trim().is_empty() {
            return Err(DocumentError::MissingField { field: "performed_by" });
        }
        if self.status != DocumentStatus::Completed {
            return Err(DocumentError::NotRetrievable {
                reason: format!("status is {}", self.status),
            });
        }
        if self.encryption_metadata.is_none() {
            return Err(DocumentError::NotRetrievable {
                reason: "no encryption metadata".into(),
            });
        }
        let now = self.next_stamp();
        self.append_audit(now, AuditAction::Retrieve, "Document retrieved", actor);
        debug!(document = ?self.id, actor, "document retrieved");
        Ok(())
    }

    /// Whether the retention deadline has been reached at `now`.
    pub fn is_retention_expired(&self, now: Timestamp) -> bool {
        self.retention_date <= now
    }

    /// Re-check the record invariants against `policy`, for records loaded
    /// from persistence.
    ///
    /// A record created under an older, looser policy fails here if the
    /// policy has since tightened.
    pub fn verify_invariants(&self, policy: &DocumentPolicy) -> Result<(), DocumentError> {
        let corrupt = |msg: String| Err(DocumentError::CorruptRecord(msg));

        if self.enrollment_id.as_str().trim().is_empty()
            || self.document_type.trim().is_empty()
            || self.filename.trim().is_empty()
        {
            return corrupt("identity field is blank".into());
        }
        if self.size_bytes > policy.max_document_size_bytes {
            return corrupt(format!(
                "size {} exceeds maximum {}",
                self.size_bytes, policy.max_document_size_bytes
            ));
        }
        if !policy.allows_content_type(&self.content_type) {
            return corrupt(format!("content type {:?} not allowed", self.content_type));
        }
        if self.updated_at < self.created_at {
            return corrupt("updated_at precedes created_at".into());
        }

        let expected = RetentionCalculator::from_policy(policy)
            .compute_retention_date(self.created_at)?;
        if self.retention_date != expected {
            return corrupt(format!(
                "retention_date {} does not match expected {expected}",
                self.retention_date
            ));
        }

        let opens_with_create = self.audit_trail.entries().first().is_some_and(|first| {
            first.action == AuditAction::Create && first.status == DocumentStatus::Pending
        });
        if !opens_with_create {
            return corrupt("audit trail does not begin with a CREATE entry".into());
        }
        let ordered = self
            .audit_trail
            .entries()
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp);
        if !ordered {
            return corrupt("audit trail timestamps are out of order".into());
        }

        if let Some(metadata) = &self.encryption_metadata {
            EncryptionMetadataValidator::from_policy(policy)
                .check_fields(metadata)
                .map_err(|e| DocumentError::CorruptRecord(format!("encryption metadata: {e}")))?;
        }
        Ok(())
    }

    /// Stamp for the next mutation: the current time, but never earlier
    /// than the newest audit entry.
    pub(crate) fn next_stamp(&self) -> Timestamp {
        let floor = self
            .audit_trail
            .last()
            .map(|entry| entry.timestamp)
            .unwrap_or(self.created_at);
        Timestamp::now().max(floor)
    }
}
