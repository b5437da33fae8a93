//! # Encryption Metadata
//!
//! The governance engine never sees plaintext or key material. The storage
//! collaborator encrypts, then attests what it did with an
//! [`EncryptionMetadata`] value. [`EncryptionMetadataValidator`] accepts
//! the attestation only when:
//!
//! 1. `key_id`, `algorithm`, `iv`, and `key_version` are non-blank,
//! 2. `algorithm` equals the approved identifier exactly,
//! 3. `key_rotation_due` is strictly after the validation instant.
//!
//! Checks run in that order and the first failure is reported.
//!
//! Staleness is judged at attestation time only. A deadline that passes
//! later does not invalidate stored metadata; use
//! [`EncryptionMetadata::rotation_overdue_at`] to find keys due for rotation.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use docgov_core::{DocumentPolicy, Timestamp};

use crate::audit::{AuditAction, SYSTEM_ACTOR};
use crate::error::DocumentError;
use crate::record::DocumentRecord;

/// Attestation of how a document's content was encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionMetadata {
    /// Reference to the key in the external key store.
    pub key_id: String,
    /// Cipher identifier, e.g. `AES-256-GCM`.
    pub algorithm: String,
    /// Initialization vector, as encoded by the storage collaborator.
    pub iv: String,
    /// Key version at encryption time, as named by the key store.
    pub key_version: String,
    /// When encryption happened.
    pub encrypted_at: Timestamp,
    /// When the key must be rotated.
    pub key_rotation_due: Timestamp,
}

impl EncryptionMetadata {
    /// Build metadata for an encryption that happened now, with the
    /// approved algorithm and a rotation deadline one policy interval away.
    pub fn attest(
        key_id: impl Into<String>,
        iv: impl Into<String>,
        key_version: impl Into<String>,
        policy: &DocumentPolicy,
    ) -> Result<Self, DocumentError> {
        Self::attest_at(key_id, iv, key_version, policy, Timestamp::now())
    }

    /// [`EncryptionMetadata::attest`] with an explicit encryption instant.
    pub fn attest_at(
        key_id: impl Into<String>,
        iv: impl Into<String>,
        key_version: impl Into<String>,
        policy: &DocumentPolicy,
        encrypted_at: Timestamp,
    ) -> Result<Self, DocumentError> {
        let key_rotation_due = encrypted_at
            .add_hours(policy.key_rotation_interval_hours)
            .map_err(|e| DocumentError::DeadlineOverflow(e.to_string()))?;
        Ok(Self {
            key_id: key_id.into(),
            algorithm: policy.approved_algorithm.clone(),
            iv: iv.into(),
            key_version: key_version.into(),
            encrypted_at,
            key_rotation_due,
        })
    }

    /// Whether the rotation deadline has been reached at `now`.
    pub fn rotation_overdue_at(&self, now: Timestamp) -> bool {
        self.key_rotation_due <= now
    }
}

/// Validates encryption attestations and attaches them to records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionMetadataValidator {
    approved_algorithm: String,
}

impl EncryptionMetadataValidator {
    pub fn new(approved_algorithm: impl Into<String>) -> Self {
        Self {
            approved_algorithm: approved_algorithm.into(),
        }
    }

    pub fn from_policy(policy: &DocumentPolicy) -> Self {
        Self::new(policy.approved_algorithm.clone())
    }

    pub fn approved_algorithm(&self) -> &str {
        &self.approved_algorithm
    }

    /// Validate against the current time.
    pub fn validate(&self, metadata: &EncryptionMetadata) -> Result<(), DocumentError> {
        self.validate_at(metadata, Timestamp::now())
    }

    /// Validate against `now`.
    pub fn validate_at(
        &self,
        metadata: &EncryptionMetadata,
        now: Timestamp,
    ) -> Result<(), DocumentError> {
        self.check_fields(metadata)?;
        if metadata.key_rotation_due <= now {
            return Err(DocumentError::StaleRotationSchedule {
                due: metadata.key_rotation_due,
                now,
            });
        }
        Ok(())
    }

    /// Field and algorithm checks, without the time-dependent deadline check.
    pub(crate) fn check_fields(&self, metadata: &EncryptionMetadata) -> Result<(), DocumentError> {
        for (field, value) in [
            ("key_id", &metadata.key_id),
            ("algorithm", &metadata.algorithm),
            ("iv", &metadata.iv),
            ("key_version", &metadata.key_version),
        ] {
            if value.trim().is_empty() {
                return Err(DocumentError::MissingField { field });
            }
        }
        if metadata.algorithm != self.approved_algorithm {
            return Err(DocumentError::UnsupportedAlgorithm {
                algorithm: metadata.algorithm.clone(),
                approved: self.approved_algorithm.clone(),
            });
        }
        Ok(())
    }

    /// Validate `metadata` and attach it to `record`.
    ///
    /// On success the record's metadata is replaced, `updated_at` advances,
    /// and one `ENCRYPTION` entry is appended with the current status. On
    /// failure the record is unchanged.
    ///
    /// The rotation deadline is judged at the instant the entry is stamped,
    /// so it always falls after its own `ENCRYPTION` entry.
    pub fn set_encryption_metadata(
        &self,
        record: &mut DocumentRecord,
        metadata: EncryptionMetadata,
    ) -> Result<(), DocumentError> {
        let now = record.next_stamp();
        if let Err(err) = self.validate_at(&metadata, now) {
            warn!(
                document = ?record.id,
                algorithm = %metadata.algorithm,
                error = %err,
                "encryption metadata rejected"
            );
            return Err(err);
        }

        let key_id = metadata.key_id.clone();
        record.apply_encryption(metadata, now);
        record.append_audit(
            now,
            AuditAction::Encryption,
            "Encryption metadata updated",
            SYSTEM_ACTOR,
        );
        debug!(
            document = ?record.id,
            key_id = %key_id,
            status = %record.status(),
            "encryption metadata attached"
        );
        Ok(())
    }
}
