//! # Audit Trail
//!
//! Every mutation of a document record appends exactly one entry to the
//! record's trail. The trail is append-only: nothing outside this crate can
//! push, and nothing inside it edits or removes an entry.
//!
//! Entry timestamps are assigned by the mutating operation from the same
//! clock reading it uses for `updated_at`, so entries appear in
//! non-decreasing time order.

use serde::{Deserialize, Serialize};

use docgov_core::{sha256_digest, CanonicalBytes, CanonicalizationError, ContentDigest, Timestamp};

use crate::status::DocumentStatus;

/// Actor recorded for engine-initiated mutations.
pub const SYSTEM_ACTOR: &str = "SYSTEM";

/// Kind of mutation an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Record creation.
    Create,
    /// Status change.
    StatusUpdate,
    /// Encryption metadata attestation.
    Encryption,
    /// Document handed out to a caller.
    Retrieve,
}

impl AuditAction {
    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::StatusUpdate => "STATUS_UPDATE",
            Self::Encryption => "ENCRYPTION",
            Self::Retrieve => "RETRIEVE",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the mutation happened.
    pub timestamp: Timestamp,
    /// What kind of mutation.
    pub action: AuditAction,
    /// Record status after the mutation.
    pub status: DocumentStatus,
    /// Human-readable reason.
    pub reason: String,
    /// Who performed the mutation.
    pub performed_by: String,
}

/// Append-only, time-ordered list of audit entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditTrail(Vec<AuditEntry>);

impl AuditTrail {
    pub(crate) fn new() -> Self {
        Self(Vec::new())
    }

    /// Append one entry stamped at `at`.
    pub(crate) fn append(
        &mut self,
        at: Timestamp,
        action: AuditAction,
        status: DocumentStatus,
        reason: impl Into<String>,
        performed_by: impl Into<String>,
    ) {
        self.0.push(AuditEntry {
            timestamp: at,
            action,
            status,
            reason: reason.into(),
            performed_by: performed_by.into(),
        });
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AuditEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<&AuditEntry> {
        self.0.last()
    }

    /// Whether `self` equals `earlier` with zero or more entries appended.
    pub fn extends(&self, earlier: &AuditTrail) -> bool {
        self.0.len() >= earlier.0.len() && self.0[..earlier.0.len()] == earlier.0[..]
    }

    /// SHA-256 over the canonical JSON of the whole trail.
    ///
    /// Two trails have the same fingerprint exactly when they hold the same
    /// entries in the same order.
    pub fn fingerprint(&self) -> Result<ContentDigest, CanonicalizationError> {
        let canonical = CanonicalBytes::new(&self.0)?;
        Ok(sha256_digest(&canonical))
    }
}

impl<'a> IntoIterator for &'a AuditTrail {
    type Item = &'a AuditEntry;
    type IntoIter = std::slice::Iter<'a, AuditEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
