//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers attached to a document record.
//! You cannot pass an `EnrollmentId` where a `DocumentId` is expected.
//!
//! Document ids are opaque and assigned by the owning service; the engine
//! never generates one on its own. [`DocumentId::generate`] exists for
//! owning services that want UUID v4 ids.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DocgovError;

/// Opaque identifier of a stored document, assigned by the owning service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

/// Identifier of the enrollment a document belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentId(String);

impl DocumentId {
    /// Wrap an owning-service identifier. Blank values are rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, DocgovError> {
        non_blank("document_id", id.into()).map(Self)
    }

    /// Generate a random UUID v4 identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl EnrollmentId {
    /// Wrap an enrollment identifier. Blank values are rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, DocgovError> {
        non_blank("enrollment_id", id.into()).map(Self)
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn non_blank(kind: &'static str, value: String) -> Result<String, DocgovError> {
    if value.trim().is_empty() {
        return Err(DocgovError::InvalidIdentifier {
            kind,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_ids_rejected() {
        assert!(DocumentId::new("").is_err());
        assert!(DocumentId::new("   ").is_err());
        assert!(EnrollmentId::new("").is_err());
    }

    #[test]
    fn test_generated_ids_are_unique_uuids() {
        let a = DocumentId::generate();
        let b = DocumentId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = EnrollmentId::new("enr-1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"enr-1\"");
        let back: EnrollmentId = serde_json::from_str("\"enr-1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_display() {
        assert_eq!(DocumentId::new("doc-9").unwrap().to_string(), "doc-9");
    }
}
