//! # Document Policy: Deployment-Time Governance Constants
//!
//! `DocumentPolicy` carries the four policy constants the governance
//! engine enforces plus the key rotation interval used when attesting
//! encryption:
//!
//! | Key | Default |
//! |-----|---------|
//! | `max_document_size_bytes` | 104857600 (100 MiB) |
//! | `allowed_content_types` | `application/pdf`, `image/jpeg`, `image/png` |
//! | `approved_algorithm` | `AES-256-GCM` |
//! | `retention_years` | 5 |
//! | `key_rotation_interval_hours` | 24 |
//!
//! The policy is loaded once per deployment from YAML, then overridden by
//! `DOC_SERVICE_*` environment variables, then validated. It is handed to
//! the engine as an explicit value; nothing reads it from global state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DocgovError;

/// Maximum accepted document size in the reference policy (100 MiB).
pub const DEFAULT_MAX_DOCUMENT_SIZE_BYTES: u64 = 100 * 1024 * 1024;

/// The single approved cipher in the reference policy.
pub const DEFAULT_APPROVED_ALGORITHM: &str = "AES-256-GCM";

/// Retention horizon in the reference policy.
pub const DEFAULT_RETENTION_YEARS: u32 = 5;

/// Key rotation interval applied when encryption is attested.
pub const DEFAULT_KEY_ROTATION_INTERVAL_HOURS: u32 = 24;

/// MIME types accepted by the reference policy.
pub const DEFAULT_ALLOWED_CONTENT_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/png"];

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "DOC_SERVICE_";

/// Governance policy for enrollment documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentPolicy {
    /// Largest accepted document, in bytes.
    pub max_document_size_bytes: u64,
    /// Exact-match MIME type allow-list.
    pub allowed_content_types: Vec<String>,
    /// The only encryption algorithm identifier accepted on metadata.
    pub approved_algorithm: String,
    /// Whole calendar years a document is retained after creation.
    pub retention_years: u32,
    /// Hours between encryption attestation and the key rotation deadline.
    pub key_rotation_interval_hours: u32,
}

impl Default for DocumentPolicy {
    fn default() -> Self {
        Self {
            max_document_size_bytes: DEFAULT_MAX_DOCUMENT_SIZE_BYTES,
            allowed_content_types: DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            approved_algorithm: DEFAULT_APPROVED_ALGORITHM.to_string(),
            retention_years: DEFAULT_RETENTION_YEARS,
            key_rotation_interval_hours: DEFAULT_KEY_ROTATION_INTERVAL_HOURS,
        }
    }
}

impl DocumentPolicy {
    /// Parse a policy from YAML. Missing keys take their defaults.
    ///
    /// The result is validated.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DocgovError> {
        let policy: Self = serde_yaml::from_str(yaml)
            .map_err(|e| DocgovError::Config(format!("failed to parse policy YAML: {e}")))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Load the effective policy: file (if any), then process environment
    /// overrides, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, DocgovError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Like [`DocumentPolicy::load`] with an injectable environment lookup.
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self, DocgovError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut policy = match path {
            Some(path) => {
                let yaml = std::fs::read_to_string(path)?;
                serde_yaml::from_str(&yaml).map_err(|e| {
                    DocgovError::Config(format!("failed to parse {}: {e}", path.display()))
                })?
            }
            None => Self::default(),
        };
        policy.apply_env_overrides(lookup)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Apply `DOC_SERVICE_*` overrides. `ALLOWED_CONTENT_TYPES` is a
    /// comma-separated list.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), DocgovError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(v) = var("MAX_DOCUMENT_SIZE_BYTES") {
            self.max_document_size_bytes = parse_env("MAX_DOCUMENT_SIZE_BYTES", &v)?;
        }
        if let Some(v) = var("ALLOWED_CONTENT_TYPES") {
            self.allowed_content_types = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = var("APPROVED_ALGORITHM") {
            self.approved_algorithm = v.trim().to_string();
        }
        if let Some(v) = var("RETENTION_YEARS") {
            self.retention_years = parse_env("RETENTION_YEARS", &v)?;
        }
        if let Some(v) = var("KEY_ROTATION_INTERVAL_HOURS") {
            self.key_rotation_interval_hours = parse_env("KEY_ROTATION_INTERVAL_HOURS", &v)?;
        }
        Ok(())
    }

    /// Validate policy constraints.
    pub fn validate(&self) -> Result<(), DocgovError> {
        if self.max_document_size_bytes == 0 {
            return Err(DocgovError::InvalidPolicy(
                "max_document_size_bytes must be > 0".into(),
            ));
        }
        if self.allowed_content_types.is_empty() {
            return Err(DocgovError::InvalidPolicy(
                "allowed_content_types must not be empty".into(),
            ));
        }
        if self.allowed_content_types.iter().any(|t| t.trim().is_empty()) {
            return Err(DocgovError::InvalidPolicy(
                "allowed_content_types must not contain blank entries".into(),
            ));
        }
        if self.approved_algorithm.trim().is_empty() {
            return Err(DocgovError::InvalidPolicy(
                "approved_algorithm must not be empty".into(),
            ));
        }
        if self.retention_years == 0 {
            return Err(DocgovError::InvalidPolicy("retention_years must be > 0".into()));
        }
        if self.key_rotation_interval_hours == 0 {
            return Err(DocgovError::InvalidPolicy(
                "key_rotation_interval_hours must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Whether `content_type` is on the allow-list (exact match).
    pub fn allows_content_type(&self, content_type: &str) -> bool {
        self.allowed_content_types.iter().any(|t| t == content_type)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, DocgovError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        DocgovError::Config(format!("{ENV_PREFIX}{name}={value:?} is not valid: {e}"))
    })
}
