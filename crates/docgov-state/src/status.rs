//! # Document Status and Transition Policy
//!
//! The closed status vocabulary of a document record and the single
//! decision point that judges whether a status change is legal.
//!
//! ## States
//!
//! ```text
//! Pending ─▶ Processing ─▶ Validating ─▶ Encrypting ─▶ Completed
//!    │            │             │             │
//!    └────────────┴─────────────┴─────────────┴──────▶ Failed
//! ```
//!
//! The diagram is the conventional pipeline order, not an enforced one.
//! [`PermissiveTransitions`] (the default) accepts any status from any
//! status, including `Completed -> Pending`, and only membership in the
//! closed set is checked. [`StrictTransitions`] enforces the table below
//! for deployments that want ordering:
//!
//! | From | Allowed targets |
//! |------|-----------------|
//! | Pending | Pending, Processing, Validating, Failed |
//! | Processing | Processing, Validating, Encrypting, Completed, Failed |
//! | Validating | Validating, Processing, Encrypting, Completed, Failed |
//! | Encrypting | Encrypting, Processing, Completed, Failed |
//! | Completed | (none) |
//! | Failed | Pending |

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

// ─── Document Status ─────────────────────────────────────────────────

/// Processing status of a document. Serialized in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Created, no processing started.
    Pending,
    /// Upstream processing (upload, OCR) in progress.
    Processing,
    /// Content validation in progress.
    Validating,
    /// Encryption in progress.
    Encrypting,
    /// All processing finished.
    Completed,
    /// Processing failed.
    Failed,
}

impl DocumentStatus {
    /// All statuses in pipeline order.
    pub fn all() -> &'static [DocumentStatus] {
        &[
            Self::Pending,
            Self::Processing,
            Self::Validating,
            Self::Encrypting,
            Self::Completed,
            Self::Failed,
        ]
    }

    /// The lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Validating => "validating",
            Self::Encrypting => "encrypting",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether processing has ended, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Validating => "VALIDATING",
            Self::Encrypting => "ENCRYPTING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

impl FromStr for DocumentStatus {
    type Err = DocumentError;

    /// Parse the lowercase wire name. Matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DocumentError::InvalidStatus {
                status: s.to_string(),
            })
    }
}

// ─── Transition Policy ───────────────────────────────────────────────

/// Decides whether a status change is legal.
///
/// [`crate::LifecycleController`] consults exactly one policy before every
/// status change, so swapping the policy changes the rules for every caller.
pub trait TransitionPolicy: std::fmt::Debug + Send + Sync {
    /// Accept or reject `from -> to`.
    fn check(&self, from: DocumentStatus, to: DocumentStatus) -> Result<(), DocumentError>;
}

/// Accepts every transition within the closed status set.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveTransitions;

impl TransitionPolicy for PermissiveTransitions {
    fn check(&self, _from: DocumentStatus, _to: DocumentStatus) -> Result<(), DocumentError> {
        Ok(())
    }
}

/// Enforces the pipeline ordering table in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictTransitions;

impl StrictTransitions {
    /// Statuses reachable from `from`.
    pub fn allowed_targets(from: DocumentStatus) -> &'static [DocumentStatus] {
        use DocumentStatus::*;
        match from {
            Pending => &[Pending, Processing, Validating, Failed],
            Processing => &[Processing, Validating, Encrypting, Completed, Failed],
            Validating => &[Validating, Processing, Encrypting, Completed, Failed],
            Encrypting => &[Encrypting, Processing, Completed, Failed],
            Completed => &[],
            Failed => &[Pending],
        }
    }
}

impl TransitionPolicy for StrictTransitions {
    fn check(&self, from: DocumentStatus, to: DocumentStatus) -> Result<(), DocumentError> {
        if Self::allowed_targets(from).contains(&to) {
            Ok(())
        } else {
            Err(DocumentError::InvalidTransition { from, to })
        }
    }
}
