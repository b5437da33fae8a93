//! # docgov-state: Enrollment Document Governance
//!
//! Governs the lifecycle of enrollment documents (identity documents,
//! proofs of residence, health declarations) without touching their bytes.
//! Storage, encryption, and key management live in external collaborators;
//! this crate records what they did and enforces the policy around it.
//!
//! ## Components
//!
//! | Component | Module | Responsibility |
//! |-----------|--------|----------------|
//! | [`RecordFactory`] | `factory` | Validate a submission, build a `Pending` record |
//! | [`LifecycleController`] | `lifecycle` | Apply status changes under a [`TransitionPolicy`] |
//! | [`EncryptionMetadataValidator`] | `encryption` | Validate and attach encryption attestations |
//! | [`AuditTrail`] | `audit` | Append-only, time-ordered mutation log |
//! | [`RetentionCalculator`] | `retention` | Retention deadlines and expiry scans |
//! | [`GovernanceEngine`] | `engine` | The three mutating operations behind one policy |
//!
//! ## Guarantees
//!
//! - Every successful mutation appends exactly one audit entry and advances
//!   `updated_at`. Entries are never edited or removed.
//! - A failed operation leaves the record untouched.
//! - Operations on different records are independent. A single record is
//!   mutated through `&mut`, so concurrent writers must serialize outside
//!   this crate.

pub mod audit;
pub mod encryption;
pub mod engine;
pub mod error;
pub mod factory;
pub mod lifecycle;
pub mod record;
pub mod retention;
pub mod status;

pub use audit::{AuditAction, AuditEntry, AuditTrail, SYSTEM_ACTOR};
pub use encryption::{EncryptionMetadata, EncryptionMetadataValidator};
pub use engine::GovernanceEngine;
pub use error::DocumentError;
pub use factory::RecordFactory;
pub use lifecycle::LifecycleController;
pub use record::DocumentRecord;
pub use retention::RetentionCalculator;
pub use status::{DocumentStatus, PermissiveTransitions, StrictTransitions, TransitionPolicy};
