//! # docgov-core: Foundational Types for Document Governance
//!
//! Leaf crate of the workspace. Defines the primitives every document
//! record is built from; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `DocumentId` and `EnrollmentId`
//!    cannot be confused with each other or with free strings.
//!
//! 2. **UTC-only timestamps.** `Timestamp` is UTC with seconds precision and
//!    does calendar-year arithmetic for retention deadlines.
//!
//! 3. **Tagged digests.** `ContentDigest` always carries its algorithm and
//!    renders as `sha256:<hex>`. Structured values are hashed only through
//!    `CanonicalBytes`.
//!
//! 4. **Policy as a value.** `DocumentPolicy` is loaded once, validated, and
//!    passed explicitly to the engine.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `docgov-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod policy;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, DocgovError};
pub use identity::{DocumentId, EnrollmentId};
pub use policy::DocumentPolicy;
pub use temporal::Timestamp;
