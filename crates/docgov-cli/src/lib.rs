//! # docgov-cli: Reference Owning Service
//!
//! The `docgov` command line drives the governance engine over records kept
//! as JSON files in a local state directory. It plays the owning service:
//! it assigns document ids, persists records, and stands in for the storage
//! and encryption collaborators by attaching their attestations.
//!
//! ## Subcommands
//!
//! - `docgov policy show`: print the effective policy.
//! - `docgov document ...`: create, status, encrypt, store, show, verify, retrieve.
//! - `docgov retention scan`: list records past retention or key rotation.
//!
//! Handlers delegate every governance decision to `docgov-state`.

pub mod document;
pub mod policy;
pub mod retention;
pub mod store;

use std::path::PathBuf;
use std::sync::Arc;

use docgov_core::DocumentPolicy;

/// Default record directory, relative to the working directory.
pub const DEFAULT_STATE_DIR: &str = ".docgov/documents";

/// Settings shared by every handler.
#[derive(Debug, Clone)]
pub struct CliContext {
    /// Effective, validated policy.
    pub policy: Arc<DocumentPolicy>,
    /// Directory holding `<id>.json` record files.
    pub state_dir: PathBuf,
}

impl CliContext {
    pub fn new(policy: DocumentPolicy, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            policy: Arc::new(policy),
            state_dir: state_dir.into(),
        }
    }
}
