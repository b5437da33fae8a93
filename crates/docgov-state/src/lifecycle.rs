//! # Lifecycle Controller
//!
//! Applies status changes to document records. Every accepted change
//! advances `updated_at`, stamps `processed_at` the first time the record
//! reaches `Completed`, and appends one `STATUS_UPDATE` entry. A rejected
//! change leaves the record untouched.
//!
//! Which changes are accepted is decided by the controller's
//! [`TransitionPolicy`]. The default, [`PermissiveTransitions`], accepts
//! every status in the closed set from every status.

use tracing::{debug, warn};

use crate::audit::{AuditAction, SYSTEM_ACTOR};
use crate::error::DocumentError;
use crate::record::DocumentRecord;
use crate::status::{DocumentStatus, PermissiveTransitions, TransitionPolicy};

/// Drives document status changes under a transition policy.
#[derive(Debug, Clone, Default)]
pub struct LifecycleController<P: TransitionPolicy = PermissiveTransitions> {
    transitions: P,
}

impl LifecycleController {
    /// Controller with the permissive transition policy.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: TransitionPolicy> LifecycleController<P> {
    pub fn with_policy(transitions: P) -> Self {
        Self { transitions }
    }

    /// Parse `new_status` and apply it.
    pub fn update_status(
        &self,
        record: &mut DocumentRecord,
        new_status: &str,
        reason: &str,
    ) -> Result<(), DocumentError> {
        match new_status.parse::<DocumentStatus>() {
            Ok(status) => self.transition(record, status, reason),
            Err(err) => {
                warn!(
                    document = ?record.id,
                    requested = new_status,
                    error = %err,
                    "status update rejected"
                );
                Err(err)
            }
        }
    }

    /// Apply an already-typed status.
    pub fn transition(
        &self,
        record: &mut DocumentRecord,
        status: DocumentStatus,
        reason: &str,
    ) -> Result<(), DocumentError> {
        let from = record.status();
        if let Err(err) = self.transitions.check(from, status) {
            warn!(
                document = ?record.id,
                %from,
                to = %status,
                error = %err,
                "status transition rejected"
            );
            return Err(err);
        }

        let now = record.next_stamp();
        record.apply_status(status, now);
        record.append_audit(now, AuditAction::StatusUpdate, reason, SYSTEM_ACTOR);
        debug!(document = ?record.id, %from, to = %status, reason, "status updated");
        Ok(())
    }
}
