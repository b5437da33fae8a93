//! # Governance Properties
//!
//! Property tests over arbitrary submissions and operation sequences.

use std::sync::Arc;

use proptest::prelude::*;

use docgov_core::{DocumentPolicy, Timestamp};
use docgov_state::{DocumentStatus, EncryptionMetadata, GovernanceEngine, RetentionCalculator};

fn engine() -> GovernanceEngine {
    GovernanceEngine::new(Arc::new(DocumentPolicy::default()))
}

#[derive(Debug, Clone)]
enum Op {
    Status(String),
    Encrypt(String),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::sample::select(vec![
            "pending",
            "processing",
            "validating",
            "encrypting",
            "completed",
            "failed",
            "bogus",
            "Completed",
        ])
        .prop_map(|s| Op::Status(s.to_string())),
        prop::sample::select(vec!["AES-256-GCM", "AES-128-CBC", ""])
            .prop_map(|s| Op::Encrypt(s.to_string())),
    ]
}

proptest! {
    /// Any size above the maximum is rejected; any size up to it is accepted.
    #[test]
    fn size_limit_is_exact(size in any::<u64>()) {
        let max = DocumentPolicy::default().max_document_size_bytes;
        let result = engine().create_document("E1", "CPF", "cpf.pdf", "application/pdf", size);
        if size > max {
            prop_assert_eq!(result.unwrap_err().kind(), "INVALID_SIZE");
        } else {
            prop_assert!(result.is_ok());
        }
    }

    /// Only the six lowercase wire names parse.
    #[test]
    fn only_wire_names_parse(s in "[a-zA-Z]{0,12}") {
        let known = DocumentStatus::all().iter().any(|st| st.as_str() == s);
        prop_assert_eq!(s.parse::<DocumentStatus>().is_ok(), known);
    }

    /// Audit trails only grow, one entry per successful mutation, and a
    /// failed operation changes nothing.
    #[test]
    fn audit_trail_is_append_only(ops in prop::collection::vec(op_strategy(), 0..24)) {
        let engine = engine();
        let mut record = engine
            .create_document("E1", "CPF", "cpf.pdf", "application/pdf", 1024)
            .unwrap();

        for op in ops {
            let before = record.clone();
            let result = match op {
                Op::Status(s) => engine.update_status(&mut record, &s, "step"),
                Op::Encrypt(alg) => {
                    let mut md =
                        EncryptionMetadata::attest("k1", "aXY=", "1", engine.policy()).unwrap();
                    md.algorithm = alg;
                    engine.set_encryption_metadata(&mut record, md)
                }
            };
            match result {
                Ok(()) => {
                    prop_assert_eq!(record.audit_trail().len(), before.audit_trail().len() + 1);
                    prop_assert!(record.audit_trail().extends(before.audit_trail()));
                    prop_assert!(record.updated_at() >= before.updated_at());
                }
                Err(_) => prop_assert_eq!(&record, &before),
            }
        }

        let entries = record.audit_trail().entries();
        prop_assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        prop_assert!(record.verify_invariants(engine.policy()).is_ok());
    }

    /// Retention keeps the time of day and lands in the target year.
    #[test]
    fn retention_lands_in_target_year(secs in 0i64..4_102_444_800, years in 1u32..50) {
        let created = Timestamp::from_epoch_secs(secs).unwrap();
        let due = RetentionCalculator::new(years).compute_retention_date(created).unwrap();
        prop_assert!(due > created);
        prop_assert_eq!(due.epoch_secs().rem_euclid(86_400), secs.rem_euclid(86_400));
        let created_year: i64 = created.to_iso8601()[..4].parse().unwrap();
        let due_year: i64 = due.to_iso8601()[..4].parse().unwrap();
        prop_assert_eq!(due_year, created_year + i64::from(years));
    }
}
