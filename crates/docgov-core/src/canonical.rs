//! # Canonical Serialization: JCS-Compatible Byte Production
//!
//! Defines `CanonicalBytes`, the only input accepted by
//! [`crate::digest::sha256_digest`]. Audit trail fingerprints are computed
//! over these bytes, so two processes that hold the same trail always agree
//! on its digest regardless of field order or whitespace in the persisted
//! JSON.
//!
//! ## Rules
//!
//! 1. **Reject floats.** Non-integer numbers have no deterministic
//!    RFC 8785 rendering across implementations.
//! 2. **Timestamps** are already normalized by [`crate::Timestamp`]'s
//!    `Serialize` impl (UTC, `Z` suffix, seconds precision).
//! 3. Output is RFC 8785 (JSON Canonicalization Scheme) via `serde_jcs`:
//!    sorted keys, compact separators.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// The inner `Vec<u8>` is private; [`CanonicalBytes::new`] is the only
/// constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains a
    /// non-integer number, or `SerializationFailed` if JSON serialization
    /// fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let bytes = serde_jcs::to_vec(&value)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Ok(())
            } else {
                Err(CanonicalizationError::FloatRejected(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        Value::Array(items) => items.iter().try_for_each(reject_floats),
        Value::Object(map) => map.values().try_for_each(reject_floats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_sorted_and_compact() {
        let cb = CanonicalBytes::new(&json!({"b": 2, "a": {"d": 1, "c": "x"}})).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"a":{"c":"x","d":1},"b":2}"#);
    }

    #[test]
    fn test_float_rejected_at_any_depth() {
        let result = CanonicalBytes::new(&json!({"entries": [{"size": 1.5}]}));
        assert!(matches!(result, Err(CanonicalizationError::FloatRejected(_))));
    }

    #[test]
    fn test_integers_and_nulls_accepted() {
        let cb = CanonicalBytes::new(&json!({"n": -3, "u": 104857600u64, "z": null})).unwrap();
        assert!(!cb.is_empty());
    }

    #[test]
    fn test_field_order_does_not_matter() {
        #[derive(Serialize)]
        struct Ab {
            a: u8,
            b: u8,
        }
        #[derive(Serialize)]
        struct Ba {
            b: u8,
            a: u8,
        }
        let x = CanonicalBytes::new(&Ab { a: 1, b: 2 }).unwrap();
        let y = CanonicalBytes::new(&Ba { b: 2, a: 1 }).unwrap();
        assert_eq!(x, y);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Canonical bytes always parse back as JSON.
        #[test]
        fn canonical_bytes_valid_json(
            map in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..8)
        ) {
            let cb = CanonicalBytes::new(&map).unwrap();
            let parsed: Result<Value, _> = serde_json::from_slice(cb.as_bytes());
            prop_assert!(parsed.is_ok());
        }

        /// Canonicalization is deterministic.
        #[test]
        fn canonical_bytes_deterministic(s in "[a-zA-Z0-9 ]{0,40}", n in any::<i64>()) {
            let value = serde_json::json!({"reason": s, "n": n});
            prop_assert_eq!(
                CanonicalBytes::new(&value).unwrap(),
                CanonicalBytes::new(&value).unwrap()
            );
        }
    }
}
