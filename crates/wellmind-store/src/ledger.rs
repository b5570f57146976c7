//! Simulated audit-ledger receipts.
//!
//! A receipt is `0.0.<id>-<first 8 hex chars of sha256>` over the canonical
//! JSON of the record (object keys sorted). It proves nothing on its own; it
//! gives the dashboard a stable per-record identifier.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Record id used when the record carries none.
const PLACEHOLDER_ID: u64 = 9999;

/// SHA-256 of the canonical JSON encoding, as lowercase hex.
pub fn record_hash(record: &Value) -> String {
    // serde_json's default map is ordered by key, so this is canonical.
    let canonical = record.to_string();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn receipt(record: &Value) -> String {
    let id = record.get("id").and_then(Value::as_u64).unwrap_or(PLACEHOLDER_ID);
    let hash = record_hash(record);
    format!("0.0.{}-{}", id, &hash[..8])
}

/// Receipt for any serializable record.
pub fn receipt_for<T: Serialize>(record: &T) -> Result<String, serde_json::Error> {
    Ok(receipt(&serde_json::to_value(record)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_receipt_uses_record_id() {
        let r = receipt(&json!({"id": 12, "risk_score": 86}));
        assert!(r.starts_with("0.0.12-"));
        assert_eq!(r.len(), "0.0.12-".len() + 8);
    }

    #[test]
    fn test_receipt_without_id_uses_placeholder() {
        let r = receipt(&json!({"name": "Jane", "risk": "High", "score": 86}));
        assert!(r.starts_with("0.0.9999-"));
    }

    #[test]
    fn test_hash_ignores_key_order() {
        let a: Value = serde_json::from_str(r#"{"score": 86, "name": "Jane"}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"name": "Jane", "score": 86}"#).unwrap();
        assert_eq!(record_hash(&a), record_hash(&b));
    }

    #[test]
    fn test_hash_changes_with_content() {
        assert_ne!(
            record_hash(&json!({"score": 86})),
            record_hash(&json!({"score": 87}))
        );
    }
}
