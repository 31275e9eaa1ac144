//! Manifest Fingerprints
//!
//! A fingerprint is the SHA-256 of the manifest tree rendered as canonical
//! JSON: object keys sorted at every depth, no whitespace. Subnet and
//! certificate lists keep their order, since order is meaningful there.

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Render any manifest node as canonical JSON.
pub fn canonical_json<T: Serialize>(node: &T) -> Result<String, serde_json::Error> {
    let mut tree = serde_json::to_value(node)?;
    sort_keys(&mut tree);
    serde_json::to_string(&tree)
}

fn sort_keys(tree: &mut Value) {
    match tree {
        Value::Object(fields) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(fields).into_iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
            for (_, child) in entries.iter_mut() {
                sort_keys(child);
            }
            *fields = entries.into_iter().collect::<Map<String, Value>>();
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

/// Hex SHA-256 of a manifest tree, independent of key order in the source file.
pub fn compute_manifest_hash<T: Serialize>(manifest: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(manifest)?;
    Ok(hex::encode(Sha256::digest(canonical.as_bytes())))
}
