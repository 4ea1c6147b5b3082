//! Changed-fields-only diffing for audit snapshots.
//!
//! Snapshots are JSON objects produced by serializing entity state with
//! `serde_json` — decimals, dates and identifiers already serialize to
//! canonical strings. The differ drops relationship fields and row
//! timestamps, keeps only fields whose value actually changed, and yields
//! nothing for a no-op update (which therefore produces no audit entry).

use serde_json::{Map, Value};

use super::error::AuditError;

/// Field names excluded from every diff: row bookkeeping and relations are
/// not part of the financial trail.
pub const EXCLUDED_FIELDS: &[&str] = &["created_at", "updated_at", "line_items", "payments"];

/// The changed-fields pair recorded on an `update` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    /// Values before the mutation, changed fields only.
    pub old_values: Value,
    /// Values after the mutation, changed fields only.
    pub new_values: Value,
}

/// Computes the changed-fields diff between two entity snapshots.
///
/// Returns `Ok(None)` when nothing (relevant) changed.
///
/// # Errors
///
/// Returns `NonObjectSnapshot` if either snapshot is not a JSON object.
pub fn diff_snapshots(old: &Value, new: &Value) -> Result<Option<ChangeSet>, AuditError> {
    let old_map = old.as_object().ok_or(AuditError::NonObjectSnapshot)?;
    let new_map = new.as_object().ok_or(AuditError::NonObjectSnapshot)?;

    let mut changed_old = Map::new();
    let mut changed_new = Map::new();

    for (key, old_value) in old_map {
        if EXCLUDED_FIELDS.contains(&key.as_str()) {
            continue;
        }
        let new_value = new_map.get(key).unwrap_or(&Value::Null);
        if old_value != new_value {
            changed_old.insert(key.clone(), old_value.clone());
            changed_new.insert(key.clone(), new_value.clone());
        }
    }

    // Fields present only in the new snapshot.
    for (key, new_value) in new_map {
        if EXCLUDED_FIELDS.contains(&key.as_str()) || old_map.contains_key(key) {
            continue;
        }
        changed_old.insert(key.clone(), Value::Null);
        changed_new.insert(key.clone(), new_value.clone());
    }

    if changed_new.is_empty() {
        return Ok(None);
    }

    Ok(Some(ChangeSet {
        old_values: Value::Object(changed_old),
        new_values: Value::Object(changed_new),
    }))
}
