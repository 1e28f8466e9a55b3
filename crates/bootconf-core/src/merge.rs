//! Structural merge of configuration values.
//!
//! Merges an override value into a base value in place. The shape of the
//! base never changes: objects merge key by key, arrays merge index by
//! index and must have the same length, and only scalar leaves are
//! overwritten. A key absent from the base (or `null` in the base) accepts
//! any value.
//!
//! The merge is depth-first and stops at the first incompatibility. Keys
//! merged before the failing one stay merged; the failing key itself is
//! left untouched.

use serde_json::{Map, Value};
use thiserror::Error;

/// Stable error codes for merge failures.
pub mod codes {
    pub const MERGE_INCOMPATIBLE_TYPES: &str = "MERGE_INCOMPATIBLE_TYPES";
    pub const MERGE_ARRAY_LENGTH_MISMATCH: &str = "MERGE_ARRAY_LENGTH_MISMATCH";
}

/// Merge failure, naming the fully qualified key path (e.g. `server.ports[1]`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("Cannot merge values of incompatible types for the option `{key_path}`.")]
    IncompatibleTypes { key_path: String },

    #[error("Cannot merge array values of different length for the option `{key_path}`.")]
    ArrayLengthMismatch {
        key_path: String,
        expected: usize,
        actual: usize,
    },
}

impl MergeError {
    /// Get the stable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::IncompatibleTypes { .. } => codes::MERGE_INCOMPATIBLE_TYPES,
            Self::ArrayLengthMismatch { .. } => codes::MERGE_ARRAY_LENGTH_MISMATCH,
        }
    }

    #[must_use]
    pub fn key_path(&self) -> &str {
        match self {
            Self::IncompatibleTypes { key_path } | Self::ArrayLengthMismatch { key_path, .. } => {
                key_path
            }
        }
    }
}

/// Merge `source` into `target`.
///
/// Both values must be objects or both arrays; at the top level the key
/// path of a failure is empty for a shape mismatch.
///
/// # Errors
/// Returns the first incompatibility found.
pub fn merge(target: &mut Value, source: &Value) -> Result<(), MergeError> {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => merge_objects(target, source, None),
        (Value::Array(target), Value::Array(source)) => merge_arrays(target, source, ""),
        _ => Err(MergeError::IncompatibleTypes {
            key_path: String::new(),
        }),
    }
}

/// Merge every key of `source` into `target`.
///
/// `prefix` is the key path of `target` itself (`None` at the root). Keys
/// are visited in document order.
///
/// # Errors
/// Returns the first incompatibility found.
pub fn merge_objects(
    target: &mut Map<String, Value>,
    source: &Map<String, Value>,
    prefix: Option<&str>,
) -> Result<(), MergeError> {
    for (key, new_value) in source {
        let full_key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };

        match target.get_mut(key) {
            Some(orig) => merge_value(orig, new_value, &full_key)?,
            None => {
                target.insert(key.clone(), new_value.clone());
            }
        }
    }
    Ok(())
}

/// Merge `source` into `target` index by index.
///
/// # Errors
/// [`MergeError::ArrayLengthMismatch`] when lengths differ (no element is
/// touched), otherwise the first element incompatibility.
pub fn merge_arrays(
    target: &mut [Value],
    source: &[Value],
    prefix: &str,
) -> Result<(), MergeError> {
    if target.len() != source.len() {
        return Err(MergeError::ArrayLengthMismatch {
            key_path: prefix.to_string(),
            expected: target.len(),
            actual: source.len(),
        });
    }

    for (ix, (orig, new_value)) in target.iter_mut().zip(source).enumerate() {
        merge_value(orig, new_value, &format!("{prefix}[{ix}]"))?;
    }
    Ok(())
}

/// Merge a single item: recurse into containers, overwrite scalars.
///
/// # Errors
/// Returns the first incompatibility at or below `full_key`.
pub fn merge_value(orig: &mut Value, new_value: &Value, full_key: &str) -> Result<(), MergeError> {
    if !has_compatible_type(Some(&*orig), new_value) {
        return Err(MergeError::IncompatibleTypes {
            key_path: full_key.to_string(),
        });
    }

    match (orig, new_value) {
        (Value::Array(orig), Value::Array(new_value)) => merge_arrays(orig, new_value, full_key),
        (Value::Object(orig), Value::Object(new_value)) => {
            merge_objects(orig, new_value, Some(full_key))
        }
        (orig, new_value) => {
            *orig = new_value.clone();
            Ok(())
        }
    }
}

/// Whether `new_value` may be merged over `orig`.
///
/// - absent or `null` accepts anything
/// - an array accepts only an array
/// - an object accepts only an object
/// - a scalar accepts only a scalar (including `null`)
#[must_use]
pub fn has_compatible_type(orig: Option<&Value>, new_value: &Value) -> bool {
    match orig {
        None | Some(Value::Null) => true,
        Some(Value::Array(_)) => new_value.is_array(),
        Some(Value::Object(_)) => new_value.is_object(),
        Some(_) => !new_value.is_array() && !new_value.is_object(),
    }
}
