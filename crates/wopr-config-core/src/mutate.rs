// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! In-place editing of complex (list/dict) leaves
//!
//! A nested mutation is never a wire operation of its own: each helper
//! computes the complete replacement value for the leaf, which is then
//! persisted through the ordinary whole-value upsert.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::decode::decode_lenient;

#[derive(Debug, Error)]
pub enum MutateError {
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no such property: {0:?}")]
    MissingEntry(String),
}

/// Replace one list item. The raw text is decoded leniently (JSON when
/// it parses, literal string otherwise).
pub fn list_set(items: &[Value], index: usize, raw: &str) -> Result<Value, MutateError> {
    check_index(items, index)?;
    let mut next = items.to_vec();
    next[index] = decode_lenient(raw);
    Ok(Value::Array(next))
}

/// Drop one list item by index.
pub fn list_remove(items: &[Value], index: usize) -> Result<Value, MutateError> {
    check_index(items, index)?;
    let mut next = items.to_vec();
    next.remove(index);
    Ok(Value::Array(next))
}

/// Append an empty-string placeholder for the caller to edit next.
pub fn list_push(items: &[Value]) -> Value {
    let mut next = items.to_vec();
    next.push(Value::String(String::new()));
    Value::Array(next)
}

/// Rename a property and/or replace its value: the old entry is removed
/// and the new key inserted with the lenient decode of `raw`. Passing
/// `old_key == new_key` is a plain value edit.
pub fn dict_set(
    entries: &Map<String, Value>,
    old_key: &str,
    new_key: &str,
    raw: &str,
) -> Result<Value, MutateError> {
    if !entries.contains_key(old_key) {
        return Err(MutateError::MissingEntry(old_key.to_string()));
    }
    let mut next = entries.clone();
    next.remove(old_key);
    next.insert(new_key.to_string(), decode_lenient(raw));
    Ok(Value::Object(next))
}

/// Drop one property.
pub fn dict_remove(entries: &Map<String, Value>, key: &str) -> Result<Value, MutateError> {
    if !entries.contains_key(key) {
        return Err(MutateError::MissingEntry(key.to_string()));
    }
    let mut next = entries.clone();
    next.remove(key);
    Ok(Value::Object(next))
}

/// Insert an empty-keyed placeholder entry, expected to be renamed by
/// the caller immediately afterwards.
pub fn dict_add(entries: &Map<String, Value>) -> Value {
    let mut next = entries.clone();
    next.insert(String::new(), Value::String(String::new()));
    Value::Object(next)
}

fn check_index(items: &[Value], index: usize) -> Result<(), MutateError> {
    if index >= items.len() {
        return Err(MutateError::IndexOutOfRange {
            index,
            len: items.len(),
        });
    }
    Ok(())
}
