// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Flattening a nested document into dot-path settings

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use wopr_config_model::Setting;

/// Flatten a nested configuration document into a list of leaf settings.
///
/// Non-empty objects are descended into with the path extended by
/// `.<key>`; scalars, nulls, arrays and empty objects are emitted as
/// leaves. Arrays are deliberately not expanded — a list is edited as a
/// unit, addressed by its own key. A non-object document flattens to
/// nothing.
pub fn flatten(document: &Value) -> Vec<Setting> {
    let mut out = Vec::new();
    if let Value::Object(map) = document {
        walk(map, "", &mut out);
    }
    out
}

fn walk(map: &Map<String, Value>, prefix: &str, out: &mut Vec<Setting>) {
    for (key, value) in map {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => walk(inner, &full, out),
            _ => out.push(Setting::from_value(full, value.clone())),
        }
    }
}

/// Section a key belongs to: its first dot-segment, the whole key when it
/// has no dot, `"other"` when there is nothing before the first dot.
pub fn section_of(key: &str) -> &str {
    match key.split('.').next() {
        Some("") | None => "other",
        Some(head) => head,
    }
}

/// Group settings by section, each section sorted by key.
pub fn group_by_section(settings: Vec<Setting>) -> BTreeMap<String, Vec<Setting>> {
    let mut grouped: BTreeMap<String, Vec<Setting>> = BTreeMap::new();
    for setting in settings {
        grouped.entry(section_of(&setting.key).to_string()).or_default().push(setting);
    }
    for entries in grouped.values_mut() {
        entries.sort_by(|a, b| a.key.cmp(&b.key));
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dotless_key_is_its_own_section() {
        assert_eq!(section_of("debug"), "debug");
        assert_eq!(section_of("storage.base_path"), "storage");
        assert_eq!(section_of(".weird"), "other");
    }

    #[test]
    fn sections_are_sorted_by_key() {
        let doc = json!({"s": {"c": 1, "a": 2, "b": 3}});
        let grouped = group_by_section(flatten(&doc));
        let keys: Vec<_> = grouped["s"].iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["s.a", "s.b", "s.c"]);
    }

    #[test]
    fn non_object_document_flattens_to_nothing() {
        assert!(flatten(&json!([1, 2, 3])).is_empty());
        assert!(flatten(&json!("scalar")).is_empty());
    }
}
