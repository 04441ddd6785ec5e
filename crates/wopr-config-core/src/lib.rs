// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Transform engine for nested WOPR configuration documents.
//!
//! The config service hands out one arbitrarily-nested JSON document per
//! environment. Everything editable about that document is expressed here
//! as pure functions over `serde_json::Value`: flattening the tree into
//! dot-path [`Setting`]s, grouping them into display sections, rebuilding
//! a tree from flat pairs, decoding textual edits according to a
//! [`ValueType`], and recomputing whole list/dict leaves for nested
//! mutations. No I/O happens in this crate.

pub mod decode;
pub mod extract;
pub mod flatten;
pub mod key;
pub mod mutate;
pub mod tree;

pub use decode::{decode_lenient, decode_raw, format_value, DecodeError};
pub use flatten::{flatten, group_by_section, section_of};
pub use key::{validate_key, KeyError};
pub use mutate::MutateError;
pub use tree::{get_dotted, insert_dotted, nest, remove_dotted};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wopr_config_model::ValueType;

    #[test]
    fn flatten_groups_the_documented_scenario() {
        let doc = json!({
            "storage": {"base_path": "/data", "retries": 3},
            "debug": true
        });

        let settings = flatten(&doc);
        assert_eq!(settings.len(), 3);

        let grouped = group_by_section(settings);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["storage"].len(), 2);
        assert_eq!(grouped["debug"].len(), 1);

        let base_path = &grouped["storage"][0];
        assert_eq!(base_path.key, "storage.base_path");
        assert_eq!(base_path.value, json!("/data"));
        assert_eq!(base_path.value_type, ValueType::String);

        let retries = &grouped["storage"][1];
        assert_eq!(retries.key, "storage.retries");
        assert_eq!(retries.value_type, ValueType::Integer);

        assert_eq!(grouped["debug"][0].key, "debug");
        assert_eq!(grouped["debug"][0].value_type, ValueType::Boolean);
    }

    #[test]
    fn flatten_then_nest_round_trips() {
        let doc = json!({
            "camera": {
                "resolutions": {"hd": {"width": 1280, "height": 720}},
                "formats": ["jpeg", "png"],
                "enabled": true
            },
            "threshold": 0.75,
            "name": "wopr"
        });

        let rebuilt = nest(
            flatten(&doc).into_iter().map(|s| (s.key, s.value)),
        );
        assert_eq!(rebuilt, doc);
    }

    #[test]
    fn flatten_emits_no_duplicate_keys() {
        let doc = json!({
            "a": {"b": 1, "c": {"d": 2}},
            "e": [1, 2, 3],
            "f": {"b": 4}
        });
        let settings = flatten(&doc);
        let mut keys: Vec<_> = settings.iter().map(|s| s.key.as_str()).collect();
        keys.sort_unstable();
        let before = keys.len();
        keys.dedup();
        assert_eq!(keys.len(), before);
    }

    #[test]
    fn every_setting_lands_in_its_first_segment_section() {
        let doc = json!({
            "storage": {"base_path": "/data"},
            "debug": true,
            "camera": {"fps": 30}
        });
        for (section, settings) in group_by_section(flatten(&doc)) {
            for setting in settings {
                assert_eq!(section_of(&setting.key), section);
            }
        }
    }

    #[test]
    fn arrays_are_leaves_and_empty_objects_survive() {
        let doc = json!({
            "ml": {"labels": ["cat", "die"], "overrides": {}}
        });
        let settings = flatten(&doc);
        assert_eq!(settings.len(), 2);
        assert_eq!(settings[0].key, "ml.labels");
        assert_eq!(settings[0].value_type, ValueType::List);
        assert_eq!(settings[1].key, "ml.overrides");
        assert_eq!(settings[1].value_type, ValueType::Dict);

        let rebuilt = nest(settings.into_iter().map(|s| (s.key, s.value)));
        assert_eq!(rebuilt, doc);
    }

    #[test]
    fn decode_is_idempotent_over_inferred_types() {
        let samples = vec![
            json!("hello"),
            json!(42),
            json!(-7),
            json!(2.5),
            json!(true),
            json!(false),
            json!(["a", 1]),
            json!({"k": "v"}),
        ];
        for value in samples {
            let value_type = ValueType::infer(&value);
            let encoded = format_value(&value);
            let decoded = decode_raw(&encoded, value_type).unwrap();
            assert_eq!(decoded, value, "round-trip failed for {value_type}");
        }
    }

    #[test]
    fn typed_extraction_reads_a_section() {
        #[derive(serde::Deserialize)]
        struct Storage {
            base_path: String,
            retries: u32,
        }

        let doc = json!({"storage": {"base_path": "/data", "retries": 3}});
        let storage: Storage = extract::get_at(&doc, "storage").unwrap();
        assert_eq!(storage.base_path, "/data");
        assert_eq!(storage.retries, 3);

        assert!(extract::get_at::<Storage>(&doc, "storage.missing").is_err());
    }
}
