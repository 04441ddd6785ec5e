//! Dotted-path manipulation of JSON trees

use serde_json::Value;

/// Insert a value at a dotted path, creating intermediate objects.
///
/// A non-object node on the way down is replaced by an object; the final
/// segment always lands as an object entry.
pub fn insert_dotted(root: &mut Value, dotted: &str, value: Value) {
    let parts: Vec<&str> = dotted.split('.').collect();

    let mut cur = root;
    for part in &parts[..parts.len() - 1] {
        if !cur.is_object() {
            *cur = Value::Object(Default::default());
        }
        let map = cur.as_object_mut().unwrap();
        if !map.contains_key(*part) {
            map.insert((*part).into(), Value::Object(Default::default()));
        }
        cur = map.get_mut(*part).unwrap();
    }

    let last = parts.last().unwrap();
    if let Value::Object(map) = cur {
        map.insert((*last).into(), value);
    } else {
        *cur = serde_json::json!({ *last: value });
    }
}

/// Remove a dotted path from a JSON tree. Missing segments are a no-op.
pub fn remove_dotted(root: &mut Value, dotted: &str) {
    fn rec(node: &mut Value, parts: &[&str]) {
        if let Value::Object(map) = node {
            match parts {
                [] => {}
                [last] => {
                    map.remove(*last);
                }
                [head, rest @ ..] => {
                    if let Some(next) = map.get_mut(*head) {
                        rec(next, rest);
                    }
                }
            }
        }
    }
    let parts: Vec<&str> = dotted.split('.').collect();
    rec(root, &parts);
}

/// Walk a dotted path through nested objects.
pub fn get_dotted<'a>(root: &'a Value, dotted: &str) -> Option<&'a Value> {
    let mut cur = root;
    for part in dotted.split('.') {
        cur = cur.get(part)?;
    }
    Some(cur)
}

/// Rebuild a nested document from flat `(key, value)` pairs.
pub fn nest<K, I>(entries: I) -> Value
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, Value)>,
{
    let mut root = serde_json::json!({});
    for (key, value) in entries {
        insert_dotted(&mut root, key.as_ref(), value);
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_creates_intermediate_objects() {
        let mut root = json!({});
        insert_dotted(&mut root, "storage.base_path", json!("/data"));
        assert_eq!(root["storage"]["base_path"], "/data");
    }

    #[test]
    fn insert_overwrites_scalar_on_the_way_down() {
        let mut root = json!({"storage": "oops"});
        insert_dotted(&mut root, "storage.retries", json!(3));
        assert_eq!(root["storage"]["retries"], 3);
    }

    #[test]
    fn remove_leaves_siblings_alone() {
        let mut root = json!({"a": {"b": 1, "c": 2}});
        remove_dotted(&mut root, "a.b");
        assert_eq!(root, json!({"a": {"c": 2}}));
        remove_dotted(&mut root, "a.missing.deeper");
        assert_eq!(root, json!({"a": {"c": 2}}));
    }

    #[test]
    fn get_walks_nested_objects_only() {
        let root = json!({"a": {"b": [10, 20]}});
        assert_eq!(get_dotted(&root, "a.b"), Some(&json!([10, 20])));
        assert_eq!(get_dotted(&root, "a.b.0"), None);
        assert_eq!(get_dotted(&root, "a.x"), None);
    }
}
