//! Typed extraction for services consuming a fetched document

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserialize the whole document into a typed view.
pub fn get<T: DeserializeOwned>(root: &Value) -> anyhow::Result<T> {
    serde_path_to_error::deserialize(root.clone())
        .map_err(|e| anyhow::anyhow!("document extraction failed: {e}"))
}

/// Deserialize the subtree at a dotted path into a typed view.
pub fn get_at<T: DeserializeOwned>(root: &Value, dotted: &str) -> anyhow::Result<T> {
    let node = crate::tree::get_dotted(root, dotted)
        .ok_or_else(|| anyhow::anyhow!("missing path: {dotted}"))?;
    serde_path_to_error::deserialize(node.clone())
        .map_err(|e| anyhow::anyhow!("extraction at {dotted:?} failed: {e}"))
}
