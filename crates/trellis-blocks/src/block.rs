//! Block entity.

use serde::{Deserialize, Serialize};
use trellis_store::PageId;

/// Content unit placed on a page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Service key (e.g., "core.text").
    #[serde(rename = "type")]
    pub block_type: String,
    /// Page the block belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageId>,
    #[serde(default)]
    pub position: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Service-specific settings.
    #[serde(default)]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

fn default_enabled() -> bool {
    true
}

impl Block {
    /// Create an enabled block of `block_type` with no settings.
    #[must_use]
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            enabled: true,
            ..Self::default()
        }
    }

    /// Set a setting value.
    #[must_use]
    pub fn with_setting(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Look up a setting.
    #[must_use]
    pub fn setting(&self, key: &str) -> Option<&serde_json::Value> {
        self.settings.get(key)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_new_block_is_enabled() {
        let block = Block::new("core.text");

        assert!(block.enabled);
        assert!(block.settings.is_empty());
        assert_eq!(block.block_type, "core.text");
    }

    #[test]
    fn test_with_setting() {
        let block = Block::new("core.action")
            .with_setting("action", "catalog/list")
            .with_setting("parameters", json!({"limit": 5}));

        assert_eq!(block.setting("action"), Some(&json!("catalog/list")));
        assert_eq!(block.setting("parameters"), Some(&json!({"limit": 5})));
        assert!(block.setting("missing").is_none());
    }

    #[test]
    fn test_deserialize_uses_type_key() {
        let block: Block =
            serde_json::from_value(json!({"type": "core.text", "settings": {"content": "Hi"}}))
                .unwrap();

        assert_eq!(block.block_type, "core.text");
        assert!(block.enabled);
        assert_eq!(block.setting("content"), Some(&json!("Hi")));
    }
}
