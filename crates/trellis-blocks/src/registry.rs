//! Block type registry.

use std::collections::HashMap;
use std::sync::Arc;

use trellis_store::Page;

use crate::{Block, BlockError, BlockService, Form};

/// Maps block types to the services that handle them.
#[derive(Default)]
pub struct BlockRegistry {
    services: HashMap<String, Arc<dyn BlockService>>,
}

impl BlockRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service under its [`name`](BlockService::name).
    ///
    /// Replaces any service previously registered for the same type.
    pub fn register(&mut self, service: Arc<dyn BlockService>) {
        let name = service.name().to_owned();
        if self.services.insert(name.clone(), service).is_some() {
            tracing::warn!(block_type = %name, "Replaced block service");
        }
    }

    /// Service handling `block_type`.
    pub fn get(&self, block_type: &str) -> Result<&Arc<dyn BlockService>, BlockError> {
        self.services
            .get(block_type)
            .ok_or_else(|| BlockError::UnknownBlockType(block_type.to_owned()))
    }

    /// Registered block types, sorted.
    #[must_use]
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.services.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Render `block` on `page`. Disabled blocks render as an empty string.
    pub fn render(&self, block: &Block, page: &Page) -> Result<String, BlockError> {
        let service = self.get(&block.block_type)?;
        if !block.enabled {
            tracing::debug!(block_type = %block.block_type, "Skipping disabled block");
            return Ok(String::new());
        }
        service.execute(block, page)
    }

    /// Validate `block` with its service.
    pub fn validate(&self, block: &Block) -> Result<(), BlockError> {
        self.get(&block.block_type)?.validate_block(block)
    }

    /// Build the settings form of `block`.
    pub fn form_for(&self, block: &Block) -> Result<Form, BlockError> {
        let mut form = Form::new();
        self.get(&block.block_type)?
            .define_block_form(&mut form, block);
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value};

    use super::*;
    use crate::{ActionBlockService, FieldSpec, MiniJinjaTemplating, Templating, TextBlockService};

    static_assertions::assert_impl_all!(BlockRegistry: Send, Sync);

    fn registry() -> BlockRegistry {
        let templating: Arc<dyn Templating> = Arc::new(MiniJinjaTemplating::new());
        let mut registry = BlockRegistry::new();
        registry.register(Arc::new(TextBlockService::new(
            "core.text",
            Arc::clone(&templating),
        )));
        registry.register(Arc::new(ActionBlockService::new(
            "core.action",
            templating,
            Arc::new(
                |action: &str, _: &Map<String, Value>| -> Result<String, BlockError> {
                    Ok(format!("<span>{action}</span>"))
                },
            ),
        )));
        registry
    }

    #[test]
    fn test_types() {
        assert_eq!(registry().types(), vec!["core.action", "core.text"]);
    }

    #[test]
    fn test_render_dispatches_by_type() {
        let registry = registry();
        let page = Page::default();

        let text = registry
            .render(&Block::new("core.text").with_setting("content", "Hi"), &page)
            .unwrap();
        let action = registry
            .render(&Block::new("core.action").with_setting("action", "news"), &page)
            .unwrap();

        assert!(text.contains("block-text"));
        assert!(action.contains("<span>news</span>"));
    }

    #[test]
    fn test_render_unknown_type() {
        let err = registry()
            .render(&Block::new("core.video"), &Page::default())
            .unwrap_err();

        assert!(matches!(err, BlockError::UnknownBlockType(ref t) if t == "core.video"));
        assert_eq!(err.to_string(), "Unknown block type: core.video");
    }

    #[test]
    fn test_render_disabled_block() {
        let mut block = Block::new("core.action");
        block.enabled = false;

        let html = registry().render(&block, &Page::default()).unwrap();

        assert_eq!(html, "");
    }

    #[test]
    fn test_validate_and_form() {
        let registry = registry();
        let block = Block::new("core.action");

        assert!(registry.validate(&block).is_err());
        assert!(registry.validate(&Block::new("core.text")).is_ok());
        assert_eq!(
            registry.form_for(&block).unwrap().field("action"),
            Some(&FieldSpec::text("action"))
        );
        assert!(registry.form_for(&Block::new("core.video")).is_err());
    }
}
