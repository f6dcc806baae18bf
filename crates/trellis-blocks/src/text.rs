//! Text block: renders stored content.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use trellis_store::Page;

use crate::templating::TEXT_TEMPLATE;
use crate::{Block, BlockError, BlockService, FieldSpec, FormBuilder, Templating};

#[derive(Serialize)]
struct TextContext<'a> {
    block: &'a Block,
}

/// Renders the `content` setting of a block.
pub struct TextBlockService {
    name: String,
    templating: Arc<dyn Templating>,
}

impl TextBlockService {
    #[must_use]
    pub fn new(name: impl Into<String>, templating: Arc<dyn Templating>) -> Self {
        Self {
            name: name.into(),
            templating,
        }
    }
}

impl BlockService for TextBlockService {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, block: &Block, _page: &Page) -> Result<String, BlockError> {
        let context = serde_json::to_value(TextContext { block })?;
        self.templating.render(TEXT_TEMPLATE, &context)
    }

    fn validate_block(&self, block: &Block) -> Result<(), BlockError> {
        match block.setting("content") {
            None | Some(Value::Null | Value::String(_)) => Ok(()),
            Some(_) => Err(BlockError::invalid_setting("content", "expected a string")),
        }
    }

    fn define_block_form(&self, form: &mut dyn FormBuilder, _block: &Block) {
        form.add(FieldSpec::textarea("content"));
    }
}
