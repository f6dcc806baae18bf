//! Action block: embeds the output of a delegated sub-request.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use trellis_store::Page;

use crate::templating::ACTION_TEMPLATE;
use crate::{Block, BlockError, BlockService, FieldSpec, FormBuilder, Templating};

/// Executes an application action and returns its rendered output.
pub trait SubRequest: Send + Sync {
    /// Render `action` with `parameters`.
    fn render(&self, action: &str, parameters: &Map<String, Value>) -> Result<String, BlockError>;
}

impl<F> SubRequest for F
where
    F: Fn(&str, &Map<String, Value>) -> Result<String, BlockError> + Send + Sync,
{
    fn render(&self, action: &str, parameters: &Map<String, Value>) -> Result<String, BlockError> {
        self(action, parameters)
    }
}

#[derive(Serialize)]
struct ActionContext<'a> {
    content: &'a str,
    block: &'a Block,
    page: &'a Page,
}

/// Renders the `action` setting of a block through a [`SubRequest`].
///
/// The sub-request receives the block's `parameters` setting plus the block
/// and page themselves under `_block` and `_page`.
pub struct ActionBlockService {
    name: String,
    templating: Arc<dyn Templating>,
    sub_request: Arc<dyn SubRequest>,
}

impl ActionBlockService {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        templating: Arc<dyn Templating>,
        sub_request: Arc<dyn SubRequest>,
    ) -> Self {
        Self {
            name: name.into(),
            templating,
            sub_request,
        }
    }

    fn action(block: &Block) -> Result<&str, BlockError> {
        match block.setting("action") {
            Some(Value::String(action)) if !action.trim().is_empty() => Ok(action.as_str()),
            Some(Value::String(_)) | None => {
                Err(BlockError::invalid_setting("action", "an action is required"))
            }
            Some(_) => Err(BlockError::invalid_setting("action", "expected a string")),
        }
    }

    fn parameters(block: &Block) -> Result<Map<String, Value>, BlockError> {
        match block.setting("parameters") {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(parameters)) => Ok(parameters.clone()),
            Some(_) => Err(BlockError::invalid_setting("parameters", "expected a map")),
        }
    }
}

impl BlockService for ActionBlockService {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, block: &Block, page: &Page) -> Result<String, BlockError> {
        let action = Self::action(block)?;
        let mut parameters = Self::parameters(block)?;
        parameters.insert("_block".to_owned(), serde_json::to_value(block)?);
        parameters.insert("_page".to_owned(), serde_json::to_value(page)?);

        tracing::debug!(action, block_type = %block.block_type, "Rendering action block");
        let content = self.sub_request.render(action, &parameters)?;

        let context = serde_json::to_value(ActionContext {
            content: &content,
            block,
            page,
        })?;
        self.templating.render(ACTION_TEMPLATE, &context)
    }

    fn validate_block(&self, block: &Block) -> Result<(), BlockError> {
        Self::action(block)?;
        Self::parameters(block)?;
        Ok(())
    }

    fn define_block_form(&self, form: &mut dyn FormBuilder, block: &Block) {
        let parameters = Self::parameters(block)
            .map(|parameters| parameters.keys().map(FieldSpec::text).collect())
            .unwrap_or_default();

        form.add(FieldSpec::text("action"));
        form.add(FieldSpec::group("parameters", parameters));
    }
}
