//! Template rendering for block services.

use std::path::Path;

use minijinja::Environment;

use crate::BlockError;

/// Default template of action blocks.
pub const ACTION_TEMPLATE: &str = "block_core_action.html";

/// Default template of text blocks.
pub const TEXT_TEMPLATE: &str = "block_core_text.html";

const ACTION_SOURCE: &str = r#"<div class="block block-action">{{ content|safe }}</div>"#;
const TEXT_SOURCE: &str =
    r#"<div class="block block-text">{{ block.settings.content|default("")|safe }}</div>"#;

/// Renders a named template with a JSON context.
pub trait Templating: Send + Sync {
    /// Render `template` with `context`.
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, BlockError>;
}

/// [`Templating`] backed by a `minijinja` environment.
///
/// Ships [`ACTION_TEMPLATE`] and [`TEXT_TEMPLATE`]. Templates added later
/// under the same name replace them.
pub struct MiniJinjaTemplating {
    env: Environment<'static>,
}

impl MiniJinjaTemplating {
    /// Create an environment holding the default block templates.
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        // The built-in sources are constants and always parse.
        for (name, source) in [(ACTION_TEMPLATE, ACTION_SOURCE), (TEXT_TEMPLATE, TEXT_SOURCE)] {
            if let Err(e) = env.add_template(name, source) {
                tracing::warn!(template = name, error = %e, "Failed to register default template");
            }
        }
        Self { env }
    }

    /// Add or replace a template.
    pub fn add_template(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), BlockError> {
        let name = name.into();
        self.env
            .add_template_owned(name.clone(), source.into())
            .map_err(|e| BlockError::Template {
                name,
                message: e.to_string(),
            })
    }

    /// Load every `*.html` file in `dir` as a template named after the file.
    ///
    /// Files override the default templates of the same name.
    pub fn with_template_dir(mut self, dir: &Path) -> Result<Self, BlockError> {
        let mut entries = std::fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(std::fs::DirEntry::file_name);

        for entry in entries {
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "html") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                tracing::warn!(path = %path.display(), "Skipping template with non UTF-8 name");
                continue;
            };
            let source = std::fs::read_to_string(&path)?;
            tracing::debug!(template = name, "Loaded block template");
            self.add_template(name.to_owned(), source)?;
        }

        Ok(self)
    }
}

impl Default for MiniJinjaTemplating {
    fn default() -> Self {
        Self::new()
    }
}

impl Templating for MiniJinjaTemplating {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, BlockError> {
        let to_error = |e: minijinja::Error| BlockError::Template {
            name: template.to_owned(),
            message: e.to_string(),
        };
        self.env
            .get_template(template)
            .map_err(to_error)?
            .render(context)
            .map_err(to_error)
    }
}
