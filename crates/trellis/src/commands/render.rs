//! `trellis render` command implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use serde_json::{Map, Value};
use trellis_blocks::{
    ActionBlockService, Block, BlockError, BlockRegistry, MiniJinjaTemplating, Templating,
    TextBlockService,
};
use trellis_config::{CliSettings, Config};
use trellis_site::PageDefaults;

use super::{StoreArgs, Workspace};
use crate::error::CliError;
use crate::output::Output;

/// Block type of text blocks.
const TEXT_BLOCK: &str = "core.text";

/// Block type of action blocks.
const ACTION_BLOCK: &str = "core.action";

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Url of the page to render.
    url: String,

    /// YAML file holding the block list.
    #[arg(long)]
    blocks: PathBuf,

    /// Path to configuration file (default: auto-discover trellis.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Block template directory (overrides config).
    #[arg(long)]
    template_dir: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, templates, fixture or blocks cannot
    /// be loaded, no page is served at the url, or a block fails to render.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            template_dir: self.template_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(dir) = &config.blocks_resolved.template_dir {
            output.info(&format!("Templates: {}", dir.display()));
        }
        let registry = block_registry(config.blocks_resolved.template_dir.as_deref())?;

        let workspace = self.store.open()?;
        let blocks = load_blocks(&self.blocks)?;
        let rendered = render_page(&workspace, &registry, &blocks, &self.url)?;

        if rendered.is_empty() {
            output.warning(&format!("No enabled blocks on {}", self.url));
        }
        for html in &rendered {
            output.line(html);
        }
        Ok(())
    }
}

/// Registry with the text and action services, using templates from
/// `template_dir` over the built-in ones.
pub(crate) fn block_registry(template_dir: Option<&Path>) -> Result<BlockRegistry, CliError> {
    let mut templating = MiniJinjaTemplating::new();
    if let Some(dir) = template_dir {
        templating = templating.with_template_dir(dir)?;
    }
    let templating: Arc<dyn Templating> = Arc::new(templating);

    let mut registry = BlockRegistry::new();
    registry.register(Arc::new(TextBlockService::new(
        TEXT_BLOCK,
        Arc::clone(&templating),
    )));
    registry.register(Arc::new(ActionBlockService::new(
        ACTION_BLOCK,
        templating,
        Arc::new(preview_action),
    )));
    Ok(registry)
}

/// Stand-in for application actions, which cannot run outside a server.
fn preview_action(action: &str, _parameters: &Map<String, Value>) -> Result<String, BlockError> {
    Ok(format!("<!-- action: {action} -->"))
}

/// Parse a YAML block list. Empty content yields no blocks.
pub(crate) fn load_blocks(path: &Path) -> Result<Vec<Block>, CliError> {
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yaml::from_str(&content).map_err(|e| {
        CliError::Validation(format!("Invalid blocks file {}: {e}", path.display()))
    })
}

/// Render the enabled blocks of the page served at `url`, in position order.
pub(crate) fn render_page(
    workspace: &Workspace,
    registry: &BlockRegistry,
    blocks: &[Block],
    url: &str,
) -> Result<Vec<String>, CliError> {
    let manager = workspace.manager(PageDefaults::default());
    let page = manager
        .get_page_by_url(&workspace.site, url)?
        .ok_or_else(|| CliError::Validation(format!("No page at {url}")))?;

    let mut on_page: Vec<&Block> = blocks
        .iter()
        .filter(|block| block.page.is_some() && block.page == page.id)
        .collect();
    on_page.sort_by_key(|block| block.position);
    tracing::info!(page = ?page.id, blocks = on_page.len(), "Rendering page blocks");

    let mut rendered = Vec::new();
    for block in on_page {
        let html = registry.render(block, &page)?;
        if !html.is_empty() {
            rendered.push(html);
        }
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::commands::fix::fix_site;
    use crate::commands::test_support::fixture_file;

    const BLOCKS: &str = "\
- type: core.text
  page: 2
  position: 2
  settings:
    content: <p>About us</p>
- type: core.action
  page: 2
  position: 1
  settings:
    action: team/list
- type: core.text
  page: 2
  position: 3
  enabled: false
  settings:
    content: hidden
- type: core.text
  page: 1
  settings:
    content: home
";

    fn fixed_workspace() -> (tempfile::TempDir, Workspace) {
        let (dir, args) = fixture_file();
        let workspace = args.open().unwrap();
        fix_site(&workspace, true).unwrap();
        (dir, workspace)
    }

    fn blocks() -> Vec<Block> {
        serde_yaml::from_str(BLOCKS).unwrap()
    }

    #[test]
    fn test_render_page_in_position_order() {
        let (_dir, workspace) = fixed_workspace();
        let registry = block_registry(None).unwrap();

        let rendered = render_page(&workspace, &registry, &blocks(), "/about-us").unwrap();

        assert_eq!(
            rendered,
            vec![
                r#"<div class="block block-action"><!-- action: team/list --></div>"#.to_owned(),
                r#"<div class="block block-text"><p>About us</p></div>"#.to_owned(),
            ]
        );
    }

    #[test]
    fn test_render_page_unknown_url() {
        let (_dir, workspace) = fixed_workspace();
        let registry = block_registry(None).unwrap();

        let err = render_page(&workspace, &registry, &blocks(), "/missing").unwrap_err();

        assert!(matches!(err, CliError::Validation(ref msg) if msg == "No page at /missing"));
    }

    #[test]
    fn test_render_page_unknown_block_type() {
        let (_dir, workspace) = fixed_workspace();
        let registry = block_registry(None).unwrap();
        let mut video = Block::new("core.video");
        video.page = workspace.store.to_fixture().pages[0].id;

        let err = render_page(&workspace, &registry, &[video], "/").unwrap_err();

        assert!(matches!(err, CliError::Block(BlockError::UnknownBlockType(_))));
    }

    #[test]
    fn test_configured_template_dir_overrides_defaults() {
        let (dir, workspace) = fixed_workspace();
        let templates = dir.path().join("templates");
        std::fs::create_dir(&templates).unwrap();
        std::fs::write(
            templates.join("block_core_text.html"),
            "<section>{{ block.settings.content|safe }}</section>",
        )
        .unwrap();
        let config_path = dir.path().join("trellis.toml");
        std::fs::write(&config_path, "[blocks]\ntemplate_dir = \"templates\"\n").unwrap();

        let config = Config::load(Some(&config_path), None).unwrap();
        let registry = block_registry(config.blocks_resolved.template_dir.as_deref()).unwrap();
        let rendered = render_page(&workspace, &registry, &blocks(), "/").unwrap();

        assert_eq!(rendered, vec!["<section>home</section>".to_owned()]);
    }

    #[test]
    fn test_cli_template_dir_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("trellis.toml");
        std::fs::write(&config_path, "[blocks]\ntemplate_dir = \"missing\"\n").unwrap();
        let settings = CliSettings {
            template_dir: Some(dir.path().to_path_buf()),
        };

        let config = Config::load(Some(&config_path), Some(&settings)).unwrap();

        assert_eq!(
            config.blocks_resolved.template_dir.as_deref(),
            Some(dir.path())
        );
        assert!(block_registry(config.blocks_resolved.template_dir.as_deref()).is_ok());
    }

    #[test]
    fn test_missing_template_dir_fails() {
        let dir = tempfile::tempdir().unwrap();

        let err = block_registry(Some(&dir.path().join("missing"))).err().unwrap();

        assert!(matches!(err, CliError::Block(BlockError::Io(_))));
    }

    #[test]
    fn test_load_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocks.yaml");
        std::fs::write(&path, BLOCKS).unwrap();
        let empty = dir.path().join("empty.yaml");
        std::fs::write(&empty, "").unwrap();
        let broken = dir.path().join("broken.yaml");
        std::fs::write(&broken, "- type: [").unwrap();

        assert_eq!(load_blocks(&path).unwrap().len(), 4);
        assert!(load_blocks(&empty).unwrap().is_empty());
        assert!(matches!(load_blocks(&broken), Err(CliError::Validation(_))));
    }
}
