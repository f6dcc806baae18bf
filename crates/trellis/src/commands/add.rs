//! `trellis add` command implementation.

use std::path::PathBuf;

use clap::Args;
use serde_json::Value;
use trellis_config::{Config, FieldMap};
use trellis_site::PageDefaults;
use trellis_store::Page;

use super::{StoreArgs, Workspace, write_fixture};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the add command.
#[derive(Args)]
pub(crate) struct AddArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Path to configuration file (default: auto-discover trellis.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Parent page identifier.
    #[arg(long)]
    parent: Option<u64>,

    /// Page field as `key=value`. Values are parsed as JSON, falling back
    /// to a plain string.
    #[arg(short, long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    fields: Vec<(String, Value)>,
}

impl AddArgs {
    /// Execute the add command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or fixture loading fails, a field
    /// is unknown, or the page cannot be saved.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        if let Some(path) = &config.config_path {
            output.info(&format!("Using {}", path.display()));
        }
        let defaults =
            PageDefaults::from_config(&config.pages.defaults, &config.pages.route_defaults)?;

        let workspace = self.store.open()?;
        let fields: FieldMap = self.fields.into_iter().collect();
        let page = add_page(&workspace, defaults, fields, self.parent)?;
        write_fixture(&workspace.store, &self.store.pages)?;

        output.success(&format!(
            "Added page {} '{}' at {}",
            page.id.map_or_else(|| "-".to_owned(), |id| id.to_string()),
            page.name,
            page.url.as_deref().unwrap_or("-"),
        ));
        Ok(())
    }
}

/// Create a page of the workspace site from `fields` and save it.
pub(crate) fn add_page(
    workspace: &Workspace,
    defaults: PageDefaults,
    mut fields: FieldMap,
    parent: Option<u64>,
) -> Result<Page, CliError> {
    fields
        .entry("site".to_owned())
        .or_insert_with(|| Value::from(workspace.site.id.0));
    if let Some(parent) = parent {
        fields.insert("parent".to_owned(), Value::from(parent));
    }

    let manager = workspace.manager(defaults);
    let page = manager.create_from_map(&fields)?;
    if page.site != Some(workspace.site.id) {
        return Err(CliError::Validation(format!(
            "Page must belong to site {}",
            workspace.site.id
        )));
    }

    let mut tree = manager.load_pages(&workspace.site)?;
    let node = tree.insert(page)?;
    let saved = manager.save(&mut tree, node)?;
    tracing::info!(page = ?saved.id, url = ?saved.url, "Added page");
    Ok(saved.clone())
}

/// Parse a `key=value` field argument.
fn parse_field(arg: &str) -> Result<(String, Value), String> {
    let (key, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{arg}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in '{arg}'"));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
    Ok((key.to_owned(), value))
}
