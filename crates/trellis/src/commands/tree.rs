//! `trellis tree` command implementation.

use clap::Args;
use trellis_site::{PageDefaults, PageTree};

use super::StoreArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tree command.
#[derive(Args)]
pub(crate) struct TreeArgs {
    #[command(flatten)]
    store: StoreArgs,
}

/// One printed row of the tree.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct TreeLine {
    pub depth: usize,
    pub url: String,
    pub name: String,
    pub note: Option<&'static str>,
}

impl TreeArgs {
    /// Execute the tree command.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture cannot be loaded.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let workspace = self.store.open()?;
        let manager = workspace.manager(PageDefaults::default());
        let tree = manager.load_pages(&workspace.site)?;

        if tree.is_empty() {
            output.warning(&format!("Site {} has no pages", workspace.site.id));
            return Ok(());
        }

        for line in tree_lines(&tree) {
            let text = format!("{}{}  {}", "  ".repeat(line.depth), line.url, line.name);
            match line.note {
                Some(note) => output.line_with_note(&text, note),
                None => output.line(&text),
            }
        }
        Ok(())
    }
}

/// Flatten `tree` into rows, roots first, children in position order.
pub(crate) fn tree_lines(tree: &PageTree) -> Vec<TreeLine> {
    tree.roots()
        .iter()
        .flat_map(|&root| tree.subtree(root))
        .map(|node| {
            let page = tree.page(node);
            let note = if page.is_internal() {
                Some("internal")
            } else if page.is_hybrid() {
                Some("hybrid")
            } else if !page.enabled {
                Some("disabled")
            } else {
                None
            };
            TreeLine {
                depth: tree.depth(node),
                url: page.url.clone().unwrap_or_else(|| "-".to_owned()),
                name: page.name.clone(),
                note,
            }
        })
        .collect()
}
