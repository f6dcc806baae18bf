//! `trellis fix` command implementation.

use clap::Args;
use trellis_site::PageDefaults;

use super::{StoreArgs, Workspace, write_fixture};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fix command.
#[derive(Args)]
pub(crate) struct FixArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Save fixed pages and write them back to the fixture file.
    #[arg(short, long)]
    write: bool,
}

/// Url change of one page.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct FixedUrl {
    pub name: String,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl FixArgs {
    /// Execute the fix command.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture cannot be loaded, a page cannot be
    /// saved, or the fixture cannot be written.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let workspace = self.store.open()?;
        let fixed = fix_site(&workspace, self.write)?;

        if fixed.is_empty() {
            output.success("All urls are up to date");
            return Ok(());
        }

        for change in &fixed {
            output.line(&format!(
                "{}: {} -> {}",
                change.name,
                change.before.as_deref().unwrap_or("-"),
                change.after.as_deref().unwrap_or("-"),
            ));
        }

        if self.write {
            write_fixture(&workspace.store, &self.store.pages)?;
            output.success(&format!(
                "Fixed {} url(s) in {}",
                fixed.len(),
                self.store.pages.display()
            ));
        } else {
            output.warning(&format!(
                "{} url(s) out of date, run with --write to save",
                fixed.len()
            ));
        }
        Ok(())
    }
}

/// Fix urls below every root of the site, saving each root's subtree if
/// `save` is set.
pub(crate) fn fix_site(workspace: &Workspace, save: bool) -> Result<Vec<FixedUrl>, CliError> {
    let manager = workspace.manager(PageDefaults::default());
    let mut tree = manager.load_pages(&workspace.site)?;
    let mut fixed = Vec::new();

    for root in tree.roots().to_vec() {
        let changes = manager.fix_url(&mut tree, root);
        fixed.extend(changes.into_iter().map(|change| FixedUrl {
            name: tree.page(change.node).name.clone(),
            before: change.before,
            after: change.after,
        }));

        if save {
            manager.save(&mut tree, root)?;
        }
    }

    Ok(fixed)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use trellis_store::PageId;

    use super::*;
    use crate::commands::test_support::fixture_file;

    fn fixed(name: &str, before: Option<&str>, after: &str) -> FixedUrl {
        FixedUrl {
            name: name.to_owned(),
            before: before.map(str::to_owned),
            after: Some(after.to_owned()),
        }
    }

    #[test]
    fn test_fix_site_reports_changes() {
        let (_dir, args) = fixture_file();
        let workspace = args.open().unwrap();

        let changes = fix_site(&workspace, false).unwrap();

        assert_eq!(
            changes,
            vec![
                fixed("Home", None, "/"),
                fixed("Books", None, "/shop/books"),
                fixed("About Us", None, "/about-us"),
            ]
        );
    }

    #[test]
    fn test_fix_site_without_save_leaves_store() {
        let (_dir, args) = fixture_file();
        let workspace = args.open().unwrap();

        fix_site(&workspace, false).unwrap();

        let about = workspace
            .store
            .to_fixture()
            .pages
            .into_iter()
            .find(|page| page.id == Some(PageId(2)))
            .unwrap();
        assert_eq!(about.url, None);
    }

    #[test]
    fn test_fix_site_is_idempotent_after_save() {
        let (_dir, args) = fixture_file();
        let workspace = args.open().unwrap();

        fix_site(&workspace, true).unwrap();
        write_fixture(&workspace.store, &args.pages).unwrap();

        let reopened = args.open().unwrap();
        assert_eq!(fix_site(&reopened, false).unwrap(), Vec::new());
    }
}
