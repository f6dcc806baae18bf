//! CLI command implementations.
//!
//! Every command works on a YAML fixture file loaded into a
//! [`MemoryStore`]. Commands that change pages write the committed store
//! back to the same file.

pub(crate) mod add;
pub(crate) mod fix;
pub(crate) mod render;
pub(crate) mod tree;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use trellis_site::{PageDefaults, PageManager};
use trellis_store::{Fixture, MemoryStore, PageStore, Site, SiteId};

use crate::error::CliError;

pub(crate) use add::AddArgs;
pub(crate) use fix::FixArgs;
pub(crate) use render::RenderArgs;
pub(crate) use tree::TreeArgs;

/// Page fixture selection shared by all commands.
#[derive(Args, Debug, Clone)]
pub(crate) struct StoreArgs {
    /// YAML file holding `sites` and `pages`.
    #[arg(long, env = "TRELLIS_PAGES")]
    pub pages: PathBuf,

    /// Site identifier.
    #[arg(long, default_value_t = 1)]
    pub site: u64,
}

/// Fixture-backed store together with the selected site.
pub(crate) struct Workspace {
    pub store: Arc<MemoryStore>,
    pub site: Site,
}

impl Workspace {
    /// Page manager over the fixture store.
    pub(crate) fn manager(&self, defaults: PageDefaults) -> PageManager {
        let store: Arc<MemoryStore> = Arc::clone(&self.store);
        PageManager::new(store, defaults)
    }
}

impl StoreArgs {
    /// Load the fixture file and look up the selected site.
    pub(crate) fn open(&self) -> Result<Workspace, CliError> {
        let content = std::fs::read_to_string(&self.pages)?;
        let store = MemoryStore::from_fixture(Fixture::from_yaml(&content)?)?;
        let site = store.site(SiteId(self.site))?.ok_or_else(|| {
            CliError::Validation(format!(
                "Site {} not found in {}",
                self.site,
                self.pages.display()
            ))
        })?;

        tracing::info!(pages = store.len(), site = %site.id, "Loaded fixture");
        Ok(Workspace {
            store: Arc::new(store),
            site,
        })
    }
}

/// Write the committed content of `store` to `path`.
pub(crate) fn write_fixture(store: &MemoryStore, path: &Path) -> Result<(), CliError> {
    let yaml = store.to_fixture().to_yaml()?;
    std::fs::write(path, yaml)?;
    tracing::info!(path = %path.display(), "Wrote fixture");
    Ok(())
}
