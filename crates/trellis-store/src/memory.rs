//! In-memory store implementation.
//!
//! Provides [`MemoryStore`], used by the CLI on top of YAML fixtures and by
//! tests that need a real [`PageStore`] without a database.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::entity::{Page, PageId, Site};
use crate::query::{Order, PageQuery};
use crate::store::{PageStore, StoreError, StoreErrorKind};
use crate::yaml::Fixture;

const BACKEND: &str = "Memory";

/// In-memory page store.
///
/// Saved pages are staged until [`PageStore::flush`] commits them; queries
/// only see committed pages. Use the builder methods to seed the store.
///
/// # Example
///
/// ```
/// use trellis_store::{MemoryStore, Page, PageId, PageStore, Site, SiteId};
///
/// let store = MemoryStore::new()
///     .with_site(Site::new(SiteId(1), "Main"))
///     .with_page(Page {
///         id: Some(PageId(1)),
///         site: Some(SiteId(1)),
///         name: "Home".to_owned(),
///         ..Page::default()
///     });
///
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    sites: RwLock<Vec<Site>>,
    pages: RwLock<BTreeMap<PageId, Page>>,
    staged: RwLock<HashMap<PageId, Page>>,
    next_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            sites: RwLock::new(Vec::new()),
            pages: RwLock::new(BTreeMap::new()),
            staged: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a parsed fixture.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::AlreadyExists`] if two pages share an id and
    /// [`StoreErrorKind::Invalid`] if a page has no id.
    pub fn from_fixture(fixture: Fixture) -> Result<Self, StoreError> {
        let store = Self::new();
        store.sites.write().unwrap().extend(fixture.sites);

        for page in fixture.pages {
            let Some(id) = page.id else {
                return Err(StoreError::new(StoreErrorKind::Invalid)
                    .with_backend(BACKEND)
                    .with_message(format!("fixture page '{}' has no id", page.name)));
            };
            if store.pages.read().unwrap().contains_key(&id) {
                return Err(StoreError::new(StoreErrorKind::AlreadyExists)
                    .with_backend(BACKEND)
                    .with_page(id));
            }
            store.insert_committed(id, page);
        }

        Ok(store)
    }

    /// Snapshot committed sites and pages as a fixture.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn to_fixture(&self) -> Fixture {
        Fixture {
            sites: self.sites.read().unwrap().clone(),
            pages: self.pages.read().unwrap().values().cloned().collect(),
        }
    }

    /// Register a site.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_site(self, site: Site) -> Self {
        self.sites.write().unwrap().push(site);
        self
    }

    /// Add a committed page. Pages without an id get the next free one.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, mut page: Page) -> Self {
        let id = *page.id.get_or_insert_with(|| self.allocate_id());
        self.insert_committed(id, page);
        self
    }

    /// Number of committed pages.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.read().unwrap().len()
    }

    /// True if no page has been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of saved pages waiting for a flush.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn staged_len(&self) -> usize {
        self.staged.read().unwrap().len()
    }

    fn insert_committed(&self, id: PageId, page: Page) {
        self.next_id.fetch_max(id.0 + 1, Ordering::SeqCst);
        self.pages.write().unwrap().insert(id, page);
    }

    fn allocate_id(&self) -> PageId {
        PageId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl PageStore for MemoryStore {
    fn find(&self, query: &PageQuery) -> Result<Vec<Page>, StoreError> {
        let pages = self.pages.read().unwrap();
        let mut found: Vec<Page> = pages
            .values()
            .filter(|page| query.matches(page))
            .cloned()
            .collect();

        // Stable sort keeps id order among equal positions
        if query.order == Order::Position {
            found.sort_by_key(|page| page.position);
        }

        Ok(found)
    }

    fn save(&self, page: &mut Page) -> Result<(), StoreError> {
        if let Some(site) = page.site
            && !self.sites.read().unwrap().iter().any(|s| s.id == site)
        {
            let mut err = StoreError::new(StoreErrorKind::Invalid)
                .with_backend(BACKEND)
                .with_message(format!("unknown site {site}"));
            if let Some(id) = page.id {
                err = err.with_page(id);
            }
            return Err(err);
        }

        let id = *page.id.get_or_insert_with(|| self.allocate_id());
        tracing::debug!(page = %id, url = ?page.url, "Staged page");
        self.staged.write().unwrap().insert(id, page.clone());
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        let staged: Vec<(PageId, Page)> = self.staged.write().unwrap().drain().collect();
        if staged.is_empty() {
            return Ok(());
        }

        let count = staged.len();
        let mut pages = self.pages.write().unwrap();
        for (id, page) in staged {
            pages.insert(id, page);
        }
        tracing::debug!(count, "Flushed staged pages");
        Ok(())
    }

    fn discard(&self) -> Result<(), StoreError> {
        let mut staged = self.staged.write().unwrap();
        if !staged.is_empty() {
            tracing::debug!(count = staged.len(), "Discarded staged pages");
            staged.clear();
        }
        Ok(())
    }

    fn sites(&self) -> Result<Vec<Site>, StoreError> {
        Ok(self.sites.read().unwrap().clone())
    }
}
