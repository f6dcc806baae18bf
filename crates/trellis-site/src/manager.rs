//! Page persistence manager.
//!
//! [`PageManager`] creates pages from default field sets, derives slugs and
//! urls over a [`PageTree`], and delegates persistence to a [`PageStore`].
//!
//! # Url Rules
//!
//! For every page reached while fixing a subtree:
//! - internal pages lose their url; below them only other internal pages
//!   are touched (their url is cleared as well)
//! - hybrid pages keep their slug and url, their children are still fixed
//! - pages with a parent get `slug` from their name when missing, and
//!   `url = base(parent.url) + slug`, where `base` appends `/` unless the
//!   parent url already ends with one
//! - root pages get no slug and the url `/`

use std::sync::Arc;

use trellis_store::{CMS_ROUTE_NAME, Page, PageId, PageQuery, PageStore, Site};

use crate::error::PageError;
use crate::fields::{PageDefaults, PageFields};
use crate::slug::slugify;
use crate::tree::{NodeId, PageTree};

/// Url separator and root path.
const SEPARATOR: &str = "/";

/// Url change produced by [`PageManager::fix_url`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlChange {
    /// Changed node.
    pub node: NodeId,
    /// Url before fixing.
    pub before: Option<String>,
    /// Url after fixing.
    pub after: Option<String>,
}

/// Manages page creation, url derivation and persistence.
///
/// # Thread Safety
///
/// The manager holds no mutable state; the store is shared through `Arc`.
/// Concurrent saves of overlapping subtrees are not coordinated.
pub struct PageManager {
    store: Arc<dyn PageStore>,
    defaults: PageDefaults,
}

impl PageManager {
    /// Create a manager over `store` with creation `defaults`.
    #[must_use]
    pub fn new(store: Arc<dyn PageStore>, defaults: PageDefaults) -> Self {
        Self { store, defaults }
    }

    /// Underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn PageStore> {
        &self.store
    }

    /// Create a new, unsaved page.
    ///
    /// If `fields.route_name` has a registered default set, that set fills
    /// the missing fields; otherwise the global set does. Values in `fields`
    /// always win.
    #[must_use]
    pub fn create(&self, fields: PageFields) -> Page {
        let defaults = self.defaults.resolve(&fields);
        let merged = fields.merged_over(defaults);

        let mut page = Page::default();
        merged.apply_to(&mut page);
        page
    }

    /// Create a new page from an untyped field map.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::InvalidConfiguration`] on unknown field names or
    /// mistyped values.
    pub fn create_from_map(
        &self,
        fields: &std::collections::BTreeMap<String, serde_json::Value>,
    ) -> Result<Page, PageError> {
        Ok(self.create(PageFields::from_map(fields)?))
    }

    /// Derive slug and url for `node` and its descendants.
    ///
    /// Walks the subtree with an explicit stack, parents before children, so
    /// each page is fixed against its already fixed parent. Returns the url
    /// changes in visiting order.
    pub fn fix_url(&self, tree: &mut PageTree, node: NodeId) -> Vec<UrlChange> {
        let mut changes = Vec::new();
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            if tree.page(current).is_internal() {
                for below in tree.subtree(current) {
                    if tree.page(below).is_internal() {
                        let before = tree.page_mut(below).url.take();
                        record_change(&mut changes, below, before, None);
                    }
                }
                continue;
            }

            if !tree.page(current).is_hybrid() {
                let before = tree.page(current).url.clone();
                let after = match tree.parent(current) {
                    Some(parent) => {
                        let base = base_path(tree.page(parent).url.as_deref());
                        let page = tree.page_mut(current);
                        let slug = match page.slug.take().filter(|slug| !slug.is_empty()) {
                            Some(slug) => slug,
                            None => slugify(&page.name),
                        };
                        let url = format!("{base}{slug}");
                        page.slug = Some(slug);
                        url
                    }
                    None => {
                        tree.page_mut(current).slug = None;
                        SEPARATOR.to_owned()
                    }
                };

                tree.page_mut(current).url = Some(after.clone());
                record_change(&mut changes, current, before, Some(after));
            }

            stack.extend(tree.children(current).iter().rev());
        }

        changes
    }

    /// Fix urls (unless the page is hybrid) and persist `node` with its
    /// subtree.
    ///
    /// Pages are saved parents first so that newly assigned parent ids are
    /// written into their children's parent reference. The store is flushed
    /// once at the end. If the store rejects a page, staged pages are
    /// discarded and the ids and parent references written into the tree are
    /// put back.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::UnsavedParent`] if the parent of `node` has no
    /// id yet and [`PageError::Store`] if the store rejects a page.
    pub fn save<'t>(&self, tree: &'t mut PageTree, node: NodeId) -> Result<&'t Page, PageError> {
        if let Some(parent) = tree.parent(node)
            && tree.page(parent).id.is_none()
        {
            return Err(PageError::UnsavedParent(tree.page(node).id));
        }

        if !tree.page(node).is_hybrid() {
            self.fix_url(tree, node);
        }

        let mut saved = Vec::new();
        if let Err(err) = self.persist(tree, node, &mut saved) {
            for (current, id, parent) in saved.into_iter().rev() {
                tree.restore_ids(current, id, parent);
            }
            if let Err(discard) = self.store.discard() {
                tracing::warn!(error = %discard, "Failed to discard staged pages");
            }
            return Err(err);
        }

        Ok(tree.page(node))
    }

    /// Stage the subtree of `node` and flush, recording the previous id and
    /// parent of every page handed to the store.
    fn persist(
        &self,
        tree: &mut PageTree,
        node: NodeId,
        saved: &mut Vec<(NodeId, Option<PageId>, Option<PageId>)>,
    ) -> Result<(), PageError> {
        for current in tree.subtree(node) {
            let parent_id = tree.parent(current).and_then(|parent| tree.page(parent).id);
            let page = tree.page_mut(current);
            saved.push((current, page.id, page.parent));
            if parent_id.is_some() {
                page.parent = parent_id;
            }

            let was_new = page.id.is_none();
            self.store.save(page)?;
            let assigned = page.id;

            if was_new && let Some(id) = assigned {
                tree.assign_id(current, id);
            }
            tracing::debug!(page = ?assigned, url = ?tree.page(current).url, "Saved page");
        }

        self.store.flush()?;
        Ok(())
    }

    /// Load every page of `site` as a tree.
    ///
    /// Issues a single position-ordered query; children end up in position
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Store`] if the query fails and
    /// [`PageError::MissingParent`] if a page references a parent outside
    /// the site.
    pub fn load_pages(&self, site: &Site) -> Result<PageTree, PageError> {
        let pages = self
            .store
            .find(&PageQuery::new().site(site.id).order_by_position())?;
        let tree = PageTree::from_pages(pages)?;

        tracing::info!(site = %site.id, pages = tree.len(), "Loaded page tree");
        Ok(tree)
    }

    /// Pages of `site` whose route is not the CMS route.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Store`] if the query fails.
    pub fn get_hybrid_pages(&self, site: &Site) -> Result<Vec<Page>, PageError> {
        Ok(self.store.find(
            &PageQuery::new()
                .site(site.id)
                .route_name_not(CMS_ROUTE_NAME),
        )?)
    }

    /// Page of `site` served at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Store`] if the query fails.
    pub fn get_page_by_url(&self, site: &Site, url: &str) -> Result<Option<Page>, PageError> {
        Ok(self
            .store
            .find_one(&PageQuery::new().site(site.id).url(url))?)
    }
}

/// Url prefix for the children of a page served at `parent_url`.
fn base_path(parent_url: Option<&str>) -> String {
    match parent_url {
        Some(url) if url.ends_with(SEPARATOR) => url.to_owned(),
        Some(url) => format!("{url}{SEPARATOR}"),
        None => SEPARATOR.to_owned(),
    }
}

fn record_change(
    changes: &mut Vec<UrlChange>,
    node: NodeId,
    before: Option<String>,
    after: Option<String>,
) {
    if before != after {
        tracing::debug!(?before, ?after, "Page url changed");
        changes.push(UrlChange {
            node,
            before,
            after,
        });
    }
}
