//! Filtered page queries.

use crate::entity::{Page, PageId, SiteId};

/// Result ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Order {
    /// Backend order.
    #[default]
    Unordered,
    /// Ascending `position`.
    Position,
}

/// Page query built from chained criteria.
///
/// Every criterion that is set must match. An empty query matches all pages.
///
/// # Example
///
/// ```
/// use trellis_store::{CMS_ROUTE_NAME, PageQuery, SiteId};
///
/// let query = PageQuery::new()
///     .site(SiteId(1))
///     .route_name_not(CMS_ROUTE_NAME)
///     .order_by_position();
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub id: Option<PageId>,
    pub site: Option<SiteId>,
    pub url: Option<String>,
    pub route_name: Option<String>,
    pub route_name_not: Option<String>,
    pub order: Order,
}

impl PageQuery {
    /// Create a query matching all pages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn id(mut self, id: PageId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn site(mut self, site: SiteId) -> Self {
        self.site = Some(site);
        self
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn route_name(mut self, route_name: impl Into<String>) -> Self {
        self.route_name = Some(route_name.into());
        self
    }

    /// Exclude pages serving `route_name`.
    #[must_use]
    pub fn route_name_not(mut self, route_name: impl Into<String>) -> Self {
        self.route_name_not = Some(route_name.into());
        self
    }

    #[must_use]
    pub fn order_by_position(mut self) -> Self {
        self.order = Order::Position;
        self
    }

    /// Check whether a page satisfies every criterion.
    #[must_use]
    pub fn matches(&self, page: &Page) -> bool {
        if self.id.is_some() && page.id != self.id {
            return false;
        }
        if self.site.is_some() && page.site != self.site {
            return false;
        }
        if let Some(url) = &self.url
            && page.url.as_deref() != Some(url.as_str())
        {
            return false;
        }
        if let Some(route_name) = &self.route_name
            && &page.route_name != route_name
        {
            return false;
        }
        if let Some(route_name) = &self.route_name_not
            && &page.route_name == route_name
        {
            return false;
        }
        true
    }
}
