//! Page and site entities.
//!
//! A [`Page`] is a flat record: its parent is a reference by id, and children
//! only exist once a tree has been materialized by the page manager.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Route name of pages whose url is managed by the CMS.
pub const CMS_ROUTE_NAME: &str = "page_slug";

/// Route name prefix of internal pages (error pages, global blocks, ...).
pub const INTERNAL_ROUTE_PREFIX: &str = "_page_internal";

/// Page identifier assigned by the store on first save.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Site identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub u64);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tenant owning an independent page tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Site identifier.
    pub id: SiteId,
    /// Display name.
    pub name: String,
    /// Hostname the site answers on.
    #[serde(default)]
    pub host: String,
    /// Locale (e.g., "en", "fr").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Whether the site is served.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Site {
    /// Create an enabled site on `localhost`.
    #[must_use]
    pub fn new(id: SiteId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            host: "localhost".to_owned(),
            locale: None,
            enabled: true,
        }
    }
}

/// Node of a site's page tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Identifier, `None` until the page has been saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PageId>,
    /// Owning site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<SiteId>,
    /// Parent page reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<PageId>,
    /// Display name, source of the slug.
    #[serde(default)]
    pub name: String,
    /// Url segment of this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Full url path. Always `None` for internal pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Order among siblings.
    #[serde(default = "default_position")]
    pub position: i32,
    /// Route served by this page.
    #[serde(default = "default_route_name")]
    pub route_name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whether the page is wrapped in the site layout.
    #[serde(default = "default_true")]
    pub decorate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
    /// Free-form settings passed to blocks as rendering context.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub settings: HashMap<String, serde_json::Value>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            id: None,
            site: None,
            parent: None,
            name: String::new(),
            slug: None,
            url: None,
            position: default_position(),
            route_name: default_route_name(),
            enabled: true,
            decorate: true,
            template_code: None,
            custom_url: None,
            settings: HashMap::new(),
        }
    }
}

impl Page {
    /// True if the page serves an internal route and has no public url.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.route_name.starts_with(INTERNAL_ROUTE_PREFIX)
    }

    /// True if the page url is managed outside the CMS.
    #[must_use]
    pub fn is_hybrid(&self) -> bool {
        self.route_name != CMS_ROUTE_NAME && !self.is_internal()
    }

    /// True if the page url is derived by the CMS.
    #[must_use]
    pub fn is_cms(&self) -> bool {
        self.route_name == CMS_ROUTE_NAME
    }

    /// Look up a settings value.
    #[must_use]
    pub fn setting(&self, key: &str) -> Option<&serde_json::Value> {
        self.settings.get(key)
    }
}

fn default_true() -> bool {
    true
}

fn default_position() -> i32 {
    1
}

fn default_route_name() -> String {
    CMS_ROUTE_NAME.to_owned()
}
