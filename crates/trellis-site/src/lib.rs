//! Page tree management for Trellis.
//!
//! This crate provides:
//! - [`PageTree`]: a site's pages with parent/children links
//! - [`PageManager`]: page creation from defaults, slug/url derivation,
//!   persistence through a [`PageStore`](trellis_store::PageStore) and tree
//!   loading
//! - [`PageFields`] / [`PageDefaults`]: typed field sets for page creation
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use trellis_site::{PageDefaults, PageManager};
//! use trellis_store::{MemoryStore, Page, PageId, Site, SiteId};
//!
//! let site = Site::new(SiteId(1), "Main");
//! let store = MemoryStore::new()
//!     .with_site(site.clone())
//!     .with_page(Page {
//!         id: Some(PageId(1)),
//!         site: Some(SiteId(1)),
//!         name: "Home".into(),
//!         ..Page::default()
//!     })
//!     .with_page(Page {
//!         id: Some(PageId(2)),
//!         site: Some(SiteId(1)),
//!         parent: Some(PageId(1)),
//!         name: "About".into(),
//!         ..Page::default()
//!     });
//! let manager = PageManager::new(Arc::new(store), PageDefaults::default());
//!
//! let mut tree = manager.load_pages(&site)?;
//! let root = tree.roots()[0];
//! manager.save(&mut tree, root)?;
//!
//! assert_eq!(tree.get(PageId(2)).and_then(|p| p.url.as_deref()), Some("/about"));
//! # Ok(())
//! # }
//! ```

mod error;
mod fields;
mod manager;
mod slug;
mod tree;

pub use error::PageError;
pub use fields::{PageDefaults, PageFields};
pub use manager::{PageManager, UrlChange};
pub use slug::slugify;
pub use tree::{NodeId, PageTree};
