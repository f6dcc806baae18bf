//! Page persistence abstraction for the Trellis page tree.
//!
//! This crate provides a [`PageStore`] trait that hides the persistence
//! backend from the page manager. The manager only ever issues filtered
//! queries, saves and flushes; connection and transaction concerns belong to
//! the backend.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Page`] and [`Site`] entities
//! - [`PageQuery`] for filtered, optionally position-ordered lookups
//! - [`PageStore`] trait with `find()`, `find_one()`, `save()` and `flush()`
//! - [`MemoryStore`] in-memory backend with YAML fixture loading
//!
//! # Example
//!
//! ```
//! use trellis_store::{MemoryStore, Page, PageQuery, PageStore, Site, SiteId};
//!
//! let store = MemoryStore::new().with_site(Site::new(SiteId(1), "Main"));
//!
//! let mut page = Page {
//!     name: "Home".to_owned(),
//!     site: Some(SiteId(1)),
//!     ..Page::default()
//! };
//! store.save(&mut page).unwrap();
//! store.flush().unwrap();
//!
//! let pages = store.find(&PageQuery::new().site(SiteId(1))).unwrap();
//! assert_eq!(pages.len(), 1);
//! ```

mod entity;
mod memory;
mod query;
mod store;
mod yaml;

pub use entity::{CMS_ROUTE_NAME, INTERNAL_ROUTE_PREFIX, Page, PageId, Site, SiteId};
pub use memory::MemoryStore;
pub use query::{Order, PageQuery};
pub use store::{ErrorStatus, PageStore, StoreError, StoreErrorKind};
pub use yaml::Fixture;
