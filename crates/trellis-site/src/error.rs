//! Page manager errors.

use trellis_store::{PageId, StoreError};

/// Error returned by page tree and page manager operations.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Unknown field name or wrongly typed value in a field set.
    #[error("Invalid page configuration: {0}")]
    InvalidConfiguration(String),
    /// A page references a parent that is not part of the tree.
    #[error("Page {} references missing parent {parent}", display_id(.page.as_ref()))]
    MissingParent {
        /// Referencing page (`None` if it was never saved).
        page: Option<PageId>,
        /// Referenced parent id.
        parent: PageId,
    },
    /// Two pages of the same tree share an id.
    #[error("Duplicate page id {0}")]
    DuplicatePage(PageId),
    /// Attaching would make a page its own ancestor.
    #[error("Cannot attach page {} below its own subtree", display_id(.0.as_ref()))]
    Cycle(Option<PageId>),
    /// The parent must be saved before its children.
    #[error("Parent of page {} has not been saved", display_id(.0.as_ref()))]
    UnsavedParent(Option<PageId>),
    /// Persistence backend failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

fn display_id(id: Option<&PageId>) -> String {
    id.map_or_else(|| "<new>".to_owned(), |id| id.to_string())
}
