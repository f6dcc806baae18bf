//! Store trait and error types.
//!
//! Provides the core [`PageStore`] trait for abstracting page persistence,
//! along with [`StoreError`] for unified error handling across backends.
//!
//! # Unit of Work
//!
//! [`PageStore::save`] stages a page and assigns its identifier.
//! [`PageStore::flush`] makes every staged page visible to queries. Backends
//! are free to write through on `save` as long as `flush` is a valid
//! commit point.

use crate::entity::{Page, PageId, Site, SiteId};
use crate::query::PageQuery;

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Entity does not exist.
    NotFound,
    /// Entity already exists.
    AlreadyExists,
    /// Query or entity was rejected by the backend.
    Invalid,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Conflicting concurrent write.
    Conflict,
    /// Stored data could not be decoded or encoded.
    Serialization,
    /// Other/unknown error category.
    Other,
}

/// Retry guidance.
#[derive(Debug, PartialEq, Eq, Default)]
pub enum ErrorStatus {
    /// Don't retry (invalid entity, not found).
    #[default]
    Permanent,
    /// Retry immediately (timeout, connection reset).
    Temporary,
    /// Retry with backoff (backend unavailable).
    Persistent,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Retry guidance.
    pub status: ErrorStatus,
    /// Page context (if applicable).
    pub page: Option<PageId>,
    /// Backend identifier (e.g., "Memory").
    pub backend: Option<&'static str>,
    message: Option<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            status: ErrorStatus::Permanent,
            page: None,
            backend: None,
            message: None,
            source: None,
        }
    }

    /// Attach page context.
    #[must_use]
    pub fn with_page(mut self, page: PageId) -> Self {
        self.page = Some(page);
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set retry status.
    #[must_use]
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach a human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a not found error for a page.
    #[must_use]
    pub fn page_not_found(page: PageId) -> Self {
        Self::new(StoreErrorKind::NotFound).with_page(page)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (page: 3)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::NotFound => "Not found",
            StoreErrorKind::AlreadyExists => "Already exists",
            StoreErrorKind::Invalid => "Invalid",
            StoreErrorKind::Unavailable => "Unavailable",
            StoreErrorKind::Conflict => "Conflict",
            StoreErrorKind::Serialization => "Serialization error",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        } else if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(page) = self.page {
            write!(f, " (page: {page})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Persistence backend for pages and sites.
///
/// Implementations own connections, transactions and identifier
/// generation. The page manager never retries; every error is returned to
/// the caller unmodified.
pub trait PageStore: Send + Sync {
    /// Return every page matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot run the query.
    fn find(&self, query: &PageQuery) -> Result<Vec<Page>, StoreError>;

    /// Return the first page matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot run the query.
    fn find_one(&self, query: &PageQuery) -> Result<Option<Page>, StoreError> {
        Ok(self.find(query)?.into_iter().next())
    }

    /// Stage a page for persistence, assigning its identifier if missing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the page is rejected (e.g., unknown site).
    fn save(&self, page: &mut Page) -> Result<(), StoreError>;

    /// Commit every staged page.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the commit fails.
    fn flush(&self) -> Result<(), StoreError>;

    /// Drop every staged page without committing it.
    ///
    /// Called after a failed save so a later [`flush`](Self::flush) does not
    /// commit a partial subtree.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot roll back.
    fn discard(&self) -> Result<(), StoreError>;

    /// Return every known site.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot list sites.
    fn sites(&self) -> Result<Vec<Site>, StoreError>;

    /// Look up a site by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot list sites.
    fn site(&self, id: SiteId) -> Result<Option<Site>, StoreError> {
        Ok(self.sites()?.into_iter().find(|site| site.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_new() {
        let err = StoreError::new(StoreErrorKind::NotFound);

        assert_eq!(err.kind, StoreErrorKind::NotFound);
        assert_eq!(err.status, ErrorStatus::Permanent);
        assert!(err.page.is_none());
        assert!(err.backend.is_none());
    }

    #[test]
    fn test_store_error_with_status() {
        let err = StoreError::new(StoreErrorKind::Unavailable).with_status(ErrorStatus::Persistent);

        assert_eq!(err.status, ErrorStatus::Persistent);
    }

    #[test]
    fn test_store_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = StoreError::new(StoreErrorKind::Unavailable).with_source(io_err);

        assert!(err.downcast_source::<std::io::Error>().is_some());
    }

    #[test]
    fn test_store_error_page_not_found() {
        let err = StoreError::page_not_found(PageId(9));

        assert_eq!(err.kind, StoreErrorKind::NotFound);
        assert_eq!(err.page, Some(PageId(9)));
    }

    #[test]
    fn test_store_error_display_simple() {
        let err = StoreError::new(StoreErrorKind::NotFound);

        assert_eq!(err.to_string(), "Not found");
    }

    #[test]
    fn test_store_error_display_full() {
        let err = StoreError::new(StoreErrorKind::Invalid)
            .with_backend("Memory")
            .with_message("unknown site 4")
            .with_page(PageId(3));

        assert_eq!(err.to_string(), "[Memory] Invalid: unknown site 4 (page: 3)");
    }

    #[test]
    fn test_store_error_display_uses_source_without_message() {
        let io_err = std::io::Error::other("disk full");
        let err = StoreError::new(StoreErrorKind::Other)
            .with_backend("Memory")
            .with_source(io_err);

        assert_eq!(err.to_string(), "[Memory] Error: disk full");
    }

    #[test]
    fn test_store_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StoreError>();
    }

    #[test]
    fn test_error_status_default() {
        assert_eq!(ErrorStatus::default(), ErrorStatus::Permanent);
    }
}
